//! Payment gateway integration.
//!
//! - [`gateway`] -- `PaymentGateway` trait and its HTTP client.
//! - [`reconciler`] -- webhook verification and reconciliation.

pub mod gateway;
pub mod reconciler;
