//! Guestbay API server library.
//!
//! Exposes config, state, error handling, the reservation engine, the payment
//! reconciler and the routes so integration tests and the binary entrypoint
//! can both use them.

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod payments;
pub mod query;
pub mod reservation;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
