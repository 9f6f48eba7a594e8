//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the caller's [`Principal`] from a JWT Bearer token.
//! - [`rbac::RequireResident`] -- Requires a resident account.
//! - [`rbac::RequireAdmin`] -- Requires a building or super admin.
//! - [`internal::RequireInternal`] -- Requires the shared `x-cron-secret`.
//!
//! [`Principal`]: guestbay_core::account::Principal

pub mod auth;
pub mod internal;
pub mod rbac;
