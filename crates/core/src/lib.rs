//! Domain logic for visitor parking reservations.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db`, `worker`
//! and `api` crates build on these types and rules.

pub mod account;
pub mod block;
pub mod booking;
pub mod codes;
pub mod error;
pub mod hashing;
pub mod pricing;
pub mod reconciliation;
pub mod roles;
pub mod search;
pub mod settlement;
pub mod sweeps;
pub mod types;
pub mod validation;
pub mod webhook_signature;
