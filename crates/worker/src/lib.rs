//! Background jobs: the expiry and completion sweepers and the settlement
//! engine.
//!
//! The jobs are plain async functions over a `PgPool` so both the worker
//! binary and the API's internal endpoints can run them.

pub mod config;
pub mod settlement;
pub mod sweeper;
