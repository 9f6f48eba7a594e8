//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts where the service creates rows itself

pub mod account;
pub mod block;
pub mod booking;
pub mod building;
pub mod denylist;
pub mod payment;
pub mod payout;
pub mod status;
