//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument. Methods that touch more than one row open
//! their own transaction.

pub mod account_repo;
pub mod block_repo;
pub mod booking_repo;
pub mod building_repo;
pub mod commission_repo;
pub mod denylist_repo;
pub mod payment_repo;
pub mod payout_repo;

pub use account_repo::AccountRepo;
pub use block_repo::BlockRepo;
pub use booking_repo::BookingRepo;
pub use building_repo::BuildingRepo;
pub use commission_repo::{CommissionInsert, CommissionRepo};
pub use denylist_repo::DenylistRepo;
pub use payment_repo::PaymentRepo;
pub use payout_repo::PayoutRepo;
