//! Well-known role name constants.
//!
//! These must match the `role` values allowed by the `accounts` table check
//! constraint in `20260301000003_create_buildings_and_accounts.sql`.

pub const ROLE_RESIDENT: &str = "resident";
pub const ROLE_BUILDING_ADMIN: &str = "building_admin";
pub const ROLE_SUPER_ADMIN: &str = "super_admin";
