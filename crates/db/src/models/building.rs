//! Buildings, parking spots and sales representatives.

use guestbay_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `buildings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Building {
    pub id: DbId,
    pub name: String,
    pub platform_rate_bps: i32,
    pub commission_rate_bps: i32,
    pub sales_rep_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateBuilding {
    pub name: String,
    pub platform_rate_bps: i32,
    pub commission_rate_bps: i32,
    pub sales_rep_id: Option<DbId>,
}

/// A row from the `parking_spots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParkingSpot {
    pub id: DbId,
    pub building_id: DbId,
    pub label: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `sales_reps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SalesRep {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
