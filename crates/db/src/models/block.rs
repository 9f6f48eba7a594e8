//! Availability block models and DTOs.

use chrono::NaiveDate;
use guestbay_core::types::{Amount, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::StatusId;

/// A row from the `availability_blocks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AvailabilityBlock {
    pub id: DbId,
    pub spot_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub duration_minutes: i32,
    pub base_price: Amount,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a block. Blocks are produced by building staff tooling;
/// the service only needs this for seeding and tests.
#[derive(Debug, Clone)]
pub struct CreateBlock {
    pub spot_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub duration_minutes: i32,
    pub base_price: Amount,
}

/// A block joined with the building data the validator and the pricing split
/// need.
#[derive(Debug, Clone, FromRow)]
pub struct BlockContext {
    pub block_id: DbId,
    pub spot_id: DbId,
    pub building_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub base_price: Amount,
    pub status_id: StatusId,
    pub platform_rate_bps: i32,
}

/// One row of the available-block search.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BlockSearchResult {
    pub id: DbId,
    pub spot_id: DbId,
    pub spot_label: String,
    pub building_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub duration_minutes: i32,
    pub base_price: Amount,
}

/// Query parameters for `GET /api/v1/blocks/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockSearchQuery {
    pub building_id: Option<DbId>,
    /// Calendar day (UTC) the block must start on.
    pub date: Option<NaiveDate>,
    pub duration_minutes: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
