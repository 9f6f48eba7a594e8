//! Payout and sales representative commission models.

use chrono::NaiveDate;
use guestbay_core::types::{Amount, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::status::StatusId;

/// A row from the `payouts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payout {
    pub id: DbId,
    pub building_id: DbId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub revenue: Amount,
    pub platform_commission: Amount,
    pub building_share: Amount,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a payout (produced by the revenue aggregation job).
#[derive(Debug, Clone)]
pub struct CreatePayout {
    pub building_id: DbId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub revenue: Amount,
    pub platform_commission: Amount,
    pub building_share: Amount,
    pub status_id: StatusId,
}

/// A row from the `sales_rep_commissions` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct SalesRepCommission {
    pub id: DbId,
    pub payout_id: DbId,
    pub sales_rep_id: DbId,
    pub base_amount: Amount,
    pub commission_rate_bps: i32,
    pub amount: Amount,
    pub created_at: Timestamp,
}

/// Payout joined with the building's settlement terms.
#[derive(Debug, Clone, FromRow)]
pub struct PayoutTerms {
    pub payout_id: DbId,
    pub building_id: DbId,
    pub platform_commission: Amount,
    pub status_id: StatusId,
    pub commission_rate_bps: i32,
    pub sales_rep_id: Option<DbId>,
}

/// DTO for the idempotent commission insert.
#[derive(Debug, Clone)]
pub struct NewCommission {
    pub payout_id: DbId,
    pub sales_rep_id: DbId,
    pub base_amount: Amount,
    pub commission_rate_bps: i32,
    pub amount: Amount,
}
