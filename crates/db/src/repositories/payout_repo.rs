//! Repository for the `payouts` table.

use guestbay_core::types::DbId;
use sqlx::PgPool;

use crate::models::payout::{CreatePayout, Payout, PayoutTerms};

const COLUMNS: &str = "\
    id, building_id, period_start, period_end, revenue, platform_commission, \
    building_share, status_id, created_at, updated_at";

pub struct PayoutRepo;

impl PayoutRepo {
    pub async fn create(pool: &PgPool, input: &CreatePayout) -> Result<Payout, sqlx::Error> {
        let query = format!(
            "INSERT INTO payouts \
                (building_id, period_start, period_end, revenue, platform_commission, \
                 building_share, status_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payout>(&query)
            .bind(input.building_id)
            .bind(input.period_start)
            .bind(input.period_end)
            .bind(input.revenue)
            .bind(input.platform_commission)
            .bind(input.building_share)
            .bind(input.status_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Payout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payouts WHERE id = $1");
        sqlx::query_as::<_, Payout>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Payout figures joined with the building's current settlement terms.
    pub async fn find_terms(
        pool: &PgPool,
        payout_id: DbId,
    ) -> Result<Option<PayoutTerms>, sqlx::Error> {
        sqlx::query_as::<_, PayoutTerms>(
            "SELECT p.id AS payout_id, p.building_id, p.platform_commission, p.status_id, \
                    b.commission_rate_bps, b.sales_rep_id \
             FROM payouts p \
             JOIN buildings b ON b.id = p.building_id \
             WHERE p.id = $1",
        )
        .bind(payout_id)
        .fetch_optional(pool)
        .await
    }
}
