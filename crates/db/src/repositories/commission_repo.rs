//! Repository for the `sales_rep_commissions` table.

use guestbay_core::types::DbId;
use sqlx::PgPool;

use crate::models::payout::{NewCommission, SalesRepCommission};
use crate::{is_constraint_violation, UNIQUE_VIOLATION};

const COLUMNS: &str = "\
    id, payout_id, sales_rep_id, base_amount, commission_rate_bps, amount, created_at";

const PAYOUT_UNIQUE: &str = "uq_sales_rep_commissions_payout";

/// Result of the idempotent insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommissionInsert {
    Created(SalesRepCommission),
    /// A commission for the payout already existed; this is the stored row.
    AlreadyExists(SalesRepCommission),
}

impl CommissionInsert {
    pub fn into_inner(self) -> SalesRepCommission {
        match self {
            Self::Created(c) | Self::AlreadyExists(c) => c,
        }
    }
}

pub struct CommissionRepo;

impl CommissionRepo {
    /// Insert the payout's commission. The unique constraint on `payout_id`
    /// decides races: a violation means another run settled first, and the
    /// existing row is returned.
    pub async fn insert_once(
        pool: &PgPool,
        input: &NewCommission,
    ) -> Result<CommissionInsert, sqlx::Error> {
        let query = format!(
            "INSERT INTO sales_rep_commissions \
                (payout_id, sales_rep_id, base_amount, commission_rate_bps, amount) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, SalesRepCommission>(&query)
            .bind(input.payout_id)
            .bind(input.sales_rep_id)
            .bind(input.base_amount)
            .bind(input.commission_rate_bps)
            .bind(input.amount)
            .fetch_one(pool)
            .await;

        match inserted {
            Ok(row) => Ok(CommissionInsert::Created(row)),
            Err(e) if is_constraint_violation(&e, UNIQUE_VIOLATION, PAYOUT_UNIQUE) => {
                let existing = Self::find_by_payout(pool, input.payout_id)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)?;
                Ok(CommissionInsert::AlreadyExists(existing))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn find_by_payout(
        pool: &PgPool,
        payout_id: DbId,
    ) -> Result<Option<SalesRepCommission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sales_rep_commissions WHERE payout_id = $1");
        sqlx::query_as::<_, SalesRepCommission>(&query)
            .bind(payout_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn count_for_payout(pool: &PgPool, payout_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM sales_rep_commissions WHERE payout_id = $1")
                .bind(payout_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
