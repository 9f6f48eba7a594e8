//! Sales representative commission settlement.
//!
//! Settling a payout writes at most one commission row. Concurrent or repeated
//! runs converge on that row through the unique constraint on `payout_id`.

use guestbay_core::settlement::{payout_status, sales_rep_commission};
use guestbay_core::types::DbId;
use guestbay_db::models::payout::{NewCommission, SalesRepCommission};
use guestbay_db::repositories::{CommissionInsert, CommissionRepo, PayoutRepo};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    #[error("Payout {0} not found")]
    PayoutNotFound(DbId),

    #[error("Payout {0} is not finalized")]
    NotFinalized(DbId),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "commission", rename_all = "snake_case")]
pub enum SettlementOutcome {
    Created(SalesRepCommission),
    /// A previous or concurrent run already wrote the commission.
    AlreadySettled(SalesRepCommission),
    /// The building has no sales representative. Nothing written.
    NoRepresentative,
}

impl SettlementOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::AlreadySettled(_) => "already_settled",
            Self::NoRepresentative => "no_representative",
        }
    }

    pub fn commission(&self) -> Option<&SalesRepCommission> {
        match self {
            Self::Created(c) | Self::AlreadySettled(c) => Some(c),
            Self::NoRepresentative => None,
        }
    }
}

/// Compute and store the commission for one payout.
pub async fn settle_payout(
    pool: &PgPool,
    payout_id: DbId,
) -> Result<SettlementOutcome, SettlementError> {
    let terms = PayoutRepo::find_terms(pool, payout_id)
        .await?
        .ok_or(SettlementError::PayoutNotFound(payout_id))?;

    if !payout_status::is_settleable(terms.status_id) {
        return Err(SettlementError::NotFinalized(payout_id));
    }

    let Some(sales_rep_id) = terms.sales_rep_id else {
        tracing::info!(payout_id, building_id = terms.building_id, "No sales representative");
        return Ok(SettlementOutcome::NoRepresentative);
    };

    let input = NewCommission {
        payout_id,
        sales_rep_id,
        base_amount: terms.platform_commission,
        commission_rate_bps: terms.commission_rate_bps,
        amount: sales_rep_commission(terms.platform_commission, terms.commission_rate_bps),
    };

    match CommissionRepo::insert_once(pool, &input).await? {
        CommissionInsert::Created(row) => {
            tracing::info!(payout_id, sales_rep_id, amount = row.amount, "Commission settled");
            Ok(SettlementOutcome::Created(row))
        }
        CommissionInsert::AlreadyExists(row) => {
            tracing::debug!(payout_id, "Payout already settled");
            Ok(SettlementOutcome::AlreadySettled(row))
        }
    }
}
