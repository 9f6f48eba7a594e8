//! Sales representative commission on a finalized payout.

use crate::pricing::{apply_rate, Rounding};
use crate::types::Amount;

/// Payout status IDs matching `payout_statuses` seed data.
pub mod payout_status {
    pub const PENDING: i16 = 1;
    pub const FINALIZED: i16 = 2;
    pub const PAID: i16 = 3;

    /// A payout can be settled once its figures are frozen.
    pub fn is_settleable(status: i16) -> bool {
        matches!(status, FINALIZED | PAID)
    }
}

/// Representative's cut of the platform commission. Paid out to a third
/// party, so it rounds down.
pub fn sales_rep_commission(platform_commission: Amount, commission_rate_bps: i32) -> Amount {
    apply_rate(platform_commission, commission_rate_bps, Rounding::Floor)
}
