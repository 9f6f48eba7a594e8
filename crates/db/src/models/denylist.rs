//! Denylist entries.

use guestbay_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `denylist_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DenylistEntry {
    pub id: DbId,
    pub building_id: Option<DbId>,
    pub field: String,
    #[serde(skip_serializing)]
    pub value_index: String,
    pub reason: String,
    pub is_active: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting an entry. `value_index` is the blind index of the value.
#[derive(Debug, Clone)]
pub struct CreateDenylistEntry {
    pub building_id: Option<DbId>,
    pub field: String,
    pub value_index: String,
    pub reason: String,
    pub created_by: Option<DbId>,
}
