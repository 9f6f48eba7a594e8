//! Account model: residents and staff in one table.

use guestbay_core::account::{AccountKind, Principal};
use guestbay_core::types::{DbId, Timestamp};
use guestbay_core::validation::IdentityIndexes;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `accounts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: DbId,
    pub role: String,
    pub building_id: Option<DbId>,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub email_index: String,
    #[serde(skip_serializing)]
    pub phone_index: Option<String>,
    #[serde(skip_serializing)]
    pub document_index: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Account {
    /// Decode the tagged kind. `None` if the row violates the role/scope
    /// pairing.
    pub fn kind(&self) -> Option<AccountKind> {
        AccountKind::from_parts(&self.role, self.building_id)
    }

    pub fn principal(&self) -> Option<Principal> {
        self.kind().map(|kind| Principal {
            account_id: self.id,
            kind,
        })
    }

    /// Stored identity blind indexes, for denylist checks.
    pub fn identity(&self) -> IdentityIndexes {
        IdentityIndexes {
            email: Some(self.email_index.clone()),
            phone: self.phone_index.clone(),
            document: self.document_index.clone(),
        }
    }
}

/// DTO for inserting an account. Index fields are already blind-indexed.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub kind: AccountKind,
    pub full_name: String,
    pub email_index: String,
    pub phone_index: Option<String>,
    pub document_index: Option<String>,
}
