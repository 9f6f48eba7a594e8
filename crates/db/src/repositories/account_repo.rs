//! Repository for the `accounts` table.

use guestbay_core::account::AccountKind;
use guestbay_core::roles::ROLE_RESIDENT;
use guestbay_core::types::DbId;
use sqlx::PgPool;

use crate::models::account::{Account, CreateAccount};

const COLUMNS: &str = "\
    id, role, building_id, full_name, email_index, phone_index, \
    document_index, is_active, created_at, updated_at";

pub struct AccountRepo;

impl AccountRepo {
    pub async fn create(pool: &PgPool, input: &CreateAccount) -> Result<Account, sqlx::Error> {
        let building_id = match input.kind {
            AccountKind::Resident { building_id } => Some(building_id),
            AccountKind::Staff { building_id, .. } => building_id,
        };
        let query = format!(
            "INSERT INTO accounts \
                (role, building_id, full_name, email_index, phone_index, document_index) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(input.kind.role_name())
            .bind(building_id)
            .bind(&input.full_name)
            .bind(&input.email_index)
            .bind(&input.phone_index)
            .bind(&input.document_index)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active resident. `None` covers unknown, inactive and non-resident
    /// accounts alike.
    pub async fn find_active_resident(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM accounts WHERE id = $1 AND role = $2 AND is_active"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .bind(ROLE_RESIDENT)
            .fetch_optional(pool)
            .await
    }

    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE accounts SET is_active = false WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
