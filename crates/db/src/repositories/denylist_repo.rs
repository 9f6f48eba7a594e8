//! Repository for the `denylist_entries` table.

use guestbay_core::hashing::IndexedField;
use guestbay_core::types::DbId;
use sqlx::PgPool;

use crate::models::denylist::{CreateDenylistEntry, DenylistEntry};

const COLUMNS: &str = "\
    id, building_id, field, value_index, reason, is_active, created_by, created_at, updated_at";

pub struct DenylistRepo;

impl DenylistRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateDenylistEntry,
    ) -> Result<DenylistEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO denylist_entries (building_id, field, value_index, reason, created_by) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DenylistEntry>(&query)
            .bind(input.building_id)
            .bind(&input.field)
            .bind(&input.value_index)
            .bind(&input.reason)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE denylist_entries SET is_active = false WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reasons of every active entry matching one of `probes`, scoped to the
    /// building plus global entries.
    pub async fn matching_reasons(
        pool: &PgPool,
        building_id: DbId,
        probes: &[(IndexedField, String)],
    ) -> Result<Vec<String>, sqlx::Error> {
        if probes.is_empty() {
            return Ok(Vec::new());
        }
        let fields: Vec<&str> = probes.iter().map(|(f, _)| f.as_str()).collect();
        let values: Vec<&str> = probes.iter().map(|(_, v)| v.as_str()).collect();
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT d.reason \
             FROM denylist_entries d \
             JOIN UNNEST($2::TEXT[], $3::TEXT[]) AS p(field, value_index) \
               ON p.field = d.field AND p.value_index = d.value_index \
             WHERE d.is_active AND (d.building_id = $1 OR d.building_id IS NULL)",
        )
        .bind(building_id)
        .bind(&fields)
        .bind(&values)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(reason,)| reason).collect())
    }
}
