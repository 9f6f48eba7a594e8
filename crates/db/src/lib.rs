//! Persistence layer: connection pool, migrations, models and repositories.
//!
//! Every multi-row state change (claiming a block, cancelling, sweeping,
//! applying a payment, settling a payout) runs inside one transaction in the
//! repository that owns it.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// PostgreSQL SQLSTATE for unique constraint violations.
pub const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for exclusion constraint violations.
pub const EXCLUSION_VIOLATION: &str = "23P01";

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Whether `err` is a violation of the named constraint with the given
/// SQLSTATE.
pub fn is_constraint_violation(err: &sqlx::Error, code: &str, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(code) && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
