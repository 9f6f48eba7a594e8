//! Repository for the `availability_blocks` table.

use guestbay_core::types::DbId;
use sqlx::PgPool;

use crate::models::block::{
    AvailabilityBlock, BlockContext, BlockSearchQuery, BlockSearchResult, CreateBlock,
};
use crate::models::status::BlockStatus;

const COLUMNS: &str = "\
    id, spot_id, start_time, end_time, duration_minutes, base_price, \
    status_id, created_at, updated_at";

pub struct BlockRepo;

impl BlockRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateBlock,
    ) -> Result<AvailabilityBlock, sqlx::Error> {
        let query = format!(
            "INSERT INTO availability_blocks \
                (spot_id, start_time, end_time, duration_minutes, base_price) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AvailabilityBlock>(&query)
            .bind(input.spot_id)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.duration_minutes)
            .bind(input.base_price)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AvailabilityBlock>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM availability_blocks WHERE id = $1");
        sqlx::query_as::<_, AvailabilityBlock>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a block with its building and the building's platform rate.
    ///
    /// Read outside any transaction; the reservation re-checks the status with
    /// a guarded update.
    pub async fn find_context(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BlockContext>, sqlx::Error> {
        sqlx::query_as::<_, BlockContext>(
            "SELECT ab.id AS block_id, ab.spot_id, ps.building_id, ab.start_time, ab.end_time, \
                    ab.base_price, ab.status_id, b.platform_rate_bps \
             FROM availability_blocks ab \
             JOIN parking_spots ps ON ps.id = ab.spot_id \
             JOIN buildings b ON b.id = ps.building_id \
             WHERE ab.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Future available blocks on active spots, soonest first.
    pub async fn search_available(
        pool: &PgPool,
        params: &BlockSearchQuery,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BlockSearchResult>, sqlx::Error> {
        sqlx::query_as::<_, BlockSearchResult>(
            "SELECT ab.id, ab.spot_id, ps.label AS spot_label, ps.building_id, \
                    ab.start_time, ab.end_time, ab.duration_minutes, ab.base_price \
             FROM availability_blocks ab \
             JOIN parking_spots ps ON ps.id = ab.spot_id \
             WHERE ab.status_id = $1 \
               AND ab.start_time > NOW() \
               AND ps.is_active \
               AND ($2::BIGINT IS NULL OR ps.building_id = $2) \
               AND ($3::DATE IS NULL OR (ab.start_time AT TIME ZONE 'UTC')::DATE = $3) \
               AND ($4::INTEGER IS NULL OR ab.duration_minutes = $4) \
             ORDER BY ab.start_time ASC, ab.id ASC \
             LIMIT $5 OFFSET $6",
        )
        .bind(BlockStatus::Available.id())
        .bind(params.building_id)
        .bind(params.date)
        .bind(params.duration_minutes)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }
}
