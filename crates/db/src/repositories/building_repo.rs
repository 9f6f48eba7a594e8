//! Repository for `buildings`, `parking_spots` and `sales_reps`.

use guestbay_core::types::DbId;
use sqlx::PgPool;

use crate::models::building::{Building, CreateBuilding, ParkingSpot, SalesRep};

const BUILDING_COLUMNS: &str = "\
    id, name, platform_rate_bps, commission_rate_bps, sales_rep_id, created_at, updated_at";

const SPOT_COLUMNS: &str = "id, building_id, label, is_active, created_at, updated_at";

const SALES_REP_COLUMNS: &str = "id, full_name, email, is_active, created_at, updated_at";

pub struct BuildingRepo;

impl BuildingRepo {
    // -----------------------------------------------------------------------
    // Buildings
    // -----------------------------------------------------------------------

    pub async fn create(pool: &PgPool, input: &CreateBuilding) -> Result<Building, sqlx::Error> {
        let query = format!(
            "INSERT INTO buildings (name, platform_rate_bps, commission_rate_bps, sales_rep_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {BUILDING_COLUMNS}"
        );
        sqlx::query_as::<_, Building>(&query)
            .bind(&input.name)
            .bind(input.platform_rate_bps)
            .bind(input.commission_rate_bps)
            .bind(input.sales_rep_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Building>, sqlx::Error> {
        let query = format!("SELECT {BUILDING_COLUMNS} FROM buildings WHERE id = $1");
        sqlx::query_as::<_, Building>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Assign (or clear) the building's sales representative.
    pub async fn set_sales_rep(
        pool: &PgPool,
        building_id: DbId,
        sales_rep_id: Option<DbId>,
    ) -> Result<Option<Building>, sqlx::Error> {
        let query = format!(
            "UPDATE buildings SET sales_rep_id = $2 WHERE id = $1 RETURNING {BUILDING_COLUMNS}"
        );
        sqlx::query_as::<_, Building>(&query)
            .bind(building_id)
            .bind(sales_rep_id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Parking spots
    // -----------------------------------------------------------------------

    pub async fn create_spot(
        pool: &PgPool,
        building_id: DbId,
        label: &str,
    ) -> Result<ParkingSpot, sqlx::Error> {
        let query = format!(
            "INSERT INTO parking_spots (building_id, label) VALUES ($1, $2) \
             RETURNING {SPOT_COLUMNS}"
        );
        sqlx::query_as::<_, ParkingSpot>(&query)
            .bind(building_id)
            .bind(label)
            .fetch_one(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Sales representatives
    // -----------------------------------------------------------------------

    pub async fn create_sales_rep(
        pool: &PgPool,
        full_name: &str,
        email: &str,
    ) -> Result<SalesRep, sqlx::Error> {
        let query = format!(
            "INSERT INTO sales_reps (full_name, email) VALUES ($1, $2) \
             RETURNING {SALES_REP_COLUMNS}"
        );
        sqlx::query_as::<_, SalesRep>(&query)
            .bind(full_name)
            .bind(email)
            .fetch_one(pool)
            .await
    }
}
