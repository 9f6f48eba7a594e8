//! Fixtures shared by the repository integration tests.

#![allow(dead_code)]

use chrono::{Duration, DurationRound, Utc};
use guestbay_core::account::AccountKind;
use guestbay_core::codes::generate_confirmation_code;
use guestbay_core::types::{Amount, DbId, Timestamp};
use guestbay_db::models::account::{Account, CreateAccount};
use guestbay_db::models::block::{AvailabilityBlock, CreateBlock};
use guestbay_db::models::booking::{Booking, NewBooking};
use guestbay_db::models::building::{Building, CreateBuilding, ParkingSpot};
use guestbay_db::repositories::{AccountRepo, BlockRepo, BookingRepo, BuildingRepo};
use sqlx::PgPool;

pub const PLATFORM_RATE_BPS: i32 = 1_000;

pub struct Fixture {
    pub building: Building,
    pub spot: ParkingSpot,
    pub resident: Account,
}

pub async fn seed(pool: &PgPool) -> Fixture {
    let building = BuildingRepo::create(
        pool,
        &CreateBuilding {
            name: "Torre Norte".into(),
            platform_rate_bps: PLATFORM_RATE_BPS,
            commission_rate_bps: 1_000,
            sales_rep_id: None,
        },
    )
    .await
    .unwrap();
    let spot = BuildingRepo::create_spot(pool, building.id, "V-01").await.unwrap();
    let resident = seed_resident(pool, building.id, "resident@example.com").await;
    Fixture {
        building,
        spot,
        resident,
    }
}

pub async fn seed_resident(pool: &PgPool, building_id: DbId, email_index: &str) -> Account {
    AccountRepo::create(
        pool,
        &CreateAccount {
            kind: AccountKind::Resident { building_id },
            full_name: "Resident".into(),
            email_index: email_index.into(),
            phone_index: None,
            document_index: None,
        },
    )
    .await
    .unwrap()
}

/// Start of the hour, `hours` from now.
pub fn hours_from_now(hours: i64) -> Timestamp {
    (Utc::now() + Duration::hours(hours))
        .duration_trunc(Duration::hours(1))
        .unwrap()
}

pub async fn seed_block(
    pool: &PgPool,
    spot_id: DbId,
    start_time: Timestamp,
    minutes: i64,
    base_price: Amount,
) -> AvailabilityBlock {
    BlockRepo::create(
        pool,
        &CreateBlock {
            spot_id,
            start_time,
            end_time: start_time + Duration::minutes(minutes),
            duration_minutes: minutes as i32,
            base_price,
        },
    )
    .await
    .unwrap()
}

pub fn new_booking(block_id: DbId, resident_id: DbId) -> NewBooking {
    NewBooking {
        block_id,
        resident_id,
        vehicle_plate: "ABCD12".into(),
        visitor_name: "Maria Perez".into(),
        visitor_phone: None,
        platform_rate_bps: PLATFORM_RATE_BPS,
        confirmation_code: generate_confirmation_code(),
    }
}

/// Reserve a block, panicking on any conflict.
pub async fn reserve(pool: &PgPool, block_id: DbId, resident_id: DbId) -> Booking {
    BookingRepo::reserve(pool, &new_booking(block_id, resident_id))
        .await
        .unwrap()
        .unwrap()
}
