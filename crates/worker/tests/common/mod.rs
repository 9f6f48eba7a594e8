#![allow(dead_code)]

use chrono::{Duration, DurationRound, Utc};
use guestbay_core::account::AccountKind;
use guestbay_core::codes::generate_confirmation_code;
use guestbay_core::types::{DbId, Timestamp};
use guestbay_db::models::account::CreateAccount;
use guestbay_db::models::block::CreateBlock;
use guestbay_db::models::booking::{Booking, NewBooking};
use guestbay_db::models::building::CreateBuilding;
use guestbay_db::repositories::{AccountRepo, BlockRepo, BookingRepo, BuildingRepo};
use sqlx::PgPool;

pub struct Seeded {
    pub building_id: DbId,
    pub spot_id: DbId,
    pub resident_id: DbId,
}

pub async fn seed(pool: &PgPool, sales_rep_id: Option<DbId>) -> Seeded {
    let building = BuildingRepo::create(
        pool,
        &CreateBuilding {
            name: "Edificio Central".into(),
            platform_rate_bps: 1_000,
            commission_rate_bps: 1_000,
            sales_rep_id,
        },
    )
    .await
    .unwrap();
    let spot = BuildingRepo::create_spot(pool, building.id, "V-01").await.unwrap();
    let resident = AccountRepo::create(
        pool,
        &CreateAccount {
            kind: AccountKind::Resident {
                building_id: building.id,
            },
            full_name: "Resident".into(),
            email_index: format!("resident-{}", building.id),
            phone_index: None,
            document_index: None,
        },
    )
    .await
    .unwrap();
    Seeded {
        building_id: building.id,
        spot_id: spot.id,
        resident_id: resident.id,
    }
}

pub fn hours_from_now(hours: i64) -> Timestamp {
    (Utc::now() + Duration::hours(hours))
        .duration_trunc(Duration::hours(1))
        .unwrap()
}

/// Create a two-hour block at `start` and reserve it.
pub async fn booking_at(pool: &PgPool, seeded: &Seeded, start: Timestamp) -> Booking {
    let block = BlockRepo::create(
        pool,
        &CreateBlock {
            spot_id: seeded.spot_id,
            start_time: start,
            end_time: start + Duration::minutes(120),
            duration_minutes: 120,
            base_price: 5_000,
        },
    )
    .await
    .unwrap();
    BookingRepo::reserve(
        pool,
        &NewBooking {
            block_id: block.id,
            resident_id: seeded.resident_id,
            vehicle_plate: "ABCD12".into(),
            visitor_name: "Visitor".into(),
            visitor_phone: None,
            platform_rate_bps: 1_000,
            confirmation_code: generate_confirmation_code(),
        },
    )
    .await
    .unwrap()
    .unwrap()
}

/// Move a booking's creation time back by `minutes`.
pub async fn age_booking(pool: &PgPool, booking_id: DbId, minutes: i64) {
    sqlx::query(
        "UPDATE bookings SET created_at = NOW() - make_interval(mins => $2) WHERE id = $1",
    )
    .bind(booking_id)
    .bind(minutes as i32)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn set_statuses(
    pool: &PgPool,
    booking_id: DbId,
    status_id: i16,
    payment_status_id: i16,
) {
    sqlx::query("UPDATE bookings SET status_id = $2, payment_status_id = $3 WHERE id = $1")
        .bind(booking_id)
        .bind(status_id)
        .bind(payment_status_id)
        .execute(pool)
        .await
        .unwrap();
}
