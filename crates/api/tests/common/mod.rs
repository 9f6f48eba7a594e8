#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{Duration, DurationRound, Utc};
use guestbay_api::auth::jwt::{generate_access_token, JwtConfig};
use guestbay_api::config::{AppEnv, PaymentConfig, ServerConfig};
use guestbay_api::payments::gateway::{GatewayError, PaymentGateway};
use guestbay_api::router::build_app_router;
use guestbay_api::state::AppState;
use guestbay_core::account::{AccountKind, Principal, StaffRole};
use guestbay_core::types::{Amount, DbId, Timestamp};
use guestbay_db::models::account::{Account, CreateAccount};
use guestbay_db::models::block::{AvailabilityBlock, CreateBlock};
use guestbay_db::models::building::{Building, CreateBuilding, ParkingSpot};
use guestbay_db::repositories::{AccountRepo, BlockRepo, BuildingRepo};
use guestbay_worker::config::SweepSchedule;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";
pub const WEBHOOK_SECRET: &str = "whsec-test";
pub const CRON_SECRET: &str = "cron-test";
pub const BLIND_INDEX_KEY: &str = "blind-index-test-key";

/// Test configuration: `test` environment, signed webhooks, simulator on.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        app_env: AppEnv::Test,
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        payments: PaymentConfig {
            webhook_secret: Some(WEBHOOK_SECRET.to_string()),
            allow_unsigned: false,
            simulator_enabled: true,
            gateway_url: "http://gateway.invalid".to_string(),
            gateway_token: None,
        },
        blind_index_key: BLIND_INDEX_KEY.to_string(),
        cron_secret: Some(CRON_SECRET.to_string()),
        run_sweepers: false,
        sweeps: SweepSchedule::default(),
    }
}

/// In-memory gateway serving canned payment documents.
#[derive(Default)]
pub struct MockGateway {
    payments: Mutex<HashMap<String, serde_json::Value>>,
}

impl MockGateway {
    pub fn insert(&self, external_id: &str, payment: serde_json::Value) {
        self.payments
            .lock()
            .unwrap()
            .insert(external_id.to_string(), payment);
    }
}

#[async_trait::async_trait]
impl PaymentGateway for MockGateway {
    async fn fetch_payment(&self, external_id: &str) -> Result<serde_json::Value, GatewayError> {
        self.payments
            .lock()
            .unwrap()
            .get(external_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(external_id.to_string()))
    }
}

/// Build the full application router on `pool` with [`test_config`] and an
/// empty mock gateway.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config(), Arc::new(MockGateway::default()))
}

pub fn build_test_app_with(
    pool: PgPool,
    config: ServerConfig,
    gateway: Arc<dyn PaymentGateway>,
) -> Router {
    let state = AppState::new(pool, config.clone(), gateway);
    build_app_router(state, &config)
}

pub fn token_for(principal: &Principal) -> String {
    generate_access_token(principal, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub struct Fixture {
    pub building: Building,
    pub spot: ParkingSpot,
    pub resident: Account,
    pub token: String,
}

pub async fn seed(pool: &PgPool) -> Fixture {
    seed_named(pool, "Torre Norte", "resident@example.com").await
}

/// A building with one spot and one resident. `email_index` must be unique.
pub async fn seed_named(pool: &PgPool, name: &str, email_index: &str) -> Fixture {
    let building = BuildingRepo::create(
        pool,
        &CreateBuilding {
            name: name.into(),
            platform_rate_bps: 1_000,
            commission_rate_bps: 1_000,
            sales_rep_id: None,
        },
    )
    .await
    .unwrap();
    let spot = BuildingRepo::create_spot(pool, building.id, "V-01").await.unwrap();
    let resident = seed_account(
        pool,
        AccountKind::Resident {
            building_id: building.id,
        },
        email_index,
    )
    .await;
    let token = token_for(&resident.principal().unwrap());
    Fixture {
        building,
        spot,
        resident,
        token,
    }
}

pub async fn seed_account(pool: &PgPool, kind: AccountKind, email_index: &str) -> Account {
    AccountRepo::create(
        pool,
        &CreateAccount {
            kind,
            full_name: "Test Account".into(),
            email_index: email_index.into(),
            phone_index: None,
            document_index: None,
        },
    )
    .await
    .unwrap()
}

/// A building admin for `building_id`, returned with its token.
pub async fn seed_building_admin(pool: &PgPool, building_id: DbId) -> (Account, String) {
    let kind = AccountKind::Staff {
        role: StaffRole::BuildingAdmin,
        building_id: Some(building_id),
    };
    let account = seed_account(pool, kind, &format!("admin-{building_id}@example.com")).await;
    let token = token_for(&account.principal().unwrap());
    (account, token)
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
    base_price: Amount,
) -> AvailabilityBlock {
    BlockRepo::create(
        pool,
        &CreateBlock {
            spot_id,
            start_time,
            end_time: start_time + Duration::minutes(120),
            duration_minutes: 120,
            base_price,
        },
    )
    .await
    .unwrap()
}

pub fn booking_body(block_id: DbId) -> serde_json::Value {
    serde_json::json!({
        "block_id": block_id,
        "vehicle_plate": "abcd-12",
        "visitor_name": "Maria Perez",
    })
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(
    method: Method,
    uri: &str,
    body: &serde_json::Value,
    headers: &[(&str, &str)],
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    headers: &[(&str, &str)],
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, &body, headers)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let bearer = format!("Bearer {token}");
    post_json(app, uri, body, &[("authorization", bearer.as_str())]).await
}

pub async fn post_empty(app: Router, uri: &str, headers: &[(&str, &str)]) -> Response<Body> {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}
