use std::sync::Arc;

use guestbay_core::webhook_signature::WebhookVerifier;

use crate::config::{ServerConfig, WEBHOOK_SECRET_VAR};
use crate::payments::gateway::PaymentGateway;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: guestbay_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Webhook signature policy, built once from the payment config.
    pub verifier: Arc<WebhookVerifier>,
    /// Payment gateway client.
    pub gateway: Arc<dyn PaymentGateway>,
}

impl AppState {
    /// Build the state, deriving the webhook verifier from `config`.
    pub fn new(
        pool: guestbay_db::DbPool,
        config: ServerConfig,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let verifier = WebhookVerifier::new(
            config.payments.webhook_secret.clone(),
            config.payments.allow_unsigned,
            config.is_production(),
        );
        if !verifier.has_secret() {
            tracing::warn!(
                var = WEBHOOK_SECRET_VAR,
                "Webhook secret is not set; signed payment callbacks will be rejected",
            );
        }
        Self {
            pool,
            config: Arc::new(config),
            verifier: Arc::new(verifier),
            gateway,
        }
    }
}
