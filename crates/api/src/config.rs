use guestbay_worker::config::SweepSchedule;

use crate::auth::jwt::JwtConfig;

/// Environment variable holding the payment webhook HMAC secret.
pub const WEBHOOK_SECRET_VAR: &str = "PAYMENT_WEBHOOK_SECRET";

/// Deployment environment, from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Production,
    Development,
    Test,
}

impl AppEnv {
    /// Unknown values fall back to `Production` so that a typo never relaxes
    /// webhook verification.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Self::Development,
            "test" => Self::Test,
            _ => Self::Production,
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

/// Payment gateway and webhook settings.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Shared HMAC secret for `x-signature` verification.
    pub webhook_secret: Option<String>,
    /// Accept unsigned callbacks when no secret is set. Ignored in production.
    pub allow_unsigned: bool,
    /// Accept `simulator` callbacks carrying inline payment data. Ignored in
    /// production.
    pub simulator_enabled: bool,
    /// Base URL of the gateway REST API.
    pub gateway_url: String,
    /// Bearer token for the gateway REST API.
    pub gateway_token: Option<String>,
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub app_env: AppEnv,
    /// JWT token configuration.
    pub jwt: JwtConfig,
    pub payments: PaymentConfig,
    /// Key for blind indexes of plates and identity fields.
    pub blind_index_key: String,
    /// Shared secret for `/internal` routes. Internal routes are closed when
    /// unset.
    pub cron_secret: Option<String>,
    /// Run the sweepers inside the API process.
    pub run_sweepers: bool,
    pub sweeps: SweepSchedule,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                         |
    /// |------------------------------|---------------------------------|
    /// | `HOST`                       | `0.0.0.0`                       |
    /// | `PORT`                       | `3000`                          |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`         |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                            |
    /// | `APP_ENV`                    | `production`                    |
    /// | `PAYMENT_WEBHOOK_SECRET`     | unset                           |
    /// | `PAYMENT_ALLOW_UNSIGNED`     | `false`                         |
    /// | `PAYMENT_SIMULATOR_ENABLED`  | `false`                         |
    /// | `PAYMENT_GATEWAY_URL`        | `https://api.mercadopago.com`   |
    /// | `PAYMENT_GATEWAY_TOKEN`      | unset                           |
    /// | `BLIND_INDEX_KEY`            | **required**                    |
    /// | `CRON_SECRET`                | unset                           |
    /// | `RUN_SWEEPERS`               | `false`                         |
    ///
    /// Sweep intervals come from [`SweepSchedule::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let app_env = AppEnv::parse(
            &std::env::var("APP_ENV").unwrap_or_else(|_| "production".into()),
        );

        let payments = PaymentConfig {
            webhook_secret: non_empty_var(WEBHOOK_SECRET_VAR),
            allow_unsigned: flag("PAYMENT_ALLOW_UNSIGNED"),
            simulator_enabled: flag("PAYMENT_SIMULATOR_ENABLED"),
            gateway_url: std::env::var("PAYMENT_GATEWAY_URL")
                .unwrap_or_else(|_| "https://api.mercadopago.com".into()),
            gateway_token: non_empty_var("PAYMENT_GATEWAY_TOKEN"),
        };

        let blind_index_key =
            non_empty_var("BLIND_INDEX_KEY").expect("BLIND_INDEX_KEY must be set");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            app_env,
            jwt: JwtConfig::from_env(),
            payments,
            blind_index_key,
            cron_secret: non_empty_var("CRON_SECRET"),
            run_sweepers: flag("RUN_SWEEPERS"),
            sweeps: SweepSchedule::from_env(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.is_production()
    }

    /// Whether `simulator` webhook events are accepted.
    pub fn simulator_allowed(&self) -> bool {
        self.payments.simulator_enabled && !self.is_production()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn flag(name: &str) -> bool {
    std::env::var(name).map(|v| parse_flag(&v)).unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
