//! Service configuration

use rust_decimal::Decimal;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Order sync service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL; unset in development selects the in-memory store
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Tenant every reconciled record belongs to
    pub tenant_id: String,
    pub order_number_prefix: String,
    /// Provenance tag written on parties and orders
    pub order_origin: String,
    /// Initial on-hand quantity for storefront-created catalog items
    pub default_stock: i64,
    /// Unit cost = unit price × this ratio for new catalog items
    pub cost_ratio: Decimal,
    /// HMAC secret for `x-storefront-signature`; None disables the check
    pub webhook_secret: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<Option<String>, BoxError> {
        match std::env::var(name).ok().filter(|v| !v.is_empty()) {
            Some(val) => Ok(Some(val)),
            None if environment == "development" => Ok(None),
            None => Err(format!("{name} must be set in {environment} environment").into()),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        if database_url.is_none() && environment != "development" {
            return Err("DATABASE_URL must be set".into());
        }

        let cost_ratio = match std::env::var("STOREFRONT_COST_RATIO") {
            Ok(raw) => raw
                .parse::<Decimal>()
                .map_err(|e| format!("STOREFRONT_COST_RATIO is not a decimal: {e}"))?,
            Err(_) => Decimal::new(7, 1),
        };

        Ok(Self {
            database_url,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            tenant_id: std::env::var("TENANT_ID").unwrap_or_else(|_| "default".into()),
            order_number_prefix: std::env::var("ORDER_NUMBER_PREFIX")
                .unwrap_or_else(|_| "SO".into()),
            order_origin: std::env::var("ORDER_ORIGIN").unwrap_or_else(|_| "storefront".into()),
            default_stock: std::env::var("STOREFRONT_DEFAULT_STOCK")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(9999),
            cost_ratio,
            webhook_secret: Self::require_secret("STOREFRONT_WEBHOOK_SECRET", &environment)?,
            environment,
        })
    }
}
