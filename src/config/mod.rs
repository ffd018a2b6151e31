use crate::core::{AppError, Result};
use std::env;
use std::time::Duration;

pub mod server;

pub use server::ServerConfig;

pub const PAYPAL_SANDBOX_URL: &str = "https://api-m.sandbox.paypal.com";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub paypal: PaypalConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// PayPal REST credentials and endpoint
#[derive(Debug, Clone)]
pub struct PaypalConfig {
    pub client_id: String,
    pub client_secret: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub brand_name: Option<String>,
}

impl PaypalConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            var(key).ok_or_else(|| AppError::Configuration(format!("{} not set", key)))
        };

        let config = Config {
            app: AppConfig {
                env: var("APP_ENV").unwrap_or_else(|| "development".to_string()),
                log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            },
            server: ServerConfig::new(
                var("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                var("SERVER_PORT")
                    .unwrap_or_else(|| "8080".to_string())
                    .parse()
                    .map_err(|_| AppError::Configuration("Invalid SERVER_PORT".to_string()))?,
            ),
            paypal: PaypalConfig {
                client_id: required("PAYPAL_CLIENT_ID")?,
                client_secret: required("PAYPAL_CLIENT_SECRET")?,
                base_url: var("PAYPAL_BASE_URL")
                    .unwrap_or_else(|| PAYPAL_SANDBOX_URL.to_string()),
                timeout_secs: var("PAYPAL_TIMEOUT_SECS")
                    .unwrap_or_else(|| "30".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid PAYPAL_TIMEOUT_SECS".to_string())
                    })?,
                brand_name: var("PAYPAL_BRAND_NAME").filter(|name| !name.is_empty()),
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Configuration(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.paypal.timeout_secs == 0 {
            return Err(AppError::Configuration(
                "PayPal timeout must be greater than 0".to_string(),
            ));
        }

        if self.paypal.client_id.trim().is_empty() || self.paypal.client_secret.trim().is_empty() {
            return Err(AppError::Configuration(
                "PayPal credentials must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
