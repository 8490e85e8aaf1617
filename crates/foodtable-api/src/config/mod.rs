// Server configuration loaded from environment variables
//
// Auth and storage settings live next to the code that uses them
// (`AuthConfig::from_env`, `StorageConfig::from_env`); this module gathers
// them with the listener and CORS settings.

use axum::http::HeaderValue;

use crate::auth::AuthConfig;
use crate::storage::StorageConfig;

const DEFAULT_PORT: u16 = 5000;

/// Frontend origins allowed when CORS_ALLOWED_ORIGINS is not set
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "https://food-table-restaurant.web.app",
    "https://food-table-restaurant.firebaseapp.com",
];

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to listen on (all interfaces)
    pub port: u16,
    /// Origins allowed to make credentialed cross-origin requests
    pub cors_origins: Vec<HeaderValue>,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = match std::env::var("PORT") {
            Ok(s) => s.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %s, "Invalid PORT, using default {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        let cors_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .ok()
            .filter(|s| !s.is_empty())
            .map(|s| parse_origins(&s))
            .unwrap_or_else(|| {
                DEFAULT_CORS_ORIGINS
                    .iter()
                    .copied()
                    .map(HeaderValue::from_static)
                    .collect()
            });

        Self {
            port,
            cors_origins,
            storage: StorageConfig::from_env(),
            auth: AuthConfig::from_env(),
        }
    }
}

/// Parse a comma-separated origin list, skipping entries that are not valid header values
fn parse_origins(s: &str) -> Vec<HeaderValue> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}
