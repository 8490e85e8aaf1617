// Authentication configuration loaded from environment variables.
// Decision: Cookie attributes follow the deployment environment
// Decision: A missing secret falls back to a random per-process secret (sessions
// do not survive restarts)

use axum_extra::extract::cookie::SameSite;
use rand::Rng;
use std::time::Duration;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "token";

/// Default session lifetime: one year
const DEFAULT_TOKEN_LIFETIME_DAYS: u64 = 365;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWTs
    pub secret: String,
    /// Session token lifetime
    pub token_lifetime: Duration,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_lifetime: Duration::from_secs(DEFAULT_TOKEN_LIFETIME_DAYS * 24 * 60 * 60),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Deployment environment, drives cookie attributes
    pub environment: Environment,
    /// Require the session email to match on `/my-ordered-food/:email`
    pub enforce_order_owner: bool,
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let environment = std::env::var("APP_ENV")
            .map(|s| Environment::from_str(&s))
            .unwrap_or_default();

        let secret = std::env::var("ACCESS_TOKEN_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!(
                    "ACCESS_TOKEN_SECRET not set, using a random secret (sessions reset on restart)"
                );
                let bytes: [u8; 32] = rand::thread_rng().gen();
                hex::encode(bytes)
            });

        let token_lifetime = std::env::var("AUTH_TOKEN_LIFETIME_DAYS")
            .ok()
            .and_then(|s| parse_token_lifetime_days(&s))
            .unwrap_or_else(|| JwtConfig::default().token_lifetime);

        let enforce_order_owner = std::env::var("AUTH_ENFORCE_ORDER_OWNER")
            .map(|s| s.to_lowercase() == "true" || s == "1")
            .unwrap_or(false);

        Self {
            jwt: JwtConfig {
                secret,
                token_lifetime,
            },
            environment,
            enforce_order_owner,
        }
    }

    /// Whether the session cookie carries the `Secure` attribute
    pub fn secure_cookies(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Production frontends live on another origin, so the cookie must be cross-site
    pub fn same_site(&self) -> SameSite {
        match self.environment {
            Environment::Production => SameSite::None,
            Environment::Development => SameSite::Strict,
        }
    }
}

/// Longest accepted session lifetime
const MAX_TOKEN_LIFETIME_DAYS: u64 = 100 * 365;

/// Parse AUTH_TOKEN_LIFETIME_DAYS, rejecting values that are not a day count or too large to sign
fn parse_token_lifetime_days(s: &str) -> Option<Duration> {
    let Ok(days) = s.trim().parse::<u64>() else {
        tracing::warn!(value = %s, "Invalid AUTH_TOKEN_LIFETIME_DAYS, using default");
        return None;
    };

    match days.checked_mul(24 * 60 * 60) {
        Some(secs) if days <= MAX_TOKEN_LIFETIME_DAYS => Some(Duration::from_secs(secs)),
        _ => {
            tracing::warn!(
                days,
                max_days = MAX_TOKEN_LIFETIME_DAYS,
                "AUTH_TOKEN_LIFETIME_DAYS too large, using default"
            );
            None
        }
    }
}
