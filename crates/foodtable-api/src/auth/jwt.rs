// JWT token service for session cookies
// Decision: Use HS256 algorithm for simplicity (symmetric key)
// Decision: The caller-supplied identity object becomes the claim set as-is;
// only `exp` and `iat` are owned by the server

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::config::JwtConfig;

/// Claims carried by a session token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionClaims {
    /// Identity email as supplied by the issuer (any JSON value, null when absent)
    #[serde(default)]
    pub email: Value,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Remaining caller-supplied identity fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionClaims {
    /// The identity email, when the issuer supplied it as a string
    pub fn email(&self) -> Option<&str> {
        self.email.as_str()
    }
}

/// JWT service for session token generation and validation
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Sign an identity payload into a session token
    pub fn generate_session_token(&self, identity: Map<String, Value>) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::from_std(self.config.token_lifetime)?;

        let mut claims = identity;
        claims.insert("iat".to_string(), Value::from(now.timestamp()));
        claims.insert("exp".to_string(), Value::from(exp.timestamp()));

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to encode session token")
    }

    /// Verify signature and expiry, then decode the identity
    pub fn validate_session_token(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Identity payloads are opaque; an `aud` claim is carried, not checked
        validation.validate_aud = false;
        validation.leeway = 0;

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .context("Invalid session token")?;

        Ok(token_data.claims)
    }

    /// Get session lifetime in seconds
    pub fn token_lifetime_secs(&self) -> i64 {
        self.config.token_lifetime.as_secs() as i64
    }
}
