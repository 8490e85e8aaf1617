// Session guard extractor
// Decision: The guard is an extractor, so a route is protected exactly when its
// handler takes `AuthUser`
// Decision: Missing and invalid tokens are indistinguishable to the client

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use super::{
    config::{AuthConfig, SESSION_COOKIE},
    jwt::JwtService,
};

/// Authentication error
#[derive(Debug, Clone, Serialize)]
pub struct AuthError {
    pub message: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl AuthError {
    pub fn unauthorized() -> Self {
        Self {
            message: "unauthorized access".to_string(),
            status: StatusCode::UNAUTHORIZED,
        }
    }

    pub fn forbidden() -> Self {
        Self {
            message: "forbidden access".to_string(),
            status: StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Authenticated identity decoded from the session cookie
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct AuthUser {
    /// Identity email (None when the token carries no string email)
    pub email: Option<String>,
    /// Remaining identity fields supplied when the token was issued
    pub claims: Map<String, Value>,
}

impl AuthUser {
    /// Allow only the owner of `email` through
    pub fn ensure_owner(&self, email: &str) -> Result<(), AuthError> {
        if self.email.as_deref() != Some(email) {
            tracing::debug!(
                session_email = ?self.email,
                requested_email = %email,
                "Session does not own requested resource"
            );
            return Err(AuthError::forbidden());
        }
        Ok(())
    }
}

/// Auth state shared across routes
#[derive(Clone)]
pub struct AuthState {
    pub config: AuthConfig,
    pub jwt_service: Arc<JwtService>,
}

impl AuthState {
    pub fn new(config: AuthConfig) -> Self {
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        Self {
            config,
            jwt_service,
        }
    }
}

/// Extractor for authenticated user
/// This is required - returns 401 if not authenticated
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        extract_auth_user(parts, &auth_state)
    }
}

/// Extract authenticated user from the session cookie
fn extract_auth_user(parts: &Parts, auth_state: &AuthState) -> Result<AuthUser, AuthError> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
        .ok_or_else(AuthError::unauthorized)?;

    let claims = auth_state
        .jwt_service
        .validate_session_token(&token)
        .map_err(|e| {
            tracing::debug!("Session validation failed: {:#}", e);
            AuthError::unauthorized()
        })?;

    Ok(AuthUser {
        email: claims.email().map(str::to_string),
        claims: claims.extra,
    })
}
