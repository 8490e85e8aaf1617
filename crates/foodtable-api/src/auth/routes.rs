// Session HTTP routes
// Decision: The frontend has already authenticated the user; /jwt only turns
// the supplied identity into a signed http-only cookie

use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;
use serde_json::{Map, Value};

use super::{
    config::{AuthConfig, SESSION_COOKIE},
    middleware::AuthState,
};
use crate::api::ApiError;

/// Success flag returned by the session routes
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create session routes
pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/jwt", post(issue_token))
        .route("/logout", post(logout))
        .with_state(state)
}

/// Session cookie with the attributes for the current environment
fn session_cookie(config: &AuthConfig, value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(config.secure_cookies())
        .same_site(config.same_site())
        .build()
}

/// POST /jwt - Sign the supplied identity and set it as the session cookie
pub async fn issue_token(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(identity): Json<Map<String, Value>>,
) -> Result<(CookieJar, Json<SuccessResponse>), ApiError> {
    let token = state.jwt_service.generate_session_token(identity)?;

    let mut cookie = session_cookie(&state.config, token);
    cookie.set_max_age(time::Duration::seconds(state.jwt_service.token_lifetime_secs()));

    tracing::debug!("Issued session cookie");

    Ok((jar.add(cookie), Json(SuccessResponse { success: true })))
}

/// POST /logout - Expire the session cookie immediately
pub async fn logout(
    State(state): State<AuthState>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    let mut cookie = session_cookie(&state.config, String::new());
    cookie.make_removal();

    (jar.add(cookie), Json(SuccessResponse { success: true }))
}
