// Food Table API Library
// Decision: Router assembly lives in the library so the binary and the HTTP
// tests build the exact same app

use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

// Resource routes
pub mod api;

// Session authentication
pub mod auth;

// Environment configuration
pub mod config;

// Storage layer
pub mod storage;

use crate::auth::{AuthConfig, AuthState};
use crate::storage::Database;

/// GET / - Liveness check
async fn root() -> &'static str {
    "hello server"
}

/// Build the full application router
pub fn app(db: Arc<Database>, auth_config: AuthConfig, cors_origins: Vec<HeaderValue>) -> Router {
    let auth_state = AuthState::new(auth_config);

    let users_state = api::users::UsersState::new(db.clone());
    let foods_state = api::foods::FoodsState {
        db: db.clone(),
        auth: auth_state.clone(),
    };
    let orders_state = api::orders::OrdersState {
        db: db.clone(),
        auth: auth_state.clone(),
    };
    let gallery_state = api::gallery::GalleryState::new(db);

    let app = Router::new()
        .route("/", get(root))
        .merge(auth::routes(auth_state))
        .merge(api::users::routes(users_state))
        .merge(api::foods::routes(foods_state))
        .merge(api::orders::routes(orders_state))
        .merge(api::gallery::routes(gallery_state));

    // Add CORS layer only if origins are configured
    let app = if !cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                ])
                .allow_credentials(true),
        )
    } else {
        app
    };

    app.layer(TraceLayer::new_for_http())
}
