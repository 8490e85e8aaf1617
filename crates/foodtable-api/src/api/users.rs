// Users API routes
// Decision: Registration stores the submitted document as-is, no duplicate check

use crate::storage::{Database, Document, InsertOneResult};
use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;

use super::common::ApiError;

/// App state for users routes
#[derive(Clone)]
pub struct UsersState {
    pub db: Arc<Database>,
}

impl UsersState {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

/// Create users routes
pub fn routes(state: UsersState) -> Router {
    Router::new()
        .route("/users", post(create_user))
        .with_state(state)
}

/// POST /users - Register a user
pub async fn create_user(
    State(state): State<UsersState>,
    Json(user): Json<Document>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let result = state.db.create_user(user).await?;
    tracing::info!(user_id = %result.inserted_id, "User registered");
    Ok(Json(result))
}
