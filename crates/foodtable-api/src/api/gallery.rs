// Gallery API routes

use crate::storage::{Database, Document, InsertOneResult};
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use super::common::ApiError;

/// App state for gallery routes
#[derive(Clone)]
pub struct GalleryState {
    pub db: Arc<Database>,
}

impl GalleryState {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

/// Create gallery routes
pub fn routes(state: GalleryState) -> Router {
    Router::new()
        .route("/gallery", get(list_gallery).post(create_gallery_entry))
        .with_state(state)
}

/// GET /gallery - List gallery entries
pub async fn list_gallery(
    State(state): State<GalleryState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.db.list_gallery().await?))
}

/// POST /gallery - Add a gallery entry
pub async fn create_gallery_entry(
    State(state): State<GalleryState>,
    Json(entry): Json<Document>,
) -> Result<Json<InsertOneResult>, ApiError> {
    Ok(Json(state.db.create_gallery_entry(entry).await?))
}
