// Food item HTTP routes
// Decision: Reads that match nothing answer 200 with `null`, except the
// order-count increment which answers 404

use axum::{
    extract::{FromRef, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::common::ApiError;
use crate::auth::{AuthState, AuthUser};
use crate::storage::{Database, Document, InsertOneResult, TOP_SELLING_LIMIT};

/// App state for food routes
#[derive(Clone)]
pub struct FoodsState {
    pub db: Arc<Database>,
    pub auth: AuthState,
}

impl FromRef<FoodsState> for AuthState {
    fn from_ref(input: &FoodsState) -> Self {
        input.auth.clone()
    }
}

/// Query parameters for food search
#[derive(Debug, Deserialize)]
pub struct SearchFoodQuery {
    /// Name fragment, matched case-insensitively anywhere in `foodName`
    #[serde(rename = "foodName")]
    pub food_name: Option<String>,
}

/// Create food routes
pub fn routes(state: FoodsState) -> Router {
    Router::new()
        .route("/allFood", get(list_foods))
        .route("/top-selling", get(top_selling))
        .route("/single-food/:id", get(get_food))
        .route("/my-added-food/:email", get(list_my_foods))
        .route("/findEmail/:id", get(find_owner))
        .route("/myFoods", post(create_food))
        .route("/increaseOrderCount/:id", post(increase_order_count))
        .route("/search-food", get(search_foods))
        .with_state(state)
}

/// GET /allFood - List every food item
pub async fn list_foods(State(state): State<FoodsState>) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.db.list_foods().await?))
}

/// GET /top-selling - Food items with the highest order counts
pub async fn top_selling(
    State(state): State<FoodsState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.db.top_selling_foods(TOP_SELLING_LIMIT).await?))
}

/// GET /single-food/:id - Food item detail (session required)
pub async fn get_food(
    State(state): State<FoodsState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>, ApiError> {
    Ok(Json(state.db.get_food(&id).await?))
}

/// GET /my-added-food/:email - Food items added by the session's own user
pub async fn list_my_foods(
    State(state): State<FoodsState>,
    user: AuthUser,
    Path(email): Path<String>,
) -> Result<Json<Vec<Document>>, ApiError> {
    user.ensure_owner(&email)?;
    Ok(Json(state.db.list_foods_by_owner(&email).await?))
}

/// GET /findEmail/:id - Food item lookup used to resolve its owner
pub async fn find_owner(
    State(state): State<FoodsState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>, ApiError> {
    Ok(Json(state.db.get_food(&id).await?))
}

/// POST /myFoods - Add a food item
pub async fn create_food(
    State(state): State<FoodsState>,
    Json(food): Json<Document>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let result = state.db.create_food(food).await?;
    tracing::info!(food_id = %result.inserted_id, "Food item created");
    Ok(Json(result))
}

/// POST /increaseOrderCount/:id - Atomically bump a food item's order count
pub async fn increase_order_count(
    State(state): State<FoodsState>,
    Path(id): Path<String>,
) -> Result<&'static str, ApiError> {
    let result = state.db.increment_order_count(&id).await?;
    if result.matched_count == 0 {
        return Err(ApiError::NotFound("Food item is not found!".to_string()));
    }

    Ok("Order successfully increase!")
}

/// GET /search-food?foodName= - Case-insensitive name search
pub async fn search_foods(
    State(state): State<FoodsState>,
    Query(query): Query<SearchFoodQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.db.search_foods(query.food_name.as_deref()).await?))
}
