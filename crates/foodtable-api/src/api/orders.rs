// Order HTTP routes
// Decision: The buyer-identity check on /my-ordered-food is off unless
// AUTH_ENFORCE_ORDER_OWNER is set; the session itself is always required

use axum::{
    extract::{FromRef, Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use std::sync::Arc;

use super::common::ApiError;
use crate::auth::{AuthState, AuthUser};
use crate::storage::{Database, DeleteResult, Document, InsertOneResult};

/// App state for order routes
#[derive(Clone)]
pub struct OrdersState {
    pub db: Arc<Database>,
    pub auth: AuthState,
}

impl FromRef<OrdersState> for AuthState {
    fn from_ref(input: &OrdersState) -> Self {
        input.auth.clone()
    }
}

/// Create order routes
pub fn routes(state: OrdersState) -> Router {
    Router::new()
        .route("/orderFood", post(create_order))
        .route("/delete-order-food/:id", delete(delete_order))
        .route("/my-ordered-food/:email", get(list_my_orders))
        .route("/find-exist-order/:id", get(find_existing_order))
        .with_state(state)
}

/// POST /orderFood - Place an order
pub async fn create_order(
    State(state): State<OrdersState>,
    Json(order): Json<Document>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let result = state.db.create_order(order).await?;
    tracing::info!(order_id = %result.inserted_id, "Order placed");
    Ok(Json(result))
}

/// DELETE /delete-order-food/:id - Remove an order
pub async fn delete_order(
    State(state): State<OrdersState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    Ok(Json(state.db.delete_order(&id).await?))
}

/// GET /my-ordered-food/:email - Orders placed by a buyer (session required)
pub async fn list_my_orders(
    State(state): State<OrdersState>,
    user: AuthUser,
    Path(email): Path<String>,
) -> Result<Json<Vec<Document>>, ApiError> {
    if state.auth.config.enforce_order_owner {
        user.ensure_owner(&email)?;
    }
    Ok(Json(state.db.list_orders_by_buyer(&email).await?))
}

/// GET /find-exist-order/:id - Existing order for a food item, used to detect repeat orders
pub async fn find_existing_order(
    State(state): State<OrdersState>,
    Path(food_id): Path<String>,
) -> Result<Json<Option<Document>>, ApiError> {
    Ok(Json(state.db.find_order_by_food(&food_id).await?))
}
