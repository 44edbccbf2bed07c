use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::CartRepo;
use crate::utils::error::AppError;
use crate::utils::response::success;
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub item_id: Uuid,
    pub quantity: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub item_id: Uuid,
    pub quantity: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub item_id: Uuid,
}

#[derive(Serialize)]
struct CartCountPayload {
    count: i64,
}

pub async fn add(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<AddToCartRequest>,
) -> Result<Response, AppError> {
    let quantity = req.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::ValidationError(
            "Quantity must be at least 1".to_string(),
        ));
    }
    let cart = CartRepo::new(&state.pool)
        .add(user_id, req.item_id, quantity)
        .await?;
    Ok(success(cart, "Added To Cart").into_response())
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<UpdateCartRequest>,
) -> Result<Response, AppError> {
    if req.quantity < 0 {
        return Err(AppError::ValidationError(
            "Quantity cannot be negative".to_string(),
        ));
    }
    let cart = CartRepo::new(&state.pool)
        .set_quantity(user_id, req.item_id, req.quantity)
        .await?;
    Ok(success(cart, "Cart Updated").into_response())
}

pub async fn get(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Response, AppError> {
    let cart = CartRepo::new(&state.pool).get(user_id).await?;
    Ok(success(cart, "Cart fetched").into_response())
}

pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<RemoveFromCartRequest>,
) -> Result<Response, AppError> {
    let cart = CartRepo::new(&state.pool)
        .remove(user_id, req.item_id)
        .await?;
    Ok(success(cart, "Removed From Cart").into_response())
}

pub async fn clear(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Response, AppError> {
    let cart = CartRepo::new(&state.pool).clear(user_id).await?;
    Ok(success(cart, "Cart Cleared").into_response())
}

pub async fn count(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Response, AppError> {
    let count = CartRepo::new(&state.pool).count(user_id).await?;
    Ok(success(CartCountPayload { count }, "Cart count fetched").into_response())
}
