use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{AuthAdmin, AuthUser};
use crate::db::OrderRepo;
use crate::models::order::{OrderIdRequest, PlaceOrderRequest, UpdateOrderStatusRequest};
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};
use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderPlacedPayload {
    order_id: Uuid,
}

pub async fn place(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<Response, AppError> {
    if req.items.is_empty() {
        return Err(AppError::ValidationError(
            "Order must contain at least one item".to_string(),
        ));
    }
    if req.items.iter().any(|item| item.quantity < 1) {
        return Err(AppError::ValidationError(
            "Item quantities must be at least 1".to_string(),
        ));
    }
    if req.amount < Decimal::ZERO {
        return Err(AppError::ValidationError(
            "Amount cannot be negative".to_string(),
        ));
    }
    if req.payment_method.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Payment method is required".to_string(),
        ));
    }

    let order_id = OrderRepo::new(&state.pool).place(user_id, &req).await?;
    Ok(created(OrderPlacedPayload { order_id }, "Order Placed").into_response())
}

pub async fn user_orders(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Response, AppError> {
    let orders = OrderRepo::new(&state.pool).for_user(user_id).await?;
    Ok(success(orders, "Orders fetched").into_response())
}

pub async fn all_orders(
    State(state): State<AppState>,
    _admin: AuthAdmin,
) -> Result<Response, AppError> {
    let orders = OrderRepo::new(&state.pool).all().await?;
    Ok(success(orders, "Orders fetched").into_response())
}

pub async fn update_status(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> Result<Response, AppError> {
    OrderRepo::new(&state.pool)
        .update_status(req.order_id, &req.status)
        .await?;
    Ok(empty_success("Status Updated").into_response())
}

pub async fn single(
    State(state): State<AppState>,
    Json(req): Json<OrderIdRequest>,
) -> Result<Response, AppError> {
    let order = OrderRepo::new(&state.pool).get(req.order_id).await?;
    Ok(success(order, "Order fetched").into_response())
}
