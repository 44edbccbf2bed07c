use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::auth::AuthUser;
use crate::db::RatingRepo;
use crate::domain::rating::is_valid_rating;
use crate::models::product::ProductIdRequest;
use crate::models::rating::AddRatingRequest;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};
use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RatingAddedPayload {
    rating: Decimal,
    total_ratings: i32,
}

pub async fn add(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<AddRatingRequest>,
) -> Result<Response, AppError> {
    if !is_valid_rating(req.rating) {
        return Err(AppError::ValidationError(
            "Rating must be between 1 and 5".to_string(),
        ));
    }

    let (rating, total_ratings) = RatingRepo::new(&state.pool)
        .add(
            user_id,
            req.product_id,
            req.rating,
            req.review.as_deref().unwrap_or(""),
        )
        .await?;

    Ok(created(
        RatingAddedPayload {
            rating,
            total_ratings,
        },
        "Rating added successfully",
    )
    .into_response())
}

pub async fn for_product(
    State(state): State<AppState>,
    Json(req): Json<ProductIdRequest>,
) -> Result<Response, AppError> {
    let summary = RatingRepo::new(&state.pool)
        .for_product(req.product_id)
        .await?;
    Ok(success(summary, "Ratings fetched").into_response())
}

pub async fn user_rating(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<ProductIdRequest>,
) -> Result<Response, AppError> {
    let status = RatingRepo::new(&state.pool)
        .user_status(user_id, req.product_id)
        .await?;
    Ok(success(status, "User rating fetched").into_response())
}

pub async fn can_rate(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<ProductIdRequest>,
) -> Result<Response, AppError> {
    let status = RatingRepo::new(&state.pool)
        .can_user_rate(user_id, req.product_id)
        .await?;
    Ok(success(status, "Eligibility fetched").into_response())
}

/// Ratings are immutable; deletion is always refused.
pub async fn delete(AuthUser(_user_id): AuthUser) -> Result<Response, AppError> {
    Err(AppError::Forbidden(
        "Ratings cannot be deleted once submitted".to_string(),
    ))
}
