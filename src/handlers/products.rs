use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::auth::AuthAdmin;
use crate::db::ProductRepo;
use crate::models::product::{
    AddProductRequest, ProductIdRequest, ProductListQuery, RemoveProductRequest, SearchQuery,
    UpdateProductRequest,
};
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};
use crate::AppState;

const DEFAULT_TOP_RATED: i64 = 4;

#[derive(Deserialize)]
pub struct TopRatedQuery {
    pub limit: Option<i64>,
}

fn validate_pricing(price: Decimal, offer_price: Decimal, stock: i32) -> Result<(), AppError> {
    if price < Decimal::ZERO || offer_price < Decimal::ZERO {
        return Err(AppError::ValidationError(
            "Prices cannot be negative".to_string(),
        ));
    }
    if stock < 0 {
        return Err(AppError::ValidationError(
            "Stock cannot be negative".to_string(),
        ));
    }
    Ok(())
}

pub async fn add(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Json(req): Json<AddProductRequest>,
) -> Result<Response, AppError> {
    if req.name.trim().is_empty() || req.description.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Name and description are required".to_string(),
        ));
    }
    validate_pricing(req.price, req.offer_price, req.stock)?;

    let product = ProductRepo::new(&state.pool).create(&req).await?;
    Ok(created(product, "Product Added").into_response())
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Response, AppError> {
    validate_pricing(req.price, req.offer_price, req.stock)?;
    let product = ProductRepo::new(&state.pool).update(&req).await?;
    Ok(success(product, "Product Updated").into_response())
}

pub async fn remove(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Json(req): Json<RemoveProductRequest>,
) -> Result<Response, AppError> {
    ProductRepo::new(&state.pool).delete(req.id).await?;
    Ok(empty_success("Product Removed").into_response())
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Response, AppError> {
    let page = ProductRepo::new(&state.pool).list(&query).await?;
    Ok(success(page, "Products fetched").into_response())
}

pub async fn single(
    State(state): State<AppState>,
    Json(req): Json<ProductIdRequest>,
) -> Result<Response, AppError> {
    let product = ProductRepo::new(&state.pool).get(req.product_id).await?;
    Ok(success(product, "Product fetched").into_response())
}

pub async fn top_rated(
    State(state): State<AppState>,
    Query(query): Query<TopRatedQuery>,
) -> Result<Response, AppError> {
    let products = ProductRepo::new(&state.pool)
        .top_rated(query.limit.unwrap_or(DEFAULT_TOP_RATED))
        .await?;
    Ok(success(products, "Top rated products fetched").into_response())
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, AppError> {
    if query.q.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Search term is required".to_string(),
        ));
    }
    let products = ProductRepo::new(&state.pool)
        .search(query.q.trim(), query.limit.unwrap_or(10))
        .await?;
    Ok(success(products, "Search results").into_response())
}
