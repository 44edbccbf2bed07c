use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::auth::AuthUser;
use crate::db::AddressRepo;
use crate::models::address::{AddAddressRequest, AddressIdRequest, UpdateAddressRequest};
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};
use crate::AppState;

fn validate_fields(
    first_name: &str,
    last_name: &str,
    address: &str,
    city: &str,
) -> Result<(), AppError> {
    if first_name.trim().is_empty()
        || last_name.trim().is_empty()
        || address.trim().is_empty()
        || city.trim().is_empty()
    {
        return Err(AppError::ValidationError(
            "All address fields are required".to_string(),
        ));
    }
    Ok(())
}

pub async fn add(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<AddAddressRequest>,
) -> Result<Response, AppError> {
    validate_fields(&req.first_name, &req.last_name, &req.address, &req.city)?;
    let address = AddressRepo::new(&state.pool).add(user_id, &req).await?;
    Ok(created(address, "Address Added").into_response())
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Response, AppError> {
    let addresses = AddressRepo::new(&state.pool).for_user(user_id).await?;
    Ok(success(addresses, "Addresses fetched").into_response())
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<UpdateAddressRequest>,
) -> Result<Response, AppError> {
    validate_fields(&req.first_name, &req.last_name, &req.address, &req.city)?;
    AddressRepo::new(&state.pool).update(user_id, &req).await?;
    Ok(empty_success("Address Updated").into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<AddressIdRequest>,
) -> Result<Response, AppError> {
    AddressRepo::new(&state.pool).delete(user_id, req.id).await?;
    Ok(empty_success("Address Deleted").into_response())
}

pub async fn set_default(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<AddressIdRequest>,
) -> Result<Response, AppError> {
    AddressRepo::new(&state.pool)
        .set_default(user_id, req.id)
        .await?;
    Ok(empty_success("Default Address Updated").into_response())
}
