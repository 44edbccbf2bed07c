use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::utils::response::success;

pub mod addresses;
pub mod admin;
pub mod cart;
pub mod exhibitions;
pub mod orders;
pub mod products;
pub mod ratings;
pub mod users;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "gallery-api",
    };

    success(payload, "Health check successful").into_response()
}
