use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{AuthAdmin, ADMIN_COOKIE};
use crate::db::admin::AdminRepo;
use crate::db::{ExhibitionRepo, TicketRepo};
use crate::models::exhibition::{ExhibitionIdRequest, UpdateExhibitionStatusRequest};
use crate::models::ticket::UpdateTicketStatusRequest;
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};
use crate::AppState;

#[derive(Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
struct AdminPayload {
    email: String,
    role: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminStatusPayload {
    is_admin: bool,
    admin_id: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<AdminLoginRequest>,
) -> Result<Response, AppError> {
    if req.email != state.config.admin_email || req.password != state.config.admin_password {
        return Err(AppError::AuthError("Invalid admin credentials".to_string()));
    }

    let token = state.auth.issue_admin_token()?;
    let cookie = state.auth.session_cookie(ADMIN_COOKIE, &token);

    let payload = AdminPayload {
        email: req.email,
        role: "admin",
    };
    Ok(([cookie], success(payload, "Admin login successful")).into_response())
}

pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = state.auth.clear_cookie(ADMIN_COOKIE);
    ([cookie], empty_success("Admin logged out")).into_response()
}

pub async fn status(admin: AuthAdmin) -> Response {
    let payload = AdminStatusPayload {
        is_admin: true,
        admin_id: admin.admin_id,
    };
    success(payload, "Admin session active").into_response()
}

pub async fn all_tickets(
    State(state): State<AppState>,
    _admin: AuthAdmin,
) -> Result<Response, AppError> {
    let tickets = TicketRepo::new(&state.pool).all().await?;
    Ok(success(tickets, "Tickets fetched").into_response())
}

pub async fn update_ticket_status(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Json(req): Json<UpdateTicketStatusRequest>,
) -> Result<Response, AppError> {
    TicketRepo::new(&state.pool)
        .update_status(req.ticket_id, &req.status)
        .await?;
    Ok(empty_success("Ticket status updated").into_response())
}

pub async fn update_exhibition_status(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Json(req): Json<UpdateExhibitionStatusRequest>,
) -> Result<Response, AppError> {
    ExhibitionRepo::new(&state.pool)
        .update_status(req.exhibition_id, &req.status)
        .await?;
    Ok(empty_success("Exhibition status updated").into_response())
}

pub async fn delete_exhibition(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Json(req): Json<ExhibitionIdRequest>,
) -> Result<Response, AppError> {
    ExhibitionRepo::new(&state.pool)
        .delete(req.exhibition_id)
        .await?;
    Ok(empty_success("Exhibition Deleted").into_response())
}

pub async fn stats(State(state): State<AppState>, _admin: AuthAdmin) -> Result<Response, AppError> {
    let stats = AdminRepo::new(&state.pool).stats().await?;
    Ok(success(stats, "Dashboard stats fetched").into_response())
}
