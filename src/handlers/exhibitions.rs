use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;

use crate::auth::{AuthAdmin, AuthUser};
use crate::db::{ExhibitionRepo, TicketRepo};
use crate::domain::inventory::MAX_TICKETS_PER_PURCHASE;
use crate::models::exhibition::{
    AddExhibitionRequest, ExhibitionIdRequest, ExhibitionListQuery, PurchaseTicketsRequest,
    UpdateExhibitionRequest,
};
use crate::utils::error::AppError;
use crate::utils::response::{created, success};
use crate::AppState;

fn validate_details(
    title: &str,
    description: &str,
    event_time: &str,
    total_tickets: i32,
    ticket_price: Decimal,
) -> Result<(), AppError> {
    if title.trim().is_empty() || description.trim().is_empty() || event_time.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Title, description and event time are required".to_string(),
        ));
    }
    if total_tickets < 1 {
        return Err(AppError::ValidationError(
            "Total tickets must be at least 1".to_string(),
        ));
    }
    if ticket_price < Decimal::ZERO {
        return Err(AppError::ValidationError(
            "Ticket price cannot be negative".to_string(),
        ));
    }
    Ok(())
}

pub async fn add(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Json(req): Json<AddExhibitionRequest>,
) -> Result<Response, AppError> {
    validate_details(
        &req.title,
        &req.description,
        &req.event_time,
        req.total_tickets,
        req.ticket_price,
    )?;
    let exhibition = ExhibitionRepo::new(&state.pool).create(&req).await?;
    Ok(created(exhibition, "Exhibition Added").into_response())
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Json(req): Json<UpdateExhibitionRequest>,
) -> Result<Response, AppError> {
    validate_details(
        &req.title,
        &req.description,
        &req.event_time,
        req.total_tickets,
        req.ticket_price,
    )?;
    let exhibition = ExhibitionRepo::new(&state.pool).update(&req).await?;
    Ok(success(exhibition, "Exhibition Updated").into_response())
}

pub async fn current_month(State(state): State<AppState>) -> Result<Response, AppError> {
    let exhibitions = ExhibitionRepo::new(&state.pool).current_month().await?;
    Ok(success(exhibitions, "Exhibitions fetched").into_response())
}

pub async fn single(
    State(state): State<AppState>,
    Json(req): Json<ExhibitionIdRequest>,
) -> Result<Response, AppError> {
    let exhibition = ExhibitionRepo::new(&state.pool).get(req.exhibition_id).await?;
    Ok(success(exhibition, "Exhibition fetched").into_response())
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ExhibitionListQuery>,
) -> Result<Response, AppError> {
    if let Some(month) = query.month {
        if !(1..=12).contains(&month) {
            return Err(AppError::ValidationError(
                "Month must be between 1 and 12".to_string(),
            ));
        }
    }
    let exhibitions = ExhibitionRepo::new(&state.pool)
        .by_month(query.month, query.year)
        .await?;
    Ok(success(exhibitions, "Exhibitions fetched").into_response())
}

pub async fn purchase(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<PurchaseTicketsRequest>,
) -> Result<Response, AppError> {
    if !(1..=MAX_TICKETS_PER_PURCHASE).contains(&req.quantity) {
        return Err(AppError::ValidationError(format!(
            "Quantity must be between 1 and {MAX_TICKETS_PER_PURCHASE}"
        )));
    }
    if req.payment_method.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Payment method is required".to_string(),
        ));
    }

    let ticket = ExhibitionRepo::new(&state.pool)
        .purchase(user_id, req.exhibition_id, req.quantity, &req.payment_method)
        .await?;
    Ok(created(ticket, "Tickets purchased successfully").into_response())
}

pub async fn my_tickets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Response, AppError> {
    let tickets = TicketRepo::new(&state.pool).for_user(user_id).await?;
    Ok(success(tickets, "Tickets fetched").into_response())
}
