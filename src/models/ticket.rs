use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const TICKET_STATUSES: [&str; 3] = ["active", "used", "cancelled"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Weak reference: None once the exhibition has been deleted.
    pub exhibition_id: Option<Uuid>,
    pub ticket_number: String,
    pub quantity: i32,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub ticket_status: String,
    pub purchase_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ticket joined with a summary of its exhibition. The exhibition columns are
/// all optional because the referent may have been deleted.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TicketWithExhibition {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exhibition_id: Option<Uuid>,
    pub ticket_number: String,
    pub quantity: i32,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub ticket_status: String,
    pub purchase_date: DateTime<Utc>,
    pub exhibition_title: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    pub venue: Option<String>,
    pub exhibition_image: Option<String>,
}

/// Admin view: ticket joined with exhibition summary and buyer identity.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdminTicket {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exhibition_id: Option<Uuid>,
    pub ticket_number: String,
    pub quantity: i32,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub ticket_status: String,
    pub purchase_date: DateTime<Utc>,
    pub exhibition_title: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    pub venue: Option<String>,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketStatusRequest {
    pub ticket_id: Uuid,
    pub status: String,
}
