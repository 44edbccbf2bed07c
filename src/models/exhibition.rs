use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_SOLD_OUT: &str = "sold-out";
pub const STATUS_CANCELLED: &str = "cancelled";
pub const STATUS_COMPLETED: &str = "completed";

pub const EXHIBITION_STATUSES: [&str; 4] = [
    STATUS_ACTIVE,
    STATUS_SOLD_OUT,
    STATUS_CANCELLED,
    STATUS_COMPLETED,
];

pub const DEFAULT_VENUE: &str = "Palette Play Gallery";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Exhibition {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub venue: String,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub total_tickets: i32,
    pub available_tickets: i32,
    pub ticket_price: Decimal,
    pub image: String,
    pub status: String,
    pub month: i32,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddExhibitionRequest {
    pub title: String,
    pub description: String,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub venue: Option<String>,
    pub total_tickets: i32,
    pub ticket_price: Decimal,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExhibitionRequest {
    pub exhibition_id: Uuid,
    pub title: String,
    pub description: String,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub venue: Option<String>,
    pub total_tickets: i32,
    pub ticket_price: Decimal,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitionIdRequest {
    pub exhibition_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExhibitionStatusRequest {
    pub exhibition_id: Uuid,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ExhibitionListQuery {
    pub month: Option<i32>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseTicketsRequest {
    pub exhibition_id: Uuid,
    pub quantity: i32,
    pub payment_method: String,
}
