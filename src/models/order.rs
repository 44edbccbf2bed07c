use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Admin-advanced linear progression; no reverse transitions.
pub const ORDER_STATUSES: [&str; 4] = ["Order Placed", "Packing", "Shipped", "Delivered"];

pub const STATUS_DELIVERED: &str = "Delivered";

/// Line-item snapshot embedded in the order so history survives product
/// deletion. Never recomputed from live product state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    #[serde(default)]
    pub image: String,
}

/// Shipping address snapshot, embedded rather than referenced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Json<Vec<OrderItem>>,
    pub amount: Decimal,
    pub address: Json<OrderAddress>,
    pub status: String,
    pub payment: bool,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderItem>,
    pub amount: Decimal,
    pub address: OrderAddress,
    pub payment_method: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderIdRequest {
    pub order_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub order_id: Uuid,
    pub status: String,
}
