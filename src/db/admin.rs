use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::utils::error::AppError;

/// Top-line counts for the admin dashboard.
#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_orders: i64,
    pub total_exhibitions: i64,
    pub total_tickets: i64,
    pub order_revenue: Decimal,
    pub ticket_revenue: Decimal,
}

#[derive(Clone)]
pub struct AdminRepo {
    pool: PgPool,
}

impl AdminRepo {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn stats(&self) -> Result<DashboardStats, AppError> {
        let stats = sqlx::query_as::<_, DashboardStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM products) AS total_products,
                (SELECT COUNT(*) FROM orders) AS total_orders,
                (SELECT COUNT(*) FROM exhibitions) AS total_exhibitions,
                (SELECT COUNT(*) FROM tickets) AS total_tickets,
                (SELECT COALESCE(SUM(amount), 0) FROM orders) AS order_revenue,
                (SELECT COALESCE(SUM(total_amount), 0) FROM tickets
                 WHERE ticket_status <> 'cancelled') AS ticket_revenue
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }
}
