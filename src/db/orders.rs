use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::order::{Order, PlaceOrderRequest, ORDER_STATUSES};
use crate::utils::error::AppError;

#[derive(Clone)]
pub struct OrderRepo {
    pool: PgPool,
}

impl OrderRepo {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    /// Places an order as one transaction: a conditional atomic decrement per
    /// line item, the order-row insert with item and address snapshots, and
    /// the cart clear. If any item's decrement matches zero rows the whole
    /// transaction rolls back, undoing every earlier decrement — the order is
    /// all-or-nothing across the cart.
    pub async fn place(&self, user_id: Uuid, req: &PlaceOrderRequest) -> Result<Uuid, AppError> {
        let mut tx = self.pool.begin().await?;

        for item in &req.items {
            let updated = sqlx::query(
                r#"
                UPDATE products
                SET stock = stock - $2, updated_at = now()
                WHERE id = $1 AND stock >= $2
                "#,
            )
            .bind(item.product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                // Re-read to distinguish a missing product from a shortage;
                // the rollback restores every earlier decrement either way.
                let stock = sqlx::query_as::<_, (i32,)>(
                    "SELECT stock FROM products WHERE id = $1",
                )
                .bind(item.product_id)
                .fetch_optional(&mut *tx)
                .await?;

                return Err(match stock {
                    None => AppError::NotFound(format!("Product {} not found", item.name)),
                    Some((available,)) => AppError::InsufficientStock(format!(
                        "Insufficient stock for {}. Available: {}, Requested: {}",
                        item.name, available, item.quantity
                    )),
                });
            }
        }

        let (order_id,) = sqlx::query_as::<_, (Uuid,)>(
            r#"
            INSERT INTO orders (user_id, items, amount, address, payment_method)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(Json(&req.items))
        .bind(req.amount)
        .bind(Json(&req.address))
        .bind(&req.payment_method)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET cart = '{}', updated_at = now() WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(order_id)
    }

    pub async fn for_user(&self, user_id: Uuid) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn all(&self) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    pub async fn get(&self, order_id: Uuid) -> Result<Order, AppError> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }

    /// Admin-advanced linear progression (Order Placed -> Packing -> Shipped
    /// -> Delivered). No reverse transition is defined.
    pub async fn update_status(&self, order_id: Uuid, status: &str) -> Result<(), AppError> {
        if !ORDER_STATUSES.contains(&status) {
            return Err(AppError::ValidationError("Invalid order status".to_string()));
        }

        let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(order_id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Order not found".to_string()));
        }
        Ok(())
    }
}
