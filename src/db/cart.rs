use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::cart::Cart;
use crate::utils::error::AppError;

#[derive(Clone)]
pub struct CartRepo {
    pool: PgPool,
}

impl CartRepo {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn get(&self, user_id: Uuid) -> Result<Cart, AppError> {
        let row = sqlx::query_as::<_, (Json<Cart>,)>("SELECT cart FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Ok(row.0 .0)
    }

    pub async fn count(&self, user_id: Uuid) -> Result<i64, AppError> {
        Ok(self.get(user_id).await?.count())
    }

    pub async fn add(&self, user_id: Uuid, product_id: Uuid, quantity: i64) -> Result<Cart, AppError> {
        self.mutate(user_id, |cart| cart.add(product_id, quantity))
            .await
    }

    pub async fn set_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i64,
    ) -> Result<Cart, AppError> {
        self.mutate(user_id, |cart| cart.set_quantity(product_id, quantity))
            .await
    }

    pub async fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<Cart, AppError> {
        self.mutate(user_id, |cart| cart.remove(product_id)).await
    }

    pub async fn clear(&self, user_id: Uuid) -> Result<Cart, AppError> {
        self.mutate(user_id, Cart::clear).await
    }

    /// Rewrites the user's cart under a row lock so concurrent mutations of
    /// the same cart cannot lose writes. No stock check happens here: the
    /// cart is a soft reservation, validated only at order placement.
    async fn mutate<F>(&self, user_id: Uuid, apply: F) -> Result<Cart, AppError>
    where
        F: FnOnce(&mut Cart),
    {
        let mut tx = self.pool.begin().await?;

        let row =
            sqlx::query_as::<_, (Json<Cart>,)>("SELECT cart FROM users WHERE id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let mut cart = row.0 .0;
        apply(&mut cart);

        sqlx::query("UPDATE users SET cart = $2, updated_at = now() WHERE id = $1")
            .bind(user_id)
            .bind(Json(&cart))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(cart)
    }
}
