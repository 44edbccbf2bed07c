use sqlx::PgPool;
use uuid::Uuid;

use crate::models::address::{AddAddressRequest, Address, UpdateAddressRequest, DEFAULT_COUNTRY};
use crate::utils::error::AppError;

#[derive(Clone)]
pub struct AddressRepo {
    pool: PgPool,
}

impl AddressRepo {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    /// A user's first address becomes their default automatically.
    pub async fn add(&self, user_id: Uuid, req: &AddAddressRequest) -> Result<Address, AppError> {
        let mut tx = self.pool.begin().await?;

        let (existing,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM addresses WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

        let address = sqlx::query_as::<_, Address>(
            r#"
            INSERT INTO addresses (user_id, first_name, last_name, address, city, country, is_default)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.address)
        .bind(&req.city)
        .bind(DEFAULT_COUNTRY)
        .bind(existing == 0)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(address)
    }

    pub async fn for_user(&self, user_id: Uuid) -> Result<Vec<Address>, AppError> {
        let addresses = sqlx::query_as::<_, Address>(
            "SELECT * FROM addresses WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(addresses)
    }

    pub async fn update(&self, user_id: Uuid, req: &UpdateAddressRequest) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE addresses
            SET first_name = $3, last_name = $4, address = $5, city = $6, updated_at = now()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(req.id)
        .bind(user_id)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.address)
        .bind(&req.city)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Address not found".to_string()));
        }
        Ok(())
    }

    /// Deletes an address. When the default is deleted, the oldest remaining
    /// address is promoted so the one-default invariant holds whenever the
    /// user still has addresses.
    pub async fn delete(&self, user_id: Uuid, address_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let (was_default,): (bool,) = sqlx::query_as(
            "SELECT is_default FROM addresses WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(address_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Address not found".to_string()))?;

        sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(address_id)
            .execute(&mut *tx)
            .await?;

        if was_default {
            sqlx::query(
                r#"
                UPDATE addresses
                SET is_default = TRUE, updated_at = now()
                WHERE id = (
                    SELECT id FROM addresses
                    WHERE user_id = $1
                    ORDER BY created_at
                    LIMIT 1
                )
                "#,
            )
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Unset-all-then-set-one inside a transaction, so exactly one default
    /// survives every change.
    pub async fn set_default(&self, user_id: Uuid, address_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM addresses WHERE id = $1 AND user_id = $2 FOR UPDATE")
                .bind(address_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(AppError::NotFound("Address not found".to_string()));
        }

        sqlx::query("UPDATE addresses SET is_default = FALSE, updated_at = now() WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE addresses SET is_default = TRUE, updated_at = now() WHERE id = $1")
            .bind(address_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
