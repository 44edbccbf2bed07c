use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::domain::rating::{can_rate, rounded_mean};
use crate::models::order::STATUS_DELIVERED;
use crate::models::rating::{
    CanRateStatus, ProductRatingSummary, Rating, RatingWithUser, UserRatingStatus,
};
use crate::utils::error::AppError;

const RATING_UNIQUE: &str = "ratings_product_id_user_id_key";

#[derive(Clone)]
pub struct RatingRepo {
    pool: PgPool,
}

impl RatingRepo {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    /// Adds a rating and folds it into the product's rolling mean in one
    /// transaction. Eligibility requires a delivered order containing the
    /// product; the one-rating-per-user rule is the ratings table's composite
    /// unique key, so a concurrent duplicate surfaces as AlreadyRated rather
    /// than a double count.
    pub async fn add(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        rating: i32,
        review: &str,
    ) -> Result<(Decimal, i32), AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock the product row so the aggregate recompute below cannot race
        // another rating of the same product.
        let product = sqlx::query_as::<_, (Uuid,)>(
            "SELECT id FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;
        if product.is_none() {
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        if !has_delivered_purchase(&mut *tx, user_id, product_id).await? {
            return Err(AppError::NotEligible(
                "You can only rate products you have purchased and received".to_string(),
            ));
        }

        sqlx::query("INSERT INTO ratings (product_id, user_id, rating, review) VALUES ($1, $2, $3, $4)")
            .bind(product_id)
            .bind(user_id)
            .bind(rating)
            .bind(review)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, RATING_UNIQUE) {
                    AppError::AlreadyRated(
                        "You have already rated this product. Each product can only be rated once."
                            .to_string(),
                    )
                } else {
                    e.into()
                }
            })?;

        let (sum, count) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COALESCE(SUM(rating), 0), COUNT(*) FROM ratings WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?;

        let mean = rounded_mean(sum, count);
        sqlx::query(
            "UPDATE products SET rating = $2, total_ratings = $3, updated_at = now() WHERE id = $1",
        )
        .bind(product_id)
        .bind(mean)
        .bind(count as i32)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((mean, count as i32))
    }

    pub async fn for_product(&self, product_id: Uuid) -> Result<ProductRatingSummary, AppError> {
        let product = sqlx::query_as::<_, (Decimal, i32)>(
            "SELECT rating, total_ratings FROM products WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let ratings = sqlx::query_as::<_, RatingWithUser>(
            r#"
            SELECT r.id, r.product_id, r.user_id, r.rating, r.review, r.created_at,
                   u.name AS user_name
            FROM ratings r
            JOIN users u ON u.id = r.user_id
            WHERE r.product_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ProductRatingSummary {
            rating: product.0,
            total_ratings: product.1,
            ratings,
        })
    }

    pub async fn user_status(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<UserRatingStatus, AppError> {
        self.require_product(product_id).await?;

        let user_rating = sqlx::query_as::<_, Rating>(
            "SELECT * FROM ratings WHERE product_id = $1 AND user_id = $2",
        )
        .bind(product_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let has_purchased = has_delivered_purchase(&self.pool, user_id, product_id).await?;
        let has_already_rated = user_rating.is_some();

        Ok(UserRatingStatus {
            user_rating,
            can_rate: can_rate(has_purchased, has_already_rated),
            has_already_rated,
        })
    }

    pub async fn can_user_rate(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<CanRateStatus, AppError> {
        self.require_product(product_id).await?;

        let has_purchased = has_delivered_purchase(&self.pool, user_id, product_id).await?;
        let (has_already_rated,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM ratings WHERE product_id = $1 AND user_id = $2)",
        )
        .bind(product_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(CanRateStatus {
            can_rate: can_rate(has_purchased, has_already_rated),
            has_purchased,
            has_already_rated,
        })
    }

    async fn require_product(&self, product_id: Uuid) -> Result<(), AppError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
                .bind(product_id)
                .fetch_one(&self.pool)
                .await?;
        if !exists.0 {
            return Err(AppError::NotFound("Product not found".to_string()));
        }
        Ok(())
    }
}

/// True when the user has a delivered order whose item snapshot contains the
/// product. Order items are denormalized jsonb, so this scans the snapshot
/// rather than joining the products table.
async fn has_delivered_purchase<'e, E>(
    executor: E,
    user_id: Uuid,
    product_id: Uuid,
) -> Result<bool, AppError>
where
    E: PgExecutor<'e>,
{
    let (purchased,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM orders o, jsonb_array_elements(o.items) AS item
            WHERE o.user_id = $1
              AND o.status = $3
              AND item->>'productId' = $2::text
        )
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .bind(STATUS_DELIVERED)
    .fetch_one(executor)
    .await?;
    Ok(purchased)
}
