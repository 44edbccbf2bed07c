use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::product::{
    AddProductRequest, Pagination, Product, ProductListQuery, ProductPage, UpdateProductRequest,
};
use crate::utils::error::AppError;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Clone)]
pub struct ProductRepo {
    pool: PgPool,
}

impl ProductRepo {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn create(&self, req: &AddProductRequest) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, offer_price, stock, images)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.price)
        .bind(req.offer_price)
        .bind(req.stock)
        .bind(&req.images)
        .fetch_one(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn update(&self, req: &UpdateProductRequest) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $2,
                description = $3,
                price = $4,
                offer_price = $5,
                stock = $6,
                images = COALESCE($7, images),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(req.id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.price)
        .bind(req.offer_price)
        .bind(req.stock)
        .bind(req.images.as_ref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product not found".to_string()));
        }
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    /// Storefront listing with search, filters, sorting and pagination.
    pub async fn list(&self, query: &ProductListQuery) -> Result<ProductPage, AppError> {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let page = query.page.unwrap_or(1).max(1);
        let offset = (page - 1) * limit;

        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM products");
        Self::push_filters(&mut select, query);
        select.push(" ORDER BY ");
        select.push(Self::sort_clause(query));
        select.push(" LIMIT ");
        select.push_bind(limit);
        select.push(" OFFSET ");
        select.push_bind(offset);

        let products = select
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        Self::push_filters(&mut count, query);
        let total_products: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let total_pages = (total_products + limit - 1) / limit;
        Ok(ProductPage {
            products,
            pagination: Pagination {
                current_page: page,
                total_pages,
                total_products,
                has_next_page: page < total_pages,
                has_prev_page: page > 1,
            },
        })
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ProductListQuery) {
        builder.push(" WHERE TRUE");

        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            builder.push(" AND (name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR description ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
        if query.in_stock_only {
            builder.push(" AND stock > 0");
        }
        if let Some(min_price) = query.min_price {
            builder.push(" AND offer_price >= ");
            builder.push_bind(min_price);
        }
        if let Some(max_price) = query.max_price {
            builder.push(" AND offer_price <= ");
            builder.push_bind(max_price);
        }
        if let Some(min_rating) = query.min_rating {
            builder.push(" AND rating >= ");
            builder.push_bind(min_rating);
        }
    }

    /// Whitelisted sort expressions; anything unrecognized falls back to
    /// creation order.
    fn sort_clause(query: &ProductListQuery) -> &'static str {
        let ascending = query.sort_order.as_deref() == Some("asc");
        match query.sort_by.as_deref() {
            Some("price-low-high") => "offer_price ASC",
            Some("price-high-low") => "offer_price DESC",
            Some("rating") => "rating DESC, total_ratings DESC",
            Some("name") if ascending => "name ASC",
            Some("name") => "name DESC",
            Some("newest") => "created_at DESC",
            Some("oldest") => "created_at ASC",
            _ if ascending => "created_at ASC",
            _ => "created_at DESC",
        }
    }

    pub async fn top_rated(&self, limit: i64) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE rating >= 3 AND stock > 0
            ORDER BY rating DESC, total_ratings DESC
            LIMIT $1
            "#,
        )
        .bind(limit.clamp(1, MAX_PAGE_SIZE))
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    /// Quick in-stock search for the storefront search box.
    pub async fn search(&self, term: &str, limit: i64) -> Result<Vec<Product>, AppError> {
        let pattern = format!("%{term}%");
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE (name ILIKE $1 OR description ILIKE $1) AND stock > 0
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(limit.clamp(1, MAX_PAGE_SIZE))
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }
}
