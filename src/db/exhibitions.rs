use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::domain::inventory::{
    classify_reserve_failure, generate_ticket_number, status_after_reserve, ReserveFailure,
};
use crate::models::exhibition::{
    AddExhibitionRequest, Exhibition, UpdateExhibitionRequest, DEFAULT_VENUE, EXHIBITION_STATUSES,
    STATUS_ACTIVE, STATUS_SOLD_OUT,
};
use crate::models::ticket::TicketWithExhibition;
use crate::utils::error::AppError;

const TICKET_NUMBER_UNIQUE: &str = "tickets_ticket_number_key";
const TICKET_NUMBER_ATTEMPTS: usize = 5;

/// Exhibition summary captured by the reservation update, denormalized into
/// the purchase response.
#[derive(sqlx::FromRow)]
struct ReservedExhibition {
    available_tickets: i32,
    ticket_price: Decimal,
    title: String,
    event_date: NaiveDate,
    event_time: String,
    venue: String,
    image: String,
}

#[derive(Clone)]
pub struct ExhibitionRepo {
    pool: PgPool,
}

impl ExhibitionRepo {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn create(&self, req: &AddExhibitionRequest) -> Result<Exhibition, AppError> {
        let exhibition = sqlx::query_as::<_, Exhibition>(
            r#"
            INSERT INTO exhibitions
                (title, description, venue, event_date, event_time,
                 total_tickets, available_tickets, ticket_price, image, month, year)
            VALUES ($1, $2, $3, $4, $5, $6, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.venue.as_deref().unwrap_or(DEFAULT_VENUE))
        .bind(req.event_date)
        .bind(&req.event_time)
        .bind(req.total_tickets)
        .bind(req.ticket_price)
        .bind(req.image.as_deref().unwrap_or(""))
        .bind(req.event_date.month() as i32)
        .bind(req.event_date.year())
        .fetch_one(&self.pool)
        .await?;
        Ok(exhibition)
    }

    /// Admin edit. The available pool is recomputed from the new total minus
    /// tickets already sold; sold tickets are never un-reserved.
    pub async fn update(&self, req: &UpdateExhibitionRequest) -> Result<Exhibition, AppError> {
        let mut tx = self.pool.begin().await?;

        let counters = sqlx::query_as::<_, (i32, i32)>(
            "SELECT total_tickets, available_tickets FROM exhibitions WHERE id = $1 FOR UPDATE",
        )
        .bind(req.exhibition_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Exhibition not found".to_string()))?;

        let (old_total, old_available) = counters;
        let new_available = crate::domain::inventory::restocked_available(
            req.total_tickets,
            old_total,
            old_available,
        );

        let exhibition = sqlx::query_as::<_, Exhibition>(
            r#"
            UPDATE exhibitions
            SET title = $2,
                description = $3,
                venue = $4,
                event_date = $5,
                event_time = $6,
                total_tickets = $7,
                available_tickets = $8,
                ticket_price = $9,
                image = COALESCE($10, image),
                month = $11,
                year = $12,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(req.exhibition_id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.venue.as_deref().unwrap_or(DEFAULT_VENUE))
        .bind(req.event_date)
        .bind(&req.event_time)
        .bind(req.total_tickets)
        .bind(new_available)
        .bind(req.ticket_price)
        .bind(req.image.as_deref())
        .bind(req.event_date.month() as i32)
        .bind(req.event_date.year())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(exhibition)
    }

    /// Admin status override, the only path that can cancel or complete an
    /// exhibition. Does not touch the ticket pool.
    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<(), AppError> {
        if !EXHIBITION_STATUSES.contains(&status) {
            return Err(AppError::ValidationError(
                "Invalid exhibition status".to_string(),
            ));
        }

        let result =
            sqlx::query("UPDATE exhibitions SET status = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(status)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Exhibition not found".to_string()));
        }
        Ok(())
    }

    /// Deletes an exhibition. Sold tickets survive with a null reference,
    /// so buyers keep their purchase history.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM exhibitions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Exhibition not found".to_string()));
        }
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Exhibition, AppError> {
        sqlx::query_as::<_, Exhibition>("SELECT * FROM exhibitions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Exhibition not found".to_string()))
    }

    /// Upcoming exhibitions in the current calendar month.
    pub async fn current_month(&self) -> Result<Vec<Exhibition>, AppError> {
        let today = Utc::now().date_naive();
        let exhibitions = sqlx::query_as::<_, Exhibition>(
            r#"
            SELECT * FROM exhibitions
            WHERE month = $1 AND year = $2
              AND event_date >= $3
              AND status IN ($4, $5)
            ORDER BY event_date
            "#,
        )
        .bind(today.month() as i32)
        .bind(today.year())
        .bind(today)
        .bind(STATUS_ACTIVE)
        .bind(STATUS_SOLD_OUT)
        .fetch_all(&self.pool)
        .await?;
        Ok(exhibitions)
    }

    pub async fn by_month(
        &self,
        month: Option<i32>,
        year: Option<i32>,
    ) -> Result<Vec<Exhibition>, AppError> {
        let today = Utc::now().date_naive();
        let exhibitions = sqlx::query_as::<_, Exhibition>(
            "SELECT * FROM exhibitions WHERE month = $1 AND year = $2 ORDER BY event_date",
        )
        .bind(month.unwrap_or(today.month() as i32))
        .bind(year.unwrap_or(today.year()))
        .fetch_all(&self.pool)
        .await?;
        Ok(exhibitions)
    }

    /// Purchases tickets as one transaction: a conditional atomic decrement
    /// of the pool, status re-derivation from the returned counter, and the
    /// ticket insert. Any failure rolls the whole unit back, so a reservation
    /// can never outlive a failed ticket write.
    pub async fn purchase(
        &self,
        user_id: Uuid,
        exhibition_id: Uuid,
        quantity: i32,
        payment_method: &str,
    ) -> Result<TicketWithExhibition, AppError> {
        let mut tx = self.pool.begin().await?;

        // Single conditional update: the decrement only happens while the
        // exhibition is bookable and enough tickets remain. No prior read
        // feeds this, so concurrent purchases cannot oversell.
        let reserved = sqlx::query_as::<_, ReservedExhibition>(
            r#"
            UPDATE exhibitions
            SET available_tickets = available_tickets - $2, updated_at = now()
            WHERE id = $1 AND status = $3 AND available_tickets >= $2
            RETURNING available_tickets, ticket_price, title, event_date, event_time, venue, image
            "#,
        )
        .bind(exhibition_id)
        .bind(quantity)
        .bind(STATUS_ACTIVE)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(reserved) = reserved else {
            return Err(Self::reserve_failure(&mut tx, exhibition_id, quantity).await?);
        };

        let new_status = status_after_reserve(reserved.available_tickets);
        if new_status == STATUS_SOLD_OUT {
            sqlx::query("UPDATE exhibitions SET status = $2 WHERE id = $1")
                .bind(exhibition_id)
                .bind(new_status)
                .execute(&mut *tx)
                .await?;
        }

        let total_amount = reserved.ticket_price * Decimal::from(quantity);
        let ticket = Self::insert_ticket(
            &mut tx,
            user_id,
            exhibition_id,
            quantity,
            total_amount,
            payment_method,
        )
        .await?;

        tx.commit().await?;

        Ok(TicketWithExhibition {
            id: ticket.0,
            user_id,
            exhibition_id: Some(exhibition_id),
            ticket_number: ticket.1,
            quantity,
            total_amount,
            payment_method: payment_method.to_string(),
            ticket_status: "active".to_string(),
            purchase_date: ticket.2,
            exhibition_title: Some(reserved.title),
            event_date: Some(reserved.event_date),
            event_time: Some(reserved.event_time),
            venue: Some(reserved.venue),
            exhibition_image: Some(reserved.image),
        })
    }

    /// The conditional update matched nothing; re-read the row to tell the
    /// caller why.
    async fn reserve_failure(
        tx: &mut Transaction<'_, Postgres>,
        exhibition_id: Uuid,
        quantity: i32,
    ) -> Result<AppError, AppError> {
        let row = sqlx::query_as::<_, (String, i32)>(
            "SELECT status, available_tickets FROM exhibitions WHERE id = $1",
        )
        .bind(exhibition_id)
        .fetch_optional(&mut **tx)
        .await?;

        let failure =
            classify_reserve_failure(row.as_ref().map(|(s, a)| (s.as_str(), *a)), quantity);

        Ok(match failure {
            ReserveFailure::NotFound => AppError::NotFound("Exhibition not found".to_string()),
            ReserveFailure::NotBookable => {
                AppError::NotBookable("Exhibition is not available for booking".to_string())
            }
            ReserveFailure::OutOfStock => {
                AppError::OutOfStock("Not enough tickets available".to_string())
            }
        })
    }

    /// Inserts the ticket row, retrying with a fresh ticket number on a
    /// unique-constraint collision. Each attempt runs under a savepoint so a
    /// collision does not abort the enclosing transaction.
    async fn insert_ticket(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        exhibition_id: Uuid,
        quantity: i32,
        total_amount: Decimal,
        payment_method: &str,
    ) -> Result<(Uuid, String, chrono::DateTime<Utc>), AppError> {
        for _ in 0..TICKET_NUMBER_ATTEMPTS {
            let ticket_number = generate_ticket_number();
            let mut savepoint = tx.begin().await?;
            let inserted = sqlx::query_as::<_, (Uuid, String, chrono::DateTime<Utc>)>(
                r#"
                INSERT INTO tickets
                    (user_id, exhibition_id, ticket_number, quantity, total_amount, payment_method)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, ticket_number, purchase_date
                "#,
            )
            .bind(user_id)
            .bind(exhibition_id)
            .bind(&ticket_number)
            .bind(quantity)
            .bind(total_amount)
            .bind(payment_method)
            .fetch_one(&mut *savepoint)
            .await;

            match inserted {
                Ok(row) => {
                    savepoint.commit().await?;
                    return Ok(row);
                }
                Err(e) if is_unique_violation(&e, TICKET_NUMBER_UNIQUE) => {
                    savepoint.rollback().await?;
                    tracing::debug!(ticket_number, "Ticket number collision, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(AppError::InternalServerError(
            "Failed to allocate a unique ticket number".to_string(),
        ))
    }
}
