use sqlx::PgPool;
use uuid::Uuid;

use crate::models::ticket::{AdminTicket, TicketWithExhibition, TICKET_STATUSES};
use crate::utils::error::AppError;

#[derive(Clone)]
pub struct TicketRepo {
    pool: PgPool,
}

impl TicketRepo {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    /// A user's tickets, newest purchase first. The exhibition join is LEFT
    /// because tickets keep a weak reference: the summary columns are NULL
    /// once the exhibition has been deleted.
    pub async fn for_user(&self, user_id: Uuid) -> Result<Vec<TicketWithExhibition>, AppError> {
        let tickets = sqlx::query_as::<_, TicketWithExhibition>(
            r#"
            SELECT t.id, t.user_id, t.exhibition_id, t.ticket_number, t.quantity,
                   t.total_amount, t.payment_method, t.ticket_status, t.purchase_date,
                   e.title AS exhibition_title, e.event_date, e.event_time, e.venue,
                   e.image AS exhibition_image
            FROM tickets t
            LEFT JOIN exhibitions e ON e.id = t.exhibition_id
            WHERE t.user_id = $1
            ORDER BY t.purchase_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tickets)
    }

    pub async fn all(&self) -> Result<Vec<AdminTicket>, AppError> {
        let tickets = sqlx::query_as::<_, AdminTicket>(
            r#"
            SELECT t.id, t.user_id, t.exhibition_id, t.ticket_number, t.quantity,
                   t.total_amount, t.payment_method, t.ticket_status, t.purchase_date,
                   e.title AS exhibition_title, e.event_date, e.event_time, e.venue,
                   u.name AS user_name, u.email AS user_email
            FROM tickets t
            LEFT JOIN exhibitions e ON e.id = t.exhibition_id
            JOIN users u ON u.id = t.user_id
            ORDER BY t.purchase_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tickets)
    }

    /// Admin-only status transition (active/used/cancelled). Cancellation
    /// does not restock the exhibition's pool.
    pub async fn update_status(&self, ticket_id: Uuid, status: &str) -> Result<(), AppError> {
        if !TICKET_STATUSES.contains(&status) {
            return Err(AppError::ValidationError(
                "Invalid ticket status".to_string(),
            ));
        }

        let result =
            sqlx::query("UPDATE tickets SET ticket_status = $2, updated_at = now() WHERE id = $1")
                .bind(ticket_id)
                .bind(status)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Ticket not found".to_string()));
        }
        Ok(())
    }
}
