use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::ticketmodel::{Ticket, TicketCategory, TicketStatus};

#[async_trait]
pub trait TicketExt {
    /// Insert a new ticket. Status is forced to `new` and the ticket starts
    /// unassigned; id and timestamps come from the database.
    async fn save_ticket<T: Into<String> + Send>(
        &self,
        client_name: T,
        client_email: T,
        client_phone: Option<String>,
        category: TicketCategory,
        message: T,
        video_url: Option<String>,
        screenshot_urls: Vec<String>,
    ) -> Result<Ticket, sqlx::Error>;

    async fn get_ticket(&self, ticket_id: Uuid) -> Result<Option<Ticket>, sqlx::Error>;

    async fn get_tickets(&self) -> Result<Vec<Ticket>, sqlx::Error>;

    async fn get_client_tickets(&self, client_email: &str) -> Result<Vec<Ticket>, sqlx::Error>;

    /// Partial update: omitted fields keep their stored value, `updated_at`
    /// is always refreshed. The status string is written verbatim -- the
    /// board is the only transition guard, and it is advisory. Returns
    /// `None` when no ticket has the given id.
    async fn update_ticket(
        &self,
        ticket_id: Uuid,
        status: Option<String>,
        assigned_to: Option<String>,
    ) -> Result<Option<Ticket>, sqlx::Error>;
}

#[async_trait]
impl TicketExt for DBClient {
    async fn save_ticket<T: Into<String> + Send>(
        &self,
        client_name: T,
        client_email: T,
        client_phone: Option<String>,
        category: TicketCategory,
        message: T,
        video_url: Option<String>,
        screenshot_urls: Vec<String>,
    ) -> Result<Ticket, sqlx::Error> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            INSERT INTO tickets
                (client_name, client_email, client_phone, category, message, video_url, screenshot_urls, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(client_name.into())
        .bind(client_email.into())
        .bind(client_phone)
        .bind(category)
        .bind(message.into())
        .bind(video_url)
        .bind(Json(screenshot_urls))
        .bind(TicketStatus::New.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(ticket)
    }

    async fn get_ticket(&self, ticket_id: Uuid) -> Result<Option<Ticket>, sqlx::Error> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT * FROM tickets
            WHERE id = $1
            "#,
        )
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }

    async fn get_tickets(&self) -> Result<Vec<Ticket>, sqlx::Error> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT * FROM tickets
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    async fn get_client_tickets(&self, client_email: &str) -> Result<Vec<Ticket>, sqlx::Error> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT * FROM tickets
            WHERE client_email = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(client_email)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    async fn update_ticket(
        &self,
        ticket_id: Uuid,
        status: Option<String>,
        assigned_to: Option<String>,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets
            SET status = COALESCE($2, status),
                assigned_to = COALESCE($3, assigned_to),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .bind(status)
        .bind(assigned_to)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }
}
