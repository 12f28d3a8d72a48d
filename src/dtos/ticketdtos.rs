use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::ticketmodel::Ticket;

/// Text fields of the submission form, collected from the multipart body.
/// Validation of the required fields lives here so the handler only marshals.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct SubmitTicketDto {
    #[validate(length(min = 1, message = "Name is required"))]
    #[serde(rename = "clientName")]
    pub client_name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    #[serde(rename = "clientEmail")]
    pub client_email: String,

    #[serde(rename = "clientPhone")]
    pub client_phone: Option<String>,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,

    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTicketDto {
    pub id: Uuid,
    pub status: Option<String>,
    #[serde(rename = "assignedTo")]
    pub assigned_to: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TicketQueryDto {
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterTicketDto {
    pub id: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub category: String,
    pub message: String,
    pub video_url: Option<String>,
    pub screenshot_urls: Vec<String>,
    pub status: String,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FilterTicketDto {
    pub fn filter_ticket(ticket: &Ticket) -> Self {
        FilterTicketDto {
            id: ticket.id.to_string(),
            client_name: ticket.client_name.to_owned(),
            client_email: ticket.client_email.to_owned(),
            client_phone: ticket.client_phone.clone(),
            category: ticket.category.to_str().to_string(),
            message: ticket.message.to_owned(),
            video_url: ticket.video_url.clone(),
            screenshot_urls: ticket.screenshot_urls.0.clone(),
            status: ticket.status.to_owned(),
            assigned_to: ticket.assigned_to.clone(),
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }

    pub fn filter_tickets(tickets: &[Ticket]) -> Vec<FilterTicketDto> {
        tickets.iter().map(FilterTicketDto::filter_ticket).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TicketData {
    pub ticket: FilterTicketDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TicketResponseDto {
    pub status: String,
    pub data: TicketData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TicketListResponseDto {
    pub status: String,
    pub tickets: Vec<FilterTicketDto>,
    pub results: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TicketCreatedDto {
    pub status: String,
    #[serde(rename = "ticketId")]
    pub ticket_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ticketmodel::TicketCategory;
    use sqlx::types::Json;

    fn draft() -> SubmitTicketDto {
        SubmitTicketDto {
            client_name: "Ann".to_string(),
            client_email: "ann@x.com".to_string(),
            client_phone: None,
            category: "bug".to_string(),
            message: "Button broken on checkout page".to_string(),
        }
    }

    #[test]
    fn submit_dto_accepts_a_complete_draft() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn submit_dto_rejects_each_missing_required_field() {
        let mut dto = draft();
        dto.client_name = "".to_string();
        assert!(dto.validate().is_err());

        let mut dto = draft();
        dto.client_email = "".to_string();
        assert!(dto.validate().is_err());

        let mut dto = draft();
        dto.category = "".to_string();
        assert!(dto.validate().is_err());

        let mut dto = draft();
        dto.message = "".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn submit_dto_phone_is_optional() {
        let mut dto = draft();
        dto.client_phone = Some("+1 555 0100".to_string());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn update_dto_accepts_partial_bodies() {
        let body: UpdateTicketDto = serde_json::from_str(
            r#"{"id":"4f6d97ab-7693-4cc5-8c31-d26ffd8dbf62","status":"done"}"#,
        )
        .unwrap();
        assert_eq!(body.status.as_deref(), Some("done"));
        assert!(body.assigned_to.is_none());

        let body: UpdateTicketDto = serde_json::from_str(
            r#"{"id":"4f6d97ab-7693-4cc5-8c31-d26ffd8dbf62","assignedTo":"dev@x.com"}"#,
        )
        .unwrap();
        assert!(body.status.is_none());
        assert_eq!(body.assigned_to.as_deref(), Some("dev@x.com"));
    }

    #[test]
    fn filter_ticket_uses_camel_case_wire_names() {
        let ticket = Ticket {
            id: uuid::Uuid::new_v4(),
            client_name: "Ann".to_string(),
            client_email: "ann@x.com".to_string(),
            client_phone: None,
            category: TicketCategory::Bug,
            message: "broken".to_string(),
            video_url: None,
            screenshot_urls: Json(vec!["/uploads/a.png".to_string()]),
            status: "new".to_string(),
            assigned_to: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(FilterTicketDto::filter_ticket(&ticket)).unwrap();
        assert_eq!(value["clientName"], "Ann");
        assert_eq!(value["clientEmail"], "ann@x.com");
        assert_eq!(value["screenshotUrls"][0], "/uploads/a.png");
        assert_eq!(value["status"], "new");
        assert_eq!(value["assignedTo"], serde_json::Value::Null);
    }
}
