use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(type_name = "ticket_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketCategory {
    Bug,
    Request,
    Suggestion,
    Other,
}

impl TicketCategory {
    pub fn to_str(&self) -> &str {
        match self {
            TicketCategory::Bug => "bug",
            TicketCategory::Request => "request",
            TicketCategory::Suggestion => "suggestion",
            TicketCategory::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "bug" => Some(TicketCategory::Bug),
            "request" => Some(TicketCategory::Request),
            "suggestion" => Some(TicketCategory::Suggestion),
            "other" => Some(TicketCategory::Other),
            _ => None,
        }
    }
}

/// The triage board columns. Advisory only: the update path writes whatever
/// status string the caller supplies, so a ticket's stored status is not
/// guaranteed to parse into one of these.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    New,
    InProgress,
    Done,
    Blocked,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::New => "new",
            TicketStatus::InProgress => "in-progress",
            TicketStatus::Done => "done",
            TicketStatus::Blocked => "blocked",
        }
    }

    pub fn parse_known(value: &str) -> Option<Self> {
        match value {
            "new" => Some(TicketStatus::New),
            "in-progress" => Some(TicketStatus::InProgress),
            "done" => Some(TicketStatus::Done),
            "blocked" => Some(TicketStatus::Blocked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub category: TicketCategory,
    pub message: String,
    pub video_url: Option<String>,
    // JSONB column, NOT NULL DEFAULT '[]' -- always a sequence
    pub screenshot_urls: Json<Vec<String>>,
    pub status: String,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_the_form_values() {
        assert_eq!(TicketCategory::parse("bug"), Some(TicketCategory::Bug));
        assert_eq!(
            TicketCategory::parse("request"),
            Some(TicketCategory::Request)
        );
        assert_eq!(
            TicketCategory::parse("suggestion"),
            Some(TicketCategory::Suggestion)
        );
        assert_eq!(TicketCategory::parse("other"), Some(TicketCategory::Other));
        assert_eq!(TicketCategory::parse("billing"), None);
        assert_eq!(TicketCategory::parse(""), None);
    }

    #[test]
    fn category_serde_uses_snake_case() {
        let json = serde_json::to_string(&TicketCategory::Bug).unwrap();
        assert_eq!(json, r#""bug""#);

        let category: TicketCategory = serde_json::from_str(r#""suggestion""#).unwrap();
        assert_eq!(category, TicketCategory::Suggestion);
    }

    #[test]
    fn status_round_trips_the_board_columns() {
        for column in ["new", "in-progress", "done", "blocked"] {
            let status = TicketStatus::parse_known(column).unwrap();
            assert_eq!(status.as_str(), column);
        }
    }

    #[test]
    fn status_leaves_unknown_values_to_the_caller() {
        // The permissive update path stores these verbatim; parse_known just
        // reports that they are not board columns.
        assert_eq!(TicketStatus::parse_known("triaged"), None);
        assert_eq!(TicketStatus::parse_known("IN-PROGRESS"), None);
    }

    #[test]
    fn empty_screenshot_list_serializes_as_empty_sequence() {
        let ticket = Ticket {
            id: Uuid::new_v4(),
            client_name: "Ann".to_string(),
            client_email: "ann@x.com".to_string(),
            client_phone: None,
            category: TicketCategory::Bug,
            message: "Button broken on checkout page".to_string(),
            video_url: None,
            screenshot_urls: Json(vec![]),
            status: "new".to_string(),
            assigned_to: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&ticket).unwrap();
        assert_eq!(value["screenshot_urls"], serde_json::json!([]));
        assert_eq!(value["video_url"], serde_json::Value::Null);
    }
}
