//! Wire types shared by the live backend and the mock store.
//!
//! Field naming mirrors the backend contract: event fields are snake_case
//! except the `createdAt`/`updatedAt` bookkeeping pair, and the auth
//! payload uses camelCase token fields.

use chrono::{DateTime, NaiveDate, Utc};
use haru_api::UserProfile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserProfile,
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// A calendar event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    pub title: String,
    /// Day the event belongs to (yyyy-mm-dd)
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Display color, e.g. `#4caf50`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
    pub title: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Partial update; only `Some` fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_history: Option<Vec<ChatMessage>>,
}

/// An event proposal the assistant extracted from a chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedEvent {
    pub title: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The assistant's answer to a chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<ParsedEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_uses_camel_case_tokens() {
        let json = r#"{
            "user": {"id": "1", "email": "a@b.com"},
            "accessToken": "tok1",
            "refreshToken": "refresh1"
        }"#;

        let auth: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(auth.access_token, "tok1");
        assert_eq!(auth.refresh_token.as_deref(), Some("refresh1"));
        assert_eq!(auth.user.email, "a@b.com");
    }

    #[test]
    fn test_event_date_format() {
        let json = r#"{"id": "e1", "title": "Standup", "date": "2024-02-01"}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.date.to_string(), "2024-02-01");

        let out = serde_json::to_value(&event).unwrap();
        assert_eq!(out["date"], "2024-02-01");
        assert!(out.get("color").is_none());
    }

    #[test]
    fn test_update_request_partial() {
        let req = UpdateEventRequest {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"title":"Renamed"}"#);
    }

    #[test]
    fn test_chat_reply_defaults() {
        let reply: ChatReply = serde_json::from_str("{}").unwrap();
        assert!(reply.message.is_none());
        assert!(reply.events.is_empty());
    }

    #[test]
    fn test_chat_role_lowercase() {
        let msg = ChatMessage {
            role: ChatRole::Assistant,
            content: "hi".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""role":"assistant""#));
    }
}
