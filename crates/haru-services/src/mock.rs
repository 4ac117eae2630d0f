//! In-memory stand-in backend for mock mode.
//!
//! Answers every resource operation with the same [`ApiResult`] contract as
//! the live path, without ever touching the transport. State lives behind
//! one `parking_lot::Mutex` for the process lifetime.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use haru_api::{ApiFailure, ApiResult, ApiSuccess, UserProfile};

use crate::types::{
    AuthResponse, ChatMessage, ChatReply, ChatRequest, ChatRole, CreateEventRequest, Event,
    LoginRequest, ParsedEvent, SignupRequest, UpdateEventRequest,
};

struct MockUser {
    profile: UserProfile,
    password: String,
}

#[derive(Default)]
struct MockState {
    users: Vec<MockUser>,
    events: Vec<Event>,
    chats: HashMap<String, Vec<ChatMessage>>,
}

/// The local mock backend.
#[derive(Default)]
pub struct MockStore {
    inner: Mutex<MockState>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ----- auth -----

    pub fn signup(&self, request: &SignupRequest) -> ApiResult<AuthResponse> {
        let mut state = self.inner.lock();

        if state.users.iter().any(|u| u.profile.email == request.email) {
            return Err(ApiFailure::client("This email is already registered."));
        }

        let profile = UserProfile {
            id: Uuid::new_v4().to_string(),
            email: request.email.clone(),
            name: Some(request.name.clone()),
        };
        state.users.push(MockUser {
            profile: profile.clone(),
            password: request.password.clone(),
        });

        Ok(ApiSuccess::new(issue_tokens(profile)))
    }

    pub fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        let state = self.inner.lock();

        let user = state
            .users
            .iter()
            .find(|u| u.profile.email == request.email && u.password == request.password)
            .ok_or_else(|| ApiFailure::client("Invalid email or password."))?;

        Ok(ApiSuccess::new(issue_tokens(user.profile.clone())))
    }

    // ----- events -----

    pub fn list_events(&self) -> ApiResult<Vec<Event>> {
        Ok(ApiSuccess::new(self.inner.lock().events.clone()))
    }

    pub fn events_for_date(&self, date: NaiveDate) -> ApiResult<Vec<Event>> {
        let events = self
            .inner
            .lock()
            .events
            .iter()
            .filter(|e| e.date == date)
            .cloned()
            .collect();
        Ok(ApiSuccess::new(events))
    }

    pub fn create_event(&self, request: &CreateEventRequest, created_by: &str) -> ApiResult<Event> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4().to_string(),
            calendar_id: request
                .calendar_id
                .clone()
                .or_else(|| Some(request.date.format("%Y%m%d").to_string())),
            created_by: Some(created_by.to_string()),
            title: request.title.clone(),
            date: request.date,
            start_at: request.start_at,
            end_at: request.end_at,
            description: request.description.clone(),
            status: request.status.clone(),
            color: request.color.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        };

        self.inner.lock().events.push(event.clone());
        Ok(ApiSuccess::new(event))
    }

    pub fn update_event(&self, id: &str, request: &UpdateEventRequest) -> ApiResult<Event> {
        let mut state = self.inner.lock();
        let event = state
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ApiFailure::client("Event not found."))?;

        if let Some(title) = &request.title {
            event.title = title.clone();
        }
        if let Some(date) = request.date {
            event.date = date;
        }
        if let Some(start_at) = request.start_at {
            event.start_at = Some(start_at);
        }
        if let Some(end_at) = request.end_at {
            event.end_at = Some(end_at);
        }
        if let Some(description) = &request.description {
            event.description = Some(description.clone());
        }
        if let Some(status) = &request.status {
            event.status = Some(status.clone());
        }
        if let Some(color) = &request.color {
            event.color = Some(color.clone());
        }
        event.updated_at = Some(Utc::now());

        Ok(ApiSuccess::new(event.clone()))
    }

    pub fn delete_event(&self, id: &str) -> ApiResult<()> {
        let mut state = self.inner.lock();
        let before = state.events.len();
        state.events.retain(|e| e.id != id);

        if state.events.len() == before {
            return Err(ApiFailure::client("Event not found."));
        }
        Ok(ApiSuccess::new(()))
    }

    // ----- chat -----

    pub fn send_chat(&self, chat_id: &str, request: &ChatRequest) -> ApiResult<ChatReply> {
        let events = extract_events(&request.message);
        let reply_text = if let Some(first) = events.first() {
            format!("Planned \"{}\" on {}.", first.title, first.date)
        } else {
            "I can help you plan your schedule. Mention a date like 2024-02-01 \
             and I will draft an event."
                .to_string()
        };

        let mut state = self.inner.lock();
        let history = state.chats.entry(chat_id.to_string()).or_default();
        history.push(ChatMessage {
            role: ChatRole::User,
            content: request.message.clone(),
        });
        history.push(ChatMessage {
            role: ChatRole::Assistant,
            content: reply_text.clone(),
        });

        Ok(ApiSuccess::new(ChatReply {
            message: Some(reply_text),
            events,
        }))
    }

    pub fn chat_history(&self, chat_id: &str) -> ApiResult<ChatReply> {
        let state = self.inner.lock();
        let message = state
            .chats
            .get(chat_id)
            .and_then(|history| {
                history
                    .iter()
                    .rev()
                    .find(|m| m.role == ChatRole::Assistant)
            })
            .map(|m| m.content.clone());

        Ok(ApiSuccess::new(ChatReply {
            message,
            events: Vec::new(),
        }))
    }
}

fn issue_tokens(profile: UserProfile) -> AuthResponse {
    AuthResponse {
        user: profile,
        access_token: format!("mock-access-{}", Uuid::new_v4()),
        refresh_token: Some(format!("mock-refresh-{}", Uuid::new_v4())),
    }
}

/// Pull yyyy-mm-dd tokens out of a chat message; the surrounding words
/// become the draft title.
fn extract_events(message: &str) -> Vec<ParsedEvent> {
    let words: Vec<&str> = message.split_whitespace().collect();
    let mut dates = Vec::new();
    let mut title_words = Vec::new();

    for word in &words {
        let trimmed = word.trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '-');
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            dates.push(date);
        } else {
            title_words.push(*word);
        }
    }

    let title = if title_words.is_empty() {
        "New event".to_string()
    } else {
        title_words.join(" ")
    };

    dates
        .into_iter()
        .map(|date| ParsedEvent {
            title: title.clone(),
            date,
            description: None,
        })
        .collect()
}
