//! Events resource client.
//!
//! Event endpoints address `/calendar/:user_id/:calendar_id`, where the
//! user id comes from the cached session profile and the calendar id is
//! the event's `YYYYMMDD` day on create and the event id on update/delete
//! (the backend's addressing scheme, reproduced as-is).

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::instrument;

use haru_api::{endpoints, ApiFailure, ApiResult, ApiSuccess, SessionStore, UserProfile};

use crate::backend::Backend;
use crate::types::{CreateEventRequest, Event, UpdateEventRequest};

pub struct EventsClient {
    backend: Backend,
    session: Arc<SessionStore>,
}

impl EventsClient {
    pub fn new(backend: Backend, session: Arc<SessionStore>) -> Self {
        Self { backend, session }
    }

    /// All events visible to the signed-in user.
    #[instrument(skip(self), level = "info")]
    pub async fn list(&self) -> ApiResult<Vec<Event>> {
        match &self.backend {
            Backend::Live(gateway) => gateway.get(endpoints::CALENDAR_LIST, true).await,
            Backend::Mock(store) => store.list_events(),
        }
    }

    /// Events on a single day.
    #[instrument(skip(self), level = "info")]
    pub async fn for_date(&self, date: NaiveDate) -> ApiResult<Vec<Event>> {
        match &self.backend {
            Backend::Live(gateway) => {
                let calendar_id = date.format("%Y%m%d").to_string();
                let day = date.to_string();
                let endpoint = endpoints::fill(
                    endpoints::CALENDAR_BY_DATE,
                    &[("calendar_id", calendar_id.as_str()), ("date", day.as_str())],
                );
                gateway.get(&endpoint, true).await
            }
            Backend::Mock(store) => store.events_for_date(date),
        }
    }

    #[instrument(skip(self, request), level = "info")]
    pub async fn create(&self, request: &CreateEventRequest) -> ApiResult<Event> {
        let user = self.current_user()?;

        match &self.backend {
            Backend::Live(gateway) => {
                let calendar_id = request.date.format("%Y%m%d").to_string();
                let endpoint = endpoints::fill(
                    endpoints::CALENDAR_EVENT,
                    &[("user_id", user.id.as_str()), ("calendar_id", &calendar_id)],
                );
                gateway.post(&endpoint, Some(request), true).await
            }
            Backend::Mock(store) => store.create_event(request, &user.id),
        }
    }

    #[instrument(skip(self, request), level = "info")]
    pub async fn update(&self, id: &str, request: &UpdateEventRequest) -> ApiResult<Event> {
        let user = self.current_user()?;

        match &self.backend {
            Backend::Live(gateway) => {
                let endpoint = endpoints::fill(
                    endpoints::CALENDAR_EVENT,
                    &[("user_id", user.id.as_str()), ("calendar_id", id)],
                );
                gateway.patch(&endpoint, Some(request), true).await
            }
            Backend::Mock(store) => store.update_event(id, request),
        }
    }

    #[instrument(skip(self), level = "info")]
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let user = self.current_user()?;

        match &self.backend {
            Backend::Live(gateway) => {
                let endpoint = endpoints::fill(
                    endpoints::CALENDAR_EVENT,
                    &[("user_id", user.id.as_str()), ("calendar_id", id)],
                );
                let success = gateway.delete::<Value>(&endpoint, true).await?;
                Ok(ApiSuccess {
                    data: (),
                    message: success.message,
                })
            }
            Backend::Mock(store) => store.delete_event(id),
        }
    }

    fn current_user(&self) -> Result<UserProfile, ApiFailure> {
        self.session
            .get()
            .user
            .ok_or_else(|| ApiFailure::client("No signed-in user. Please sign in again."))
    }
}
