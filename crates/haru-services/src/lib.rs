//! Resource clients for the Haru calendar/chat client.
//!
//! Each client is a thin, typed call-site over the API gateway. The
//! mock/live split happens here, once, when [`Backend::from_config`] runs:
//! in mock mode every operation answers from [`MockStore`] and the network
//! is never touched.

pub mod auth;
pub mod backend;
pub mod chat;
pub mod events;
pub mod mock;
pub mod types;

pub use auth::AuthClient;
pub use backend::Backend;
pub use chat::ChatClient;
pub use events::EventsClient;
pub use mock::MockStore;
pub use types::{
    AuthResponse, ChatMessage, ChatReply, ChatRequest, ChatRole, CreateEventRequest, Event,
    LoginRequest, ParsedEvent, SignupRequest, UpdateEventRequest,
};
