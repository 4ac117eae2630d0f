//! API gateway and session layer for the Haru calendar/chat client.
//!
//! Every network-bound operation flows through [`Gateway`], which owns
//! mock-vs-live routing, bearer-token injection, auth-expiry teardown, and
//! normalization of heterogeneous backend responses into one [`ApiResult`]
//! contract.

pub mod endpoints;
pub mod error;
pub mod gateway;
pub mod normalize;
pub mod request;
pub mod session;

pub use error::{ApiFailure, ApiResult, ApiSuccess, FailureKind};
pub use gateway::Gateway;
pub use request::RequestSpec;
pub use session::{Session, SessionStore, UserProfile};
