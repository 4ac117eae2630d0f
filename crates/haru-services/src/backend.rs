//! Startup-time selection between the live gateway and the mock store.
//!
//! Mirrors the process-wide mode flag: resolved once when the clients are
//! built, never re-branched per call site.

use std::sync::Arc;

use haru_api::{Gateway, SessionStore};
use haru_core::ApiConfig;

use crate::mock::MockStore;

/// The backend a resource client talks to.
#[derive(Clone)]
pub enum Backend {
    Live(Arc<Gateway>),
    Mock(Arc<MockStore>),
}

impl Backend {
    /// Build the backend the configuration selects. In mock mode no gateway
    /// (and therefore no transport) is constructed at all.
    pub fn from_config(config: &ApiConfig, session: Arc<SessionStore>) -> Self {
        if config.mode.is_mock() {
            tracing::info!("Using mock backend; no network calls will be made");
            Self::Mock(Arc::new(MockStore::new()))
        } else {
            Self::Live(Arc::new(Gateway::new(config, session)))
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, Self::Mock(_))
    }
}
