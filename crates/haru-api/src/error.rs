//! The uniform result contract and failure taxonomy.
//!
//! Every call that passes through the gateway resolves to an [`ApiResult`].
//! Nothing above the gateway ever sees a raw transport error or a panic;
//! classification happens here and only here.

use serde_json::Value;
use thiserror::Error;

/// How a request failed. Classification is produced solely by the gateway
/// and the response normalizer; callers must not re-derive it from status
/// codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 401 from the backend; the local session has already been cleared.
    AuthExpired,
    /// 4xx other than 401.
    Client,
    /// 5xx.
    Server,
    /// Non-JSON or unparseable body where JSON was expected, or a payload
    /// that did not match the expected shape.
    MalformedResponse,
    /// The exchange could not be completed (DNS, connect, timeout).
    Network,
    /// The gateway was called directly while in mock mode.
    MockMode,
}

/// A failed API call.
///
/// `message` is human-readable by construction and is surfaced to the user
/// verbatim. `raw` carries the parsed response body, when there was one,
/// for callers that want to inspect it.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiFailure {
    pub kind: FailureKind,
    pub message: String,
    pub status: Option<u16>,
    pub raw: Option<Value>,
}

impl ApiFailure {
    /// The session is no longer valid. Built on the 401 path, after the
    /// session store has been torn down.
    pub fn auth_expired() -> Self {
        Self {
            kind: FailureKind::AuthExpired,
            message: "Your session has expired. Please sign in again.".to_string(),
            status: Some(401),
            raw: None,
        }
    }

    /// Transport-level failure; the exchange never completed.
    pub fn network(detail: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Network,
            message: format!("Network error: {}", detail.into()),
            status: None,
            raw: None,
        }
    }

    /// The response body was not what a JSON API should produce.
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::MalformedResponse,
            message: detail.into(),
            status: None,
            raw: None,
        }
    }

    /// A client-side precondition failed before any request was made
    /// (e.g. no signed-in user to resolve a path parameter).
    pub fn client(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Client,
            message: message.into(),
            status: None,
            raw: None,
        }
    }

    /// Guidance failure returned when the gateway is invoked in mock mode.
    /// Mock mode is intercepted at the resource-client layer; reaching the
    /// gateway means a call site bypassed that seam.
    pub fn mock_mode() -> Self {
        Self {
            kind: FailureKind::MockMode,
            message: "Mock mode: do not call the API gateway directly. \
                      Use the resource clients, which answer from the mock store."
                .to_string(),
            status: None,
            raw: None,
        }
    }

    /// Build a failure from a non-2xx status and its parsed body.
    ///
    /// The message prefers a server-supplied `message` field, then a
    /// server-supplied `error` field, then a generic fallback.
    pub fn from_status(status: u16, body: Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| body.get("error").and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed (status {})", status));

        let kind = if status >= 500 {
            FailureKind::Server
        } else {
            FailureKind::Client
        };

        Self {
            kind,
            message,
            status: Some(status),
            raw: Some(body),
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        self.kind == FailureKind::AuthExpired
    }
}

/// A successful API call: the payload plus an optional server message.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSuccess<T> {
    pub data: T,
    pub message: Option<String>,
}

impl<T> ApiSuccess<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: Some(message.into()),
        }
    }
}

/// The only shape any caller outside the gateway ever observes.
pub type ApiResult<T> = Result<ApiSuccess<T>, ApiFailure>;
