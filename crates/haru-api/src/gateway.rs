//! The single chokepoint every network-bound call flows through.
//!
//! The gateway composes the session store, the HTTP transport, and the
//! response normalizer behind one call surface. Its contract is total:
//! every failure path, transport faults included, terminates in an
//! [`ApiFailure`] value rather than an error bubbling past the boundary.

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use haru_core::{ApiConfig, ApiMode};

use crate::error::{ApiFailure, ApiResult, ApiSuccess};
use crate::normalize;
use crate::request::RequestSpec;
use crate::session::SessionStore;

pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    mode: ApiMode,
    session: Arc<SessionStore>,
}

impl Gateway {
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            mode: config.mode,
            session,
        }
    }

    /// The session store this gateway reads tokens from (and clears on 401).
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Perform one exchange and normalize the outcome.
    ///
    /// In mock mode this never touches the network: mock and live paths are
    /// symmetric at the resource-client layer, so a direct call here is a
    /// misuse and gets a guidance failure back.
    #[instrument(
        skip(self, spec),
        fields(method = %spec.method, endpoint = %spec.endpoint),
        level = "info"
    )]
    pub async fn request<T: DeserializeOwned>(&self, spec: RequestSpec) -> ApiResult<T> {
        if self.mode.is_mock() {
            return Err(ApiFailure::mock_mode());
        }

        let url = format!("{}{}", self.base_url, spec.endpoint);

        let mut req = self
            .http
            .request(spec.method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");

        for (name, value) in &spec.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        // A missing token is not an error here: the request still goes out
        // on the one code path and the backend gets to reject it.
        if spec.requires_auth {
            if let Some(token) = self.session.get().access_token {
                req = req.bearer_auth(token);
            }
        }

        if spec.method != Method::GET {
            if let Some(body) = &spec.body {
                req = req.json(body);
            }
        }

        let response = req.send().await.map_err(transport_failure)?;
        let status = response.status().as_u16();

        // A 401 means every other field of the response is untrustworthy:
        // tear the session down before any body parsing, exactly once.
        if status == 401 {
            self.session.clear();
            return Err(ApiFailure::auth_expired());
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let text = response.text().await.map_err(transport_failure)?;

        let ApiSuccess { data, message } =
            normalize::normalize(status, content_type.as_deref(), &text)?;

        let data = serde_json::from_value(data).map_err(|e| {
            ApiFailure::malformed(format!("The server response had an unexpected shape: {}", e))
        })?;

        Ok(ApiSuccess { data, message })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        requires_auth: bool,
    ) -> ApiResult<T> {
        self.request(with_auth(RequestSpec::get(endpoint), requires_auth))
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        requires_auth: bool,
    ) -> ApiResult<T> {
        let spec = attach_body(RequestSpec::post(endpoint), body)?;
        self.request(with_auth(spec, requires_auth)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        requires_auth: bool,
    ) -> ApiResult<T> {
        let spec = attach_body(RequestSpec::put(endpoint), body)?;
        self.request(with_auth(spec, requires_auth)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        requires_auth: bool,
    ) -> ApiResult<T> {
        let spec = attach_body(RequestSpec::patch(endpoint), body)?;
        self.request(with_auth(spec, requires_auth)).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        requires_auth: bool,
    ) -> ApiResult<T> {
        self.request(with_auth(RequestSpec::delete(endpoint), requires_auth))
            .await
    }
}

fn with_auth(spec: RequestSpec, requires_auth: bool) -> RequestSpec {
    if requires_auth {
        spec
    } else {
        spec.public()
    }
}

fn attach_body<B: Serialize>(
    spec: RequestSpec,
    body: Option<&B>,
) -> Result<RequestSpec, ApiFailure> {
    match body {
        Some(body) => {
            let value = serde_json::to_value(body).map_err(|e| {
                ApiFailure::client(format!("Failed to encode request body: {}", e))
            })?;
            Ok(spec.body(value))
        }
        None => Ok(spec),
    }
}

fn transport_failure(e: reqwest::Error) -> ApiFailure {
    if e.is_timeout() {
        ApiFailure::network("the request timed out")
    } else if e.is_connect() {
        ApiFailure::network("unable to connect to the server")
    } else {
        ApiFailure::network(e.to_string())
    }
}
