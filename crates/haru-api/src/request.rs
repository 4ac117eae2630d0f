//! One request through the gateway, described up front.

use reqwest::Method;
use serde_json::Value;

/// Everything the gateway needs for one exchange. Built once per call and
/// not mutated afterwards.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// Fully resolved path, appended to the base URL. Placeholder
    /// substitution happens in the resource clients; the gateway treats
    /// this as opaque.
    pub endpoint: String,
    pub method: Method,
    /// JSON payload; ignored for GET requests.
    pub body: Option<Value>,
    /// Whether to attach the bearer token, if one is held.
    pub requires_auth: bool,
    /// Extra headers merged over the defaults.
    pub headers: Vec<(String, String)>,
}

impl RequestSpec {
    fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            body: None,
            requires_auth: true,
            headers: Vec::new(),
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PATCH, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Mark the request as not needing the bearer token (login, signup).
    pub fn public(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let spec = RequestSpec::get("/calendar");
        assert_eq!(spec.method, Method::GET);
        assert!(spec.requires_auth);
        assert!(spec.body.is_none());
        assert!(spec.headers.is_empty());
    }

    #[test]
    fn test_builder() {
        let spec = RequestSpec::post("/auth/login")
            .body(json!({"email": "a@b.com"}))
            .public()
            .header("X-Trace", "1");

        assert_eq!(spec.method, Method::POST);
        assert!(!spec.requires_auth);
        assert_eq!(spec.body, Some(json!({"email": "a@b.com"})));
        assert_eq!(spec.headers, vec![("X-Trace".to_string(), "1".to_string())]);
    }
}
