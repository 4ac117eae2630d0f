//! Response normalization: raw status + body text in, `ApiResult` out.
//!
//! Pure functions with no side effects, split out from the gateway because
//! this is where most of the response-shape permutations live. The body is
//! taken as text, not pre-parsed, so an empty body and a present-but-broken
//! body stay distinguishable.

use serde_json::{Map, Value};

use crate::error::{ApiFailure, ApiResult, ApiSuccess};

/// Cap on diagnostic excerpts quoted back from a broken response, so an
/// HTML error page never floods logs or the UI.
pub const DIAGNOSTIC_CAP: usize = 200;

/// Truncate a body excerpt to [`DIAGNOSTIC_CAP`] characters.
pub fn excerpt(text: &str) -> String {
    text.chars().take(DIAGNOSTIC_CAP).collect()
}

fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.contains("json"))
}

/// Normalize one raw exchange into the uniform result contract.
///
/// Decision table:
/// 1. status 401 -> `AuthExpired` (teardown is the gateway's job, not ours)
/// 2. empty/whitespace body -> payload `{}`
/// 3. JSON content type -> parse, parse failure -> `MalformedResponse`
/// 4. non-JSON content type with a body -> `MalformedResponse` (an error
///    page from the infrastructure, not API content)
/// 5. non-2xx -> failure, message from body `message` / `error` / generic
/// 6. 2xx -> success; payload is the body's `data` field when present and
///    non-null, otherwise the whole body; `message` passed through
pub fn normalize(status: u16, content_type: Option<&str>, body_text: &str) -> ApiResult<Value> {
    if status == 401 {
        return Err(ApiFailure::auth_expired());
    }

    let body = parse_body(status, content_type, body_text)?;

    if !(200..300).contains(&status) {
        return Err(ApiFailure::from_status(status, body));
    }

    Ok(success_from(body))
}

fn parse_body(status: u16, content_type: Option<&str>, body_text: &str) -> Result<Value, ApiFailure> {
    if body_text.trim().is_empty() {
        // Endpoints like logout intentionally return nothing
        return Ok(Value::Object(Map::new()));
    }

    if is_json_content_type(content_type) {
        serde_json::from_str(body_text).map_err(|e| {
            ApiFailure::malformed(format!(
                "The server response was not valid JSON: {} (body: {})",
                e,
                excerpt(body_text)
            ))
        })
    } else {
        Err(ApiFailure::malformed(format!(
            "Unexpected non-JSON response (status {}): {}",
            status,
            excerpt(body_text)
        )))
    }
}

/// Success construction tolerates two response shapes: an envelope
/// `{data, message}` and a bare payload.
fn success_from(mut body: Value) -> ApiSuccess<Value> {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);

    let has_data = body.get("data").is_some_and(|d| !d.is_null());
    let data = if has_data { body["data"].take() } else { body };

    ApiSuccess { data, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use serde_json::json;

    const JSON: Option<&str> = Some("application/json; charset=utf-8");

    #[test]
    fn test_envelope_body() {
        let result = normalize(200, JSON, r#"{"data": {"id": "1"}, "message": "ok"}"#).unwrap();
        assert_eq!(result.data, json!({"id": "1"}));
        assert_eq!(result.message.as_deref(), Some("ok"));
    }

    #[test]
    fn test_bare_body() {
        let result = normalize(200, JSON, r#"[1, 2, 3]"#).unwrap();
        assert_eq!(result.data, json!([1, 2, 3]));
        assert_eq!(result.message, None);
    }

    #[test]
    fn test_null_data_falls_back_to_whole_body() {
        let result = normalize(200, JSON, r#"{"data": null, "ok": true}"#).unwrap();
        assert_eq!(result.data, json!({"data": null, "ok": true}));
    }

    #[test]
    fn test_empty_body_is_empty_object() {
        let result = normalize(200, JSON, "").unwrap();
        assert_eq!(result.data, json!({}));

        let result = normalize(204, None, "  \n ").unwrap();
        assert_eq!(result.data, json!({}));
    }

    #[test]
    fn test_401_is_auth_expired_regardless_of_body() {
        let failure = normalize(401, JSON, r#"{"message": "expired"}"#).unwrap_err();
        assert_eq!(failure.kind, FailureKind::AuthExpired);

        let failure = normalize(401, Some("text/html"), "<html>").unwrap_err();
        assert_eq!(failure.kind, FailureKind::AuthExpired);
    }

    #[test]
    fn test_broken_json_is_malformed() {
        let failure = normalize(200, JSON, "{not json").unwrap_err();
        assert_eq!(failure.kind, FailureKind::MalformedResponse);
        assert!(failure.message.contains("{not json"));
    }

    #[test]
    fn test_non_json_content_type_is_malformed() {
        let failure = normalize(502, Some("text/html"), "<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(failure.kind, FailureKind::MalformedResponse);
        assert!(failure.message.contains("502"));
        assert!(failure.message.contains("Bad Gateway"));
    }

    #[test]
    fn test_diagnostic_is_capped() {
        let huge = "x".repeat(10_000);
        let failure = normalize(200, Some("text/plain"), &huge).unwrap_err();
        assert!(failure.message.len() < DIAGNOSTIC_CAP + 100);
    }

    #[test]
    fn test_error_status_prefers_server_message() {
        let failure = normalize(400, JSON, r#"{"message": "bad input"}"#).unwrap_err();
        assert_eq!(failure.kind, FailureKind::Client);
        assert_eq!(failure.message, "bad input");

        let failure = normalize(500, JSON, r#"{"error": "db down"}"#).unwrap_err();
        assert_eq!(failure.kind, FailureKind::Server);
        assert_eq!(failure.message, "db down");
        assert_eq!(failure.raw, Some(json!({"error": "db down"})));
    }

    #[test]
    fn test_error_status_with_empty_body() {
        let failure = normalize(503, None, "").unwrap_err();
        assert_eq!(failure.kind, FailureKind::Server);
        assert_eq!(failure.message, "Request failed (status 503)");
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let text = "한".repeat(DIAGNOSTIC_CAP + 50);
        let cut = excerpt(&text);
        assert_eq!(cut.chars().count(), DIAGNOSTIC_CAP);
    }
}
