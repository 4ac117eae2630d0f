//! Backend endpoint templates.
//!
//! Templates contain `:name` placeholder segments. Resource clients resolve
//! them with [`fill`] before calling the gateway; the gateway itself never
//! interprets paths.

// Auth
pub const AUTH_LOGIN: &str = "/auth/login";
pub const AUTH_SIGNUP: &str = "/auth/signup";
pub const AUTH_LOGOUT: &str = "/auth/logout";
pub const AUTH_PROFILE: &str = "/auth/profile";

// Calendar / events
pub const CALENDAR_LIST: &str = "/calendar";
pub const CALENDAR_BY_DATE: &str = "/calendar/:calendar_id/day/:date";
pub const CALENDAR_EVENT: &str = "/calendar/:user_id/:calendar_id";

// Chat
pub const CHAT: &str = "/chats/:chat_id";

/// Substitute `:name` placeholders with percent-encoded values.
pub fn fill(template: &str, params: &[(&str, &str)]) -> String {
    let mut path = template.to_string();
    for (name, value) in params {
        path = path.replace(
            &format!(":{}", name),
            urlencoding::encode(value).as_ref(),
        );
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_single_param() {
        assert_eq!(fill(CHAT, &[("chat_id", "abc")]), "/chats/abc");
    }

    #[test]
    fn test_fill_multiple_params() {
        assert_eq!(
            fill(CALENDAR_EVENT, &[("user_id", "u1"), ("calendar_id", "20240201")]),
            "/calendar/u1/20240201"
        );
    }

    #[test]
    fn test_fill_percent_encodes() {
        assert_eq!(
            fill(CHAT, &[("chat_id", "a b/c")]),
            "/chats/a%20b%2Fc"
        );
    }

    #[test]
    fn test_fill_ignores_missing_params() {
        assert_eq!(
            fill(CALENDAR_BY_DATE, &[("calendar_id", "c1")]),
            "/calendar/c1/day/:date"
        );
    }
}
