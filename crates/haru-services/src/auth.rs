//! Auth resource client: login, signup, logout, profile.

use std::sync::Arc;

use serde_json::Value;
use tracing::instrument;

use haru_api::{endpoints, ApiFailure, ApiResult, ApiSuccess, SessionStore, UserProfile};

use crate::backend::Backend;
use crate::types::{AuthResponse, LoginRequest, SignupRequest};

pub struct AuthClient {
    backend: Backend,
    session: Arc<SessionStore>,
}

impl AuthClient {
    pub fn new(backend: Backend, session: Arc<SessionStore>) -> Self {
        Self { backend, session }
    }

    /// Sign in with email/password. On success the access token, optional
    /// refresh token, and user profile are persisted to the session store.
    #[instrument(skip(self, credentials), level = "info")]
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<AuthResponse> {
        let result = match &self.backend {
            Backend::Live(gateway) => {
                gateway
                    .post(endpoints::AUTH_LOGIN, Some(credentials), false)
                    .await
            }
            Backend::Mock(store) => store.login(credentials),
        };

        if let Ok(success) = &result {
            self.remember(&success.data);
        }
        result
    }

    /// Create an account; the backend signs the new user in directly.
    #[instrument(skip(self, request), level = "info")]
    pub async fn signup(&self, request: &SignupRequest) -> ApiResult<AuthResponse> {
        let result = match &self.backend {
            Backend::Live(gateway) => {
                gateway
                    .post(endpoints::AUTH_SIGNUP, Some(request), false)
                    .await
            }
            Backend::Mock(store) => store.signup(request),
        };

        if let Ok(success) = &result {
            self.remember(&success.data);
        }
        result
    }

    /// Sign out. The server call is best-effort: whatever it answers (or
    /// fails to answer), the local session is cleared. Losing the local
    /// session always beats keeping a possibly-revoked one.
    #[instrument(skip(self), level = "info")]
    pub async fn logout(&self) -> ApiResult<()> {
        if let Backend::Live(gateway) = &self.backend {
            if let Err(e) = gateway
                .post::<Value, ()>(endpoints::AUTH_LOGOUT, None, true)
                .await
            {
                tracing::warn!("Logout request failed, clearing local session anyway: {}", e);
            }
        }

        self.session.clear();
        Ok(ApiSuccess::new(()))
    }

    /// Fetch the signed-in user's profile and refresh the cached copy.
    /// In mock mode the cached profile is the source of truth.
    #[instrument(skip(self), level = "info")]
    pub async fn profile(&self) -> ApiResult<UserProfile> {
        match &self.backend {
            Backend::Live(gateway) => {
                let result = gateway.get::<UserProfile>(endpoints::AUTH_PROFILE, true).await;
                if let Ok(success) = &result {
                    self.session.set_user(success.data.clone());
                }
                result
            }
            Backend::Mock(_) => match self.session.get().user {
                Some(user) => Ok(ApiSuccess::new(user)),
                None => Err(ApiFailure::client("No signed-in user.")),
            },
        }
    }

    fn remember(&self, auth: &AuthResponse) {
        self.session.set_token(auth.access_token.as_str());
        if let Some(refresh) = &auth.refresh_token {
            self.session.set_refresh_token(refresh.as_str());
        }
        self.session.set_user(auth.user.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haru_api::FailureKind;

    fn mock_client(dir: &tempfile::TempDir) -> AuthClient {
        let session = Arc::new(SessionStore::new(dir.path().join("session.json")));
        let backend = Backend::Mock(Arc::new(crate::mock::MockStore::new()));
        AuthClient::new(backend, session)
    }

    fn signup_request() -> SignupRequest {
        SignupRequest {
            email: "a@b.com".to_string(),
            password: "x".to_string(),
            name: "A".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_signup_persists_session() {
        let dir = tempfile::tempdir().unwrap();
        let client = mock_client(&dir);

        let auth = client.signup(&signup_request()).await.unwrap();
        let session = client.session.get();

        assert_eq!(
            session.access_token.as_deref(),
            Some(auth.data.access_token.as_str())
        );
        assert!(session.refresh_token.is_some());
        assert_eq!(session.user.map(|u| u.email).as_deref(), Some("a@b.com"));
    }

    #[tokio::test]
    async fn test_mock_profile_reads_cached_user() {
        let dir = tempfile::tempdir().unwrap();
        let client = mock_client(&dir);

        let failure = client.profile().await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::Client);

        client.signup(&signup_request()).await.unwrap();
        let profile = client.profile().await.unwrap();
        assert_eq!(profile.data.email, "a@b.com");
    }

    #[tokio::test]
    async fn test_mock_logout_clears_session() {
        let dir = tempfile::tempdir().unwrap();
        let client = mock_client(&dir);

        client.signup(&signup_request()).await.unwrap();
        assert!(client.session.is_authenticated());

        client.logout().await.unwrap();
        assert!(!client.session.is_authenticated());
        assert_eq!(client.session.get().user, None);
    }
}
