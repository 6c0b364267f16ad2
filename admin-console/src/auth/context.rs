use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use console_core::AppError;
use secrecy::{ExposeSecret, Secret};
use tower_sessions::Session;

/// Session key holding the bearer token written by the login flow.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Read-only view of the caller's session credentials.
///
/// Every network operation receives one of these explicitly. A context without
/// a token is valid to construct; operations that need the token fail with
/// [`AppError::AuthRequired`] before touching the network.
#[derive(Clone, Default)]
pub struct AuthContext {
    access_token: Option<Secret<String>>,
}

impl AuthContext {
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            access_token: access_token
                .filter(|token| !token.is_empty())
                .map(Secret::new),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self::new(Some(token.into()))
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn require_token(&self) -> Result<&str, AppError> {
        self.access_token
            .as_ref()
            .map(|token| token.expose_secret().as_str())
            .ok_or(AppError::AuthRequired)
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to extract session",
                )
                    .into_response()
            })?;

        let access_token: Option<String> = session.get(ACCESS_TOKEN_KEY).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read access token from session");
            None
        });

        Ok(AuthContext::new(access_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_context_requires_auth() {
        let ctx = AuthContext::anonymous();
        assert!(!ctx.is_authenticated());
        assert!(matches!(ctx.require_token(), Err(AppError::AuthRequired)));
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let ctx = AuthContext::new(Some(String::new()));
        assert!(matches!(ctx.require_token(), Err(AppError::AuthRequired)));
    }

    #[test]
    fn token_is_exposed_only_through_require_token() {
        let ctx = AuthContext::with_token("abc");
        assert_eq!(ctx.require_token().unwrap(), "abc");
        assert!(!format!("{:?}", ctx).contains("abc"));
    }
}
