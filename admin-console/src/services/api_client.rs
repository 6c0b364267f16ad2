//! REST backend client.
//!
//! Thin typed wrapper over the backend's user and conversation endpoints.
//! Every call carries W3C trace headers; authenticated calls take the bearer
//! token explicitly from the caller's [`AuthContext`](crate::auth::AuthContext).

use crate::config::ApiSettings;
use crate::models::{
    Conversation, ConversationId, LoginForm, MessageInput, RegisterUserRequest, TokenResponse,
    User,
};
use crate::sync::MessageSink;
use async_trait::async_trait;
use console_core::observability::TracedClientExt;
use console_core::AppError;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

pub struct ApiClient {
    client: Client,
    settings: ApiSettings,
}

impl ApiClient {
    pub fn new(settings: ApiSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.url, path)
    }

    /// Exchange credentials for an access token.
    pub async fn login(&self, form: &LoginForm) -> Result<TokenResponse, AppError> {
        let url = self.url("/auth/login");
        let response = self
            .client
            .traced_post(&url)
            .json(&serde_json::json!({
                "email": form.email,
                "password": form.password,
            }))
            .send()
            .await
            .map_err(|e| transport_error("POST", &url, e))?;

        decode_json(check_status(response).await?).await
    }

    pub async fn list_users(&self, access_token: &str) -> Result<Vec<User>, AppError> {
        let url = self.url("/users");
        let response = self
            .client
            .traced_get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| transport_error("GET", &url, e))?;

        decode_json(check_status(response).await?).await
    }

    pub async fn register_user(
        &self,
        access_token: &str,
        request: &RegisterUserRequest<'_>,
    ) -> Result<(), AppError> {
        let url = self.url("/users");
        let response = self
            .client
            .traced_post(&url)
            .bearer_auth(access_token)
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error("POST", &url, e))?;

        check_status(response).await?;
        tracing::info!(username = %request.username, role = %request.role, "User registered");
        Ok(())
    }

    pub async fn get_conversation(
        &self,
        access_token: &str,
        conversation_id: ConversationId,
    ) -> Result<Conversation, AppError> {
        let url = self.url(&format!("/conversations/{}", conversation_id));
        let response = self
            .client
            .traced_get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| transport_error("GET", &url, e))?;

        decode_json(check_status(response).await?).await
    }

    /// Post a message to a conversation. The response body is not consumed.
    pub async fn send_message(
        &self,
        access_token: &str,
        conversation_id: ConversationId,
        message: &MessageInput,
    ) -> Result<(), AppError> {
        let url = self.url(&format!("/conversations/{}/messages", conversation_id));
        let response = self
            .client
            .traced_post(&url)
            .bearer_auth(access_token)
            .json(message)
            .send()
            .await
            .map_err(|e| transport_error("POST", &url, e))?;

        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageSink for ApiClient {
    async fn deliver(
        &self,
        access_token: &str,
        conversation_id: ConversationId,
        message: &MessageInput,
    ) -> Result<(), AppError> {
        self.send_message(access_token, conversation_id, message).await
    }
}

fn transport_error(method: &str, url: &str, err: reqwest::Error) -> AppError {
    tracing::error!("Failed to send {} request to {}: {}", method, url, err);
    AppError::Network(format!("HTTP request failed: {}", err))
}

/// Turn a non-2xx response into [`AppError::Server`] carrying the backend's message.
async fn check_status(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

    tracing::warn!(status = %status, message = %message, "Backend returned an error");
    Err(AppError::Server {
        status: status.as_u16(),
        message,
    })
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    response.json::<T>().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to decode backend response");
        AppError::Network(format!("Invalid response body: {}", e))
    })
}

/// Pick the most useful message out of an error body: JSON `message`, then
/// JSON `error`, then the raw text.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return Some(text.to_string());
            }
        }
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_json_message() {
        assert_eq!(
            error_message(r#"{"message":"Forbidden resource","error":"Forbidden"}"#),
            Some("Forbidden resource".to_string())
        );
        assert_eq!(
            error_message(r#"{"error":"Unauthorized"}"#),
            Some("Unauthorized".to_string())
        );
    }

    #[test]
    fn error_message_falls_back_to_text() {
        assert_eq!(error_message("gateway timeout "), Some("gateway timeout".to_string()));
        assert_eq!(error_message("   "), None);
    }
}
