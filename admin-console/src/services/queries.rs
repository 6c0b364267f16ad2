//! Query sources backed by the REST client.

use super::api_client::ApiClient;
use crate::models::{Conversation, ConversationId, User};
use crate::sync::QuerySource;
use async_trait::async_trait;
use console_core::AppError;
use std::sync::Arc;

/// The "Manage Users" collection.
pub struct UsersQuery {
    client: Arc<ApiClient>,
}

impl UsersQuery {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuerySource for UsersQuery {
    type Output = Vec<User>;

    fn name(&self) -> &'static str {
        "users"
    }

    async fn load(&self, access_token: &str) -> Result<Vec<User>, AppError> {
        self.client.list_users(access_token).await
    }
}

/// A single conversation with its messages.
pub struct ConversationQuery {
    client: Arc<ApiClient>,
    conversation_id: ConversationId,
}

impl ConversationQuery {
    pub fn new(client: Arc<ApiClient>, conversation_id: ConversationId) -> Self {
        Self {
            client,
            conversation_id,
        }
    }
}

#[async_trait]
impl QuerySource for ConversationQuery {
    type Output = Conversation;

    fn name(&self) -> &'static str {
        "conversation"
    }

    async fn load(&self, access_token: &str) -> Result<Conversation, AppError> {
        self.client
            .get_conversation(access_token, self.conversation_id)
            .await
    }
}
