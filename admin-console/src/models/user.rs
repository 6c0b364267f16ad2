use secrecy::Secret;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Reference to a conversation thread a user started. Only counted for display,
/// so the backend's shape is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadRef(pub serde_json::Value);

/// A user record as returned by the backend's user collection endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub is_verified: bool,
    pub role: String,
    #[serde(default)]
    pub threads_created: Vec<ThreadRef>,
}

impl User {
    pub fn conversation_count(&self) -> usize {
        self.threads_created.len()
    }
}

/// One row of the "Manage Users" table.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub is_verified: &'static str,
    pub role: String,
    pub conversations: usize,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            is_verified: if user.is_verified { "Yes" } else { "No" },
            role: user.role.clone(),
            conversations: user.conversation_count(),
        }
    }
}

/// "Add new user" form.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1))]
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterUserRequest<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub role: &'a str,
}

impl<'a> From<&'a RegisterUserForm> for RegisterUserRequest<'a> {
    fn from(form: &'a RegisterUserForm) -> Self {
        Self {
            email: &form.email,
            username: &form.username,
            password: &form.password,
            role: &form.role,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Tokens issued by the backend's login endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Secret<String>,
}
