use crate::models::{User, UserRow};
use crate::sync::QueryState;
use askama::Template;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: &'static str,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: "success",
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: "error",
            message: message.into(),
        }
    }
}

/// Everything the "Manage Users" table needs to render one of its states.
#[derive(Debug, Clone, Default)]
pub struct UserTableView {
    pub rows: Vec<UserRow>,
    pub loading: bool,
    pub error: Option<String>,
    pub flash: Option<Flash>,
}

impl UserTableView {
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }

    pub fn from_state(state: &QueryState<Vec<User>>) -> Self {
        match state {
            QueryState::Loading => Self::loading(),
            QueryState::Error(message) => Self {
                error: Some(message.clone()),
                ..Default::default()
            },
            QueryState::Success(users) => Self {
                rows: users.iter().map(UserRow::from).collect(),
                ..Default::default()
            },
        }
    }

    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flash = Some(flash);
        self
    }
}

#[derive(Template)]
#[template(path = "users.html")]
pub struct UsersPageTemplate {
    pub table: UserTableView,
}

#[derive(Template)]
#[template(path = "users_table.html")]
pub struct UsersTableTemplate {
    pub table: UserTableView,
}
