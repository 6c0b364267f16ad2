//! Askama templates and the view models they render.

pub mod chat;
pub mod users;

pub use chat::{
    ChatPanelTemplate, ChatView, ConversationFeedTemplate, ConversationPageTemplate,
    SendButtonTemplate,
};
pub use users::{Flash, UserTableView, UsersPageTemplate, UsersTableTemplate};

use askama::Template;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}
