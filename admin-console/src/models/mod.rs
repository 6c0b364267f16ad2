pub mod conversation;
pub mod user;

pub use conversation::{Conversation, ConversationId, ConversationMessage, MessageInput};
pub use user::{
    LoginForm, RegisterUserForm, RegisterUserRequest, ThreadRef, TokenResponse, User, UserRow,
};
