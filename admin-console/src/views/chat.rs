use crate::models::{Conversation, ConversationId, ConversationMessage};
use crate::sync::{MessageComposer, QueryState};
use askama::Template;

/// Conversation feed plus the question form, as seen by one session.
#[derive(Debug, Clone)]
pub struct ChatView {
    pub conversation_id: ConversationId,
    pub title: Option<String>,
    pub messages: Vec<ConversationMessage>,
    pub loading: bool,
    pub feed_error: Option<String>,
    pub pending: Option<String>,
    pub content: String,
    pub submit_enabled: bool,
    pub form_error: Option<String>,
}

impl ChatView {
    pub fn new(
        conversation_id: ConversationId,
        feed: &QueryState<Conversation>,
        composer: &MessageComposer,
    ) -> Self {
        let (title, messages, loading, feed_error) = match feed {
            QueryState::Loading => (None, Vec::new(), true, None),
            QueryState::Error(message) => (None, Vec::new(), false, Some(message.clone())),
            QueryState::Success(conversation) => (
                conversation.title.clone(),
                conversation.messages.clone(),
                false,
                None,
            ),
        };

        Self {
            conversation_id,
            title,
            messages,
            loading,
            feed_error,
            pending: composer.pending(),
            content: composer.content(),
            submit_enabled: composer.submit_enabled(),
            form_error: composer.last_error(),
        }
    }

    /// Show an error the composer did not record, e.g. a missing token.
    pub fn with_form_error(mut self, message: Option<String>) -> Self {
        if message.is_some() {
            self.form_error = message;
        }
        self
    }
}

#[derive(Template)]
#[template(path = "conversation.html")]
pub struct ConversationPageTemplate {
    pub chat: ChatView,
}

#[derive(Template)]
#[template(path = "chat_panel.html")]
pub struct ChatPanelTemplate {
    pub chat: ChatView,
}

#[derive(Template)]
#[template(path = "conversation_feed.html")]
pub struct ConversationFeedTemplate {
    pub chat: ChatView,
}

#[derive(Template)]
#[template(path = "send_button.html")]
pub struct SendButtonTemplate {
    pub chat: ChatView,
}
