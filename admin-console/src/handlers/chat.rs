use super::render;
use crate::auth::AuthContext;
use crate::models::ConversationId;
use crate::services::ConversationQuery;
use crate::sync::{MessageComposer, QueryState, RemoteQuery, SubmitOutcome, IN_FLIGHT_MESSAGE};
use crate::views::{
    ChatPanelTemplate, ChatView, ConversationFeedTemplate, ConversationPageTemplate,
    SendButtonTemplate,
};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

#[derive(Debug, Deserialize)]
pub struct QuestionForm {
    #[serde(default)]
    pub content: String,
}

fn composer_for(state: &AppState, session: &Session, id: ConversationId) -> Arc<MessageComposer> {
    let session_key = session.id().map(|id| id.to_string());
    state.composers.composer(session_key.as_deref(), id)
}

fn conversation_query(
    state: &AppState,
    auth: AuthContext,
    id: ConversationId,
) -> RemoteQuery<ConversationQuery> {
    RemoteQuery::new(ConversationQuery::new(state.api_client.clone(), id), auth)
}

pub async fn conversation_page(
    State(state): State<AppState>,
    auth: AuthContext,
    session: Session,
    Path(id): Path<i64>,
) -> Response {
    let id = ConversationId(id);
    let composer = composer_for(&state, &session, id);
    let query = conversation_query(&state, auth, id);
    let result = query.fetch().await;

    render(
        super::status_of(&result),
        &ConversationPageTemplate {
            chat: ChatView::new(id, &query.state(), &composer),
        },
    )
}

/// Polled feed: the conversation plus this session's pending echo.
pub async fn conversation_feed(
    State(state): State<AppState>,
    auth: AuthContext,
    session: Session,
    Path(id): Path<i64>,
) -> Response {
    let id = ConversationId(id);
    let composer = composer_for(&state, &session, id);
    let query = conversation_query(&state, auth, id);
    let result = query.fetch().await;

    render(
        super::status_of(&result),
        &ConversationFeedTemplate {
            chat: ChatView::new(id, &query.state(), &composer),
        },
    )
}

/// Controlled-input binding for the question textarea.
pub async fn update_draft(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<QuestionForm>,
) -> Response {
    let id = ConversationId(id);
    let composer = composer_for(&state, &session, id);
    // Ignored while sending; the button stays disabled.
    composer.set_content(form.content);

    render(
        StatusCode::OK,
        &SendButtonTemplate {
            chat: ChatView::new(id, &QueryState::Loading, &composer),
        },
    )
}

pub async fn submit_message(
    State(state): State<AppState>,
    auth: AuthContext,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<QuestionForm>,
) -> Response {
    let id = ConversationId(id);
    let composer = composer_for(&state, &session, id);
    let query = conversation_query(&state, auth.clone(), id);

    if !composer.set_content(form.content.clone()) {
        tracing::info!(conversation_id = %id, "Message rejected while a submission is in flight");
        refresh_feed(&query).await;

        let mut chat = ChatView::new(id, &query.state(), &composer)
            .with_form_error(Some(IN_FLIGHT_MESSAGE.to_string()));
        // Keep the rejected text in the textarea rather than the in-flight one.
        chat.content = form.content;
        return render(StatusCode::CONFLICT, &ChatPanelTemplate { chat });
    }

    let outcome = composer.submit(&auth, &query).await;
    if !matches!(outcome, Ok(SubmitOutcome::Sent)) {
        refresh_feed(&query).await;
    }

    let (status, form_error) = match &outcome {
        Ok(_) => (StatusCode::OK, None),
        Err(err) => (err.status_code(), Some(err.user_message())),
    };

    render(
        status,
        &ChatPanelTemplate {
            chat: ChatView::new(id, &query.state(), &composer).with_form_error(form_error),
        },
    )
}

/// Load the feed when the submit did not refetch it. A failure lands in the query state.
async fn refresh_feed(query: &RemoteQuery<ConversationQuery>) {
    if let Err(err) = query.fetch().await {
        tracing::debug!(error = %err, "Feed unavailable while rendering the chat panel");
    }
}
