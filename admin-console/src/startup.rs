use axum::{
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use console_core::middleware::{metrics::metrics_middleware, tracing::request_id_middleware};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::handlers::{
    app::{health_check, index},
    auth::{login_handler, login_page, logout_handler},
    chat::{conversation_feed, conversation_page, submit_message, update_draft},
    metrics::metrics,
    users::{register_user, users_page, users_table},
};
use crate::middleware::auth::require_login;
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_expiry(Expiry::OnInactivity(state.session_inactivity));

    let pages = Router::new()
        .route("/manage/users", get(users_page))
        .route("/conversations/:id", get(conversation_page))
        .route_layer(from_fn(require_login));

    let fragments = Router::new()
        .route("/manage/users", post(register_user))
        .route("/manage/users/table", get(users_table))
        .route("/conversations/:id/feed", get(conversation_feed))
        .route("/conversations/:id/draft", put(update_draft))
        .route("/conversations/:id/messages", post(submit_message));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/login", get(login_page).post(login_handler))
        .route("/logout", get(logout_handler))
        .merge(pages)
        .merge(fragments)
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
