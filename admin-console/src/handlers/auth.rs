use super::render;
use crate::auth::ACCESS_TOKEN_KEY;
use crate::models::LoginForm;
use crate::views::LoginTemplate;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use console_core::AppError;
use secrecy::ExposeSecret;
use tower_sessions::Session;
use validator::Validate;

pub async fn login_page() -> Response {
    render(StatusCode::OK, &LoginTemplate { error: None })
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match establish_session(&state, &session, &form).await {
        Ok(()) => Redirect::to("/manage/users").into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "Login failed");
            let message = match &err {
                AppError::Server { status: 401, .. } | AppError::Validation(_) => {
                    "Invalid email or password".to_string()
                }
                other => other.user_message(),
            };
            render(err.status_code(), &LoginTemplate { error: Some(message) })
        }
    }
}

async fn establish_session(
    state: &AppState,
    session: &Session,
    form: &LoginForm,
) -> Result<(), AppError> {
    form.validate()?;
    let tokens = state.api_client.login(form).await?;

    // New id on privilege change.
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to cycle session id: {}", e)))?;
    session
        .insert(ACCESS_TOKEN_KEY, tokens.access_token.expose_secret())
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to store access token: {}", e)))?;

    tracing::info!("User logged in successfully");
    Ok(())
}

pub async fn logout_handler(State(state): State<AppState>, session: Session) -> Response {
    if let Some(id) = session.id() {
        state.composers.release_session(&id.to_string());
    }

    if let Err(e) = session.flush().await {
        tracing::error!(error = %e, "Failed to flush session on logout");
    }

    Redirect::to("/login").into_response()
}
