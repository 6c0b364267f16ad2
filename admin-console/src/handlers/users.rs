use super::{render, status_of};
use crate::auth::AuthContext;
use crate::models::{RegisterUserForm, RegisterUserRequest};
use crate::services::UsersQuery;
use crate::sync::{QueryState, Refetch, RemoteQuery};
use crate::views::{Flash, UserTableView, UsersPageTemplate, UsersTableTemplate};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::Response, Form};
use console_core::AppError;
use validator::Validate;

pub async fn users_page() -> Response {
    render(
        StatusCode::OK,
        &UsersPageTemplate {
            table: UserTableView::loading(),
        },
    )
}

pub async fn users_table(State(state): State<AppState>, auth: AuthContext) -> Response {
    let query = RemoteQuery::new(UsersQuery::new(state.api_client.clone()), auth);
    let result = query.fetch().await;

    render(
        status_of(&result),
        &UsersTableTemplate {
            table: UserTableView::from_state(&query.state()),
        },
    )
}

/// "Add new user": register, then refetch the table.
pub async fn register_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Form(form): Form<RegisterUserForm>,
) -> Response {
    let query = RemoteQuery::new(UsersQuery::new(state.api_client.clone()), auth.clone());

    match register(&state, &auth, &form, &query).await {
        Ok(()) => render(
            StatusCode::OK,
            &UsersTableTemplate {
                table: UserTableView::from_state(&query.state())
                    .with_flash(Flash::success(format!("User {} added", form.username))),
            },
        ),
        Err(err) => {
            if matches!(query.state(), QueryState::Loading) {
                // Still show the current users next to the error.
                if let Err(fetch_err) = query.fetch().await {
                    tracing::debug!(error = %fetch_err, "Users table unavailable after failed registration");
                }
            }
            render(
                err.status_code(),
                &UsersTableTemplate {
                    table: UserTableView::from_state(&query.state())
                        .with_flash(Flash::error(err.user_message())),
                },
            )
        }
    }
}

async fn register(
    state: &AppState,
    auth: &AuthContext,
    form: &RegisterUserForm,
    users: &RemoteQuery<UsersQuery>,
) -> Result<(), AppError> {
    let access_token = auth.require_token()?;
    form.validate()?;

    state
        .api_client
        .register_user(access_token, &RegisterUserRequest::from(form))
        .await?;

    if let Err(err) = users.refetch().await {
        tracing::warn!(error = %err, "Refetch after user registration failed");
    }
    Ok(())
}
