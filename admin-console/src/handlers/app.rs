use axum::response::{IntoResponse, Redirect};

pub async fn index() -> impl IntoResponse {
    Redirect::to("/manage/users")
}

pub async fn health_check() -> &'static str {
    "OK"
}
