use crate::auth::AuthContext;
use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

/// Full pages send anonymous visitors to the login form. Fragments are not
/// wrapped; their queries report `AuthRequired` themselves.
pub async fn require_login(auth: AuthContext, request: Request<Body>, next: Next) -> Response {
    if !auth.is_authenticated() {
        return Redirect::to("/login").into_response();
    }

    next.run(request).await
}
