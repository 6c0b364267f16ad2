#![allow(dead_code)]

use admin_console::config::ApiSettings;
use admin_console::services::ApiClient;
use admin_console::startup::build_router;
use admin_console::AppState;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACCESS_TOKEN: &str = "abc";

/// A console wired to a mock backend.
pub struct TestConsole {
    pub backend: MockServer,
    pub router: Router,
}

impl TestConsole {
    pub async fn spawn() -> Self {
        let backend = MockServer::start().await;
        let api_client = Arc::new(ApiClient::new(ApiSettings::new(backend.uri())));
        let router = build_router(AppState::new(api_client, time::Duration::hours(1)));

        Self { backend, router }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn form(&self, verb: &str, uri: &str, body: &str, cookie: Option<&str>) -> Response {
        self.send(form_request(verb, uri, body, cookie)).await
    }

    /// Send a form request on its own task so other requests can run meanwhile.
    pub fn spawn_form(
        &self,
        verb: &str,
        uri: &str,
        body: &str,
        cookie: Option<&str>,
    ) -> JoinHandle<Response> {
        let router = self.router.clone();
        let request = form_request(verb, uri, body, cookie);
        tokio::spawn(async move {
            router
                .oneshot(request)
                .await
                .expect("router is infallible")
        })
    }

    /// Log in against the mock backend and return the session cookie.
    pub async fn login(&self) -> String {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "access_token": ACCESS_TOKEN })),
            )
            .mount(&self.backend)
            .await;

        let response = self
            .form(
                "POST",
                "/login",
                "email=admin%40example.com&password=secret",
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        session_cookie(&response).expect("login sets a session cookie")
    }
}

fn form_request(verb: &str, uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(verb)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// The `id=...` pair from the response's `set-cookie` header.
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("id="))
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
