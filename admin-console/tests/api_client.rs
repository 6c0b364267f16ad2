use admin_console::auth::AuthContext;
use admin_console::config::ApiSettings;
use admin_console::models::{ConversationId, MessageInput};
use admin_console::services::{ApiClient, UsersQuery};
use admin_console::sync::{QueryState, RemoteQuery};
use console_core::AppError;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client() -> (MockServer, Arc<ApiClient>) {
    let server = MockServer::start().await;
    let client = Arc::new(ApiClient::new(ApiSettings::new(format!("{}/", server.uri()))));
    (server, client)
}

#[tokio::test]
async fn list_users_decodes_camel_case_payload() {
    let (server, client) = client().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": 7,
            "email": "b@x.io",
            "username": "bob",
            "isVerified": false,
            "role": "user",
            "threadsCreated": [{ "id": 1 }, { "id": 2 }]
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let users = client.list_users("abc").await.unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "bob");
    assert!(!users[0].is_verified);
    assert_eq!(users[0].conversation_count(), 2);
}

#[tokio::test]
async fn error_body_message_becomes_server_error() {
    let (server, client) = client().await;
    Mock::given(method("POST"))
        .and(path("/conversations/3/messages"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "error": "Bad Request" })),
        )
        .mount(&server)
        .await;

    let err = client
        .send_message(
            "abc",
            ConversationId(3),
            &MessageInput {
                content: "Hello".to_string(),
            },
        )
        .await
        .unwrap_err();

    match err {
        AppError::Server { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Bad Request");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn empty_error_body_falls_back_to_status_reason() {
    let (server, client) = client().await;
    Mock::given(method("GET"))
        .and(path("/conversations/3"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client
        .get_conversation("abc", ConversationId(3))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Not Found");
}

#[tokio::test]
async fn undecodable_body_is_a_network_error() {
    let (server, client) = client().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.list_users("abc").await.unwrap_err();

    assert!(matches!(err, AppError::Network(_)));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);
    let client = ApiClient::new(ApiSettings::new(uri));

    let err = client.list_users("abc").await.unwrap_err();

    assert!(matches!(err, AppError::Network(_)));
}

#[tokio::test]
async fn users_query_without_token_never_calls_backend() {
    let (server, client) = client().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let query = RemoteQuery::new(UsersQuery::new(client), AuthContext::anonymous());
    assert!(query.fetch().await.is_err());

    assert_eq!(
        query.state(),
        QueryState::Error("Access token is required".to_string())
    );
}
