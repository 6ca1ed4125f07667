//! Integration tests for the HTTP storage client against a mock server.

use serde_json::json;
use todo_sync_storage::{HttpRemoteStore, RemoteStore, StorageError};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn load_returns_stored_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/applications/todo-app/data/todo-list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": 1, "name": "buy milk", "done": false}]
        })))
        .mount(&server)
        .await;

    let store = HttpRemoteStore::new(server.uri());
    let payload = store.load("todo-app", "todo-list").await.unwrap().unwrap();

    assert_eq!(payload["items"][0]["name"], "buy milk");
}

#[tokio::test]
async fn load_maps_not_found_to_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/applications/todo-app/data/todo-list"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = HttpRemoteStore::new(server.uri());
    let payload = store.load("todo-app", "todo-list").await.unwrap();

    assert!(payload.is_none());
}

#[tokio::test]
async fn save_posts_full_payload() {
    let server = MockServer::start().await;
    let payload = json!({"items": [{"id": 2, "name": "write docs", "done": true}]});

    Mock::given(method("POST"))
        .and(path("/applications/todo-app/data/todo-list"))
        .and(body_json(payload.clone()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = HttpRemoteStore::new(server.uri());
    store.save("todo-app", "todo-list", payload).await.unwrap();
}

#[tokio::test]
async fn server_error_surfaces_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/applications/todo-app/data/todo-list"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let store = HttpRemoteStore::new(server.uri());
    let err = store
        .save("todo-app", "todo-list", json!({"items": []}))
        .await
        .unwrap_err();

    match err {
        StorageError::ServiceError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_tolerated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/applications/todo-app/data/todo-list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let store = HttpRemoteStore::new(format!("{}/", server.uri()));
    assert!(store.load("todo-app", "todo-list").await.unwrap().is_some());
}
