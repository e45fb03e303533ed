//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port and drives `RestClient` over real
//! HTTP with the `ureq` transport, covering every outcome class plus a full
//! item lifecycle.

#![cfg(feature = "ureq")]

use std::collections::HashMap;

use mock_server::Item;
use serde_json::{json, Value};
use typed_rest::{ApiError, ClientConfig, ErrorBody, RequestOptions, RestClient, UreqTransport};

/// Bind a random port and serve the mock app from a background thread.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn client(base_url: &str) -> RestClient {
    RestClient::new(
        ClientConfig::new()
            .with_base_url(base_url)
            .with_header("X-Client", "typed-rest")
            .with_transport(UreqTransport::new()),
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn demo_routes_round_trip() {
    let client = client(&start_server());

    let hello: Value = client.get("/api/hello", RequestOptions::new()).await.unwrap();
    assert_eq!(hello, json!({"message": "Hello from typed-rest!"}));

    let echoed: Value = client
        .post("/api/echo", RequestOptions::new().json(&json!({"text": "ping"})).unwrap())
        .await
        .unwrap();
    assert_eq!(echoed, json!({"echoed": "ping"}));

    let user: Value = client
        .execute("/api/user/:id{[0-9]+}", "get", RequestOptions::new().param("id", 42))
        .await
        .unwrap();
    assert_eq!(user["email"], "user42@example.com");
}

#[tokio::test(flavor = "multi_thread")]
async fn query_lists_arrive_in_order() {
    let client = client(&start_server());
    let pairs: Vec<(String, String)> = client
        .get(
            "/api/search",
            RequestOptions::new()
                .query("tag", vec!["b", "a", "c"])
                .optional_query("skip", None::<&str>)
                .query("q", "two words"),
        )
        .await
        .unwrap();
    assert_eq!(
        pairs,
        vec![
            ("tag".to_string(), "b".to_string()),
            ("tag".to_string(), "a".to_string()),
            ("tag".to_string(), "c".to_string()),
            ("q".to_string(), "two words".to_string()),
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn default_and_call_headers_are_merged() {
    let client = client(&start_server());
    let headers: HashMap<String, String> = client
        .get("/api/headers", RequestOptions::new().header("x-client", "override").header("X-Extra", "1"))
        .await
        .unwrap();
    assert_eq!(headers["x-client"], "override");
    assert_eq!(headers["x-extra"], "1");
}

#[tokio::test(flavor = "multi_thread")]
async fn json_error_is_an_http_failure() {
    let client = client(&start_server());
    let err = client.get::<Value>("/api/errors/json", RequestOptions::new()).await.unwrap_err();
    let ApiError::Http(failure) = err else {
        panic!("expected HttpFailure");
    };
    assert_eq!(failure.status, 400);
    assert_eq!(failure.status_text, "Bad Request");
    assert_eq!(failure.body, ErrorBody::Json(json!({"error": "bad"})));
    assert!(failure.url.ends_with("/api/errors/json"));
}

#[tokio::test(flavor = "multi_thread")]
async fn html_error_keeps_raw_text() {
    let client = client(&start_server());
    let err = client.get::<Value>("/api/errors/html", RequestOptions::new()).await.unwrap_err();
    let ApiError::Http(failure) = err else {
        panic!("expected HttpFailure");
    };
    assert_eq!(failure.status, 500);
    assert_eq!(failure.body, ErrorBody::Text("<html>ng</html>".to_string()));
}

#[tokio::test(flavor = "multi_thread")]
async fn non_json_success_is_a_parse_failure() {
    let client = client(&start_server());
    let err = client.get::<Value>("/api/not-json", RequestOptions::new()).await.unwrap_err();
    let ApiError::Parse(failure) = err else {
        panic!("expected ParseFailure");
    };
    assert_eq!(failure.status, 200);
    assert_eq!(failure.body_text.as_deref(), Some("not-json"));
}

#[tokio::test(flavor = "multi_thread")]
async fn no_content_requires_opt_in() {
    let client = client(&start_server());

    let err = client.get::<Value>("/api/empty", RequestOptions::new()).await.unwrap_err();
    assert!(matches!(err, ApiError::Parse(ref f) if f.status == 204));

    client
        .get::<()>("/api/empty", RequestOptions::new().allow_empty_body(true))
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_is_a_transport_failure() {
    // Bind then drop to get a port nobody listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let client = client(&format!("http://{addr}"));
    let err = client.get::<Value>("/api/hello", RequestOptions::new()).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn get_with_json_body_sends_the_body() {
    let client = client(&start_server());
    let seen: Value = client
        .get("/api/body", RequestOptions::new().json(&json!({"a": 1})).unwrap())
        .await
        .unwrap();
    assert_eq!(seen, json!({"method": "GET", "body": "{\"a\":1}"}));
}

#[test]
fn runs_without_a_tokio_runtime() {
    let client = client(&start_server());
    let hello: Value =
        futures::executor::block_on(client.get("/api/hello", RequestOptions::new())).unwrap();
    assert_eq!(hello, json!({"message": "Hello from typed-rest!"}));
}

#[tokio::test(flavor = "multi_thread")]
async fn item_lifecycle() {
    let client = client(&start_server());

    let items: Vec<Item> = client.get("/api/items", RequestOptions::new()).await.unwrap();
    assert!(items.is_empty());

    let created: Item = client
        .post(
            "/api/items",
            RequestOptions::new().json(&json!({"name": "Integration test"})).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(created.name, "Integration test");
    assert!(!created.done);
    let id = created.id;

    let fetched: Item = client
        .get("/api/items/:id", RequestOptions::new().param("id", id))
        .await
        .unwrap();
    assert_eq!(fetched, created);

    let updated: Item = client
        .put(
            "/api/items/:id",
            RequestOptions::new()
                .param("id", id)
                .json(&json!({"name": "Updated name"}))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Updated name");
    assert!(!updated.done);

    let patched: Item = client
        .patch(
            "/api/items/:id",
            RequestOptions::new().param("id", id).json(&json!({"done": true})).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(patched.name, "Updated name");
    assert!(patched.done);

    client
        .delete::<()>(
            "/api/items/:id",
            RequestOptions::new().param("id", id).allow_empty_body(true),
        )
        .await
        .unwrap();

    let err = client
        .get::<Item>("/api/items/:id", RequestOptions::new().param("id", id))
        .await
        .unwrap_err();
    let ApiError::Http(failure) = err else {
        panic!("expected HttpFailure");
    };
    assert_eq!(failure.status, 404);
    assert_eq!(failure.body.as_json().unwrap()["error"], "not found");

    let items: Vec<Item> = client.get("/api/items", RequestOptions::new()).await.unwrap();
    assert!(items.is_empty(), "expected empty list after delete");
}
