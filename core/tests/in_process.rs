//! Drives `RestClient` against the mock app without a socket.
//!
//! The transport hands each request straight to the axum router with
//! `oneshot`, the way an in-process app handle answers without network I/O.

use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use typed_rest::transport::from_async_fn;
use typed_rest::{
    ApiError, ClientConfig, HttpRequest, HttpResponse, RequestOptions, RestClient, TransportError,
};

async fn dispatch(req: HttpRequest) -> Result<HttpResponse, TransportError> {
    let mut builder = Request::builder().method(req.method.as_str()).uri(&req.url);
    for (name, value) in &req.headers {
        builder = builder.header(name, value);
    }
    let request = builder
        .body(Body::from(req.body.unwrap_or_default()))
        .map_err(|e| TransportError::new(e.to_string()))?;

    let response = mock_server::app()
        .oneshot(request)
        .await
        .map_err(|e| TransportError::new(e.to_string()))?;

    let status = response.status();
    let headers = response
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| TransportError::new(e.to_string()))?
        .to_bytes();

    Ok(HttpResponse {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        headers,
        body,
    })
}

fn client() -> RestClient {
    RestClient::new(ClientConfig::new().with_transport(from_async_fn(dispatch)))
}

#[tokio::test]
async fn relative_paths_reach_the_router() {
    let hello: Value = client().get("/api/hello", RequestOptions::new()).await.unwrap();
    assert_eq!(hello["message"], "Hello from typed-rest!");
}

#[tokio::test]
async fn optional_segment_is_dropped_before_routing() {
    let user: Value = client()
        .get(
            "/api/:version?/user/:id",
            RequestOptions::new()
                .optional_param("version", None::<&str>)
                .param("id", "ann"),
        )
        .await
        .unwrap();
    assert_eq!(user["id"], "ann");
}

#[tokio::test]
async fn echo_sends_json_body() {
    let echoed: Value = client()
        .execute(
            "/api/echo",
            "POST",
            RequestOptions::new().json(&json!({"text": "hi"})).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(echoed, json!({"echoed": "hi"}));
}

#[tokio::test]
async fn unknown_route_is_a_plain_404() {
    let err = client()
        .get::<Value>("/api/missing", RequestOptions::new())
        .await
        .unwrap_err();
    let ApiError::Http(failure) = err else {
        panic!("expected HttpFailure");
    };
    assert_eq!(failure.status, 404);
    assert_eq!(failure.status_text, "Not Found");
    assert!(failure.body.is_empty());
}

#[tokio::test]
async fn rejected_body_is_reported_with_status() {
    let err = client()
        .post::<Value>("/api/echo", RequestOptions::new().json(&json!({"wrong": 1})).unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(422));
}
