use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub done: bool,
}

#[derive(Deserialize)]
pub struct CreateItem {
    pub name: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub done: Option<bool>,
}

#[derive(Deserialize)]
pub struct EchoInput {
    pub text: String,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Item>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/api/hello", get(hello))
        .route("/api/echo", post(echo))
        .route("/api/user/{id}", get(user))
        .route("/api/search", get(search))
        .route("/api/headers", get(echo_headers))
        .route("/api/body", any(echo_body))
        .route("/api/items", get(list_items).post(create_item))
        .route(
            "/api/items/{id}",
            get(get_item)
                .put(update_item)
                .patch(update_item)
                .delete(delete_item),
        )
        .route("/api/errors/json", get(json_error))
        .route("/api/errors/html", get(html_error))
        .route("/api/not-json", get(not_json))
        .route("/api/empty", get(empty))
        .with_state(db)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello from typed-rest!" }))
}

async fn echo(Json(input): Json<EchoInput>) -> Json<Value> {
    Json(json!({ "echoed": input.text }))
}

async fn user(Path(id): Path<String>) -> Json<Value> {
    Json(json!({
        "id": id,
        "name": format!("User {id}"),
        "email": format!("user{id}@example.com"),
    }))
}

/// Echo the raw query pairs back in order, keeping repeated keys.
async fn search(RawQuery(query): RawQuery) -> Json<Vec<(String, String)>> {
    let pairs = query
        .as_deref()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();
    Json(pairs)
}

async fn echo_headers(headers: HeaderMap) -> Json<HashMap<String, String>> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(headers)
}

/// Report the method and raw body as received, for any method.
async fn echo_body(method: Method, body: String) -> Json<Value> {
    Json(json!({ "method": method.as_str(), "body": body }))
}

async fn list_items(State(db): State<Db>) -> Json<Vec<Item>> {
    let items = db.read().await;
    Json(items.values().cloned().collect())
}

async fn create_item(State(db): State<Db>, Json(input): Json<CreateItem>) -> (StatusCode, Json<Item>) {
    let item = Item {
        id: Uuid::new_v4(),
        name: input.name,
        done: input.done,
    };
    db.write().await.insert(item.id, item.clone());
    (StatusCode::CREATED, Json(item))
}

fn item_not_found(id: Uuid) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not found", "id": id })),
    )
}

async fn get_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Item>, (StatusCode, Json<Value>)> {
    let items = db.read().await;
    items.get(&id).cloned().map(Json).ok_or_else(|| item_not_found(id))
}

async fn update_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateItem>,
) -> Result<Json<Item>, (StatusCode, Json<Value>)> {
    let mut items = db.write().await;
    let item = items.get_mut(&id).ok_or_else(|| item_not_found(id))?;
    if let Some(name) = input.name {
        item.name = name;
    }
    if let Some(done) = input.done {
        item.done = done;
    }
    Ok(Json(item.clone()))
}

async fn delete_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    let mut items = db.write().await;
    items
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| item_not_found(id))
}

async fn json_error() -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad" })))
}

async fn html_error() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        "<html>ng</html>",
    )
}

async fn not_json() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        "not-json",
    )
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}
