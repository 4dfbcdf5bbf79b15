#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use casting_agency::{
    AppState, app,
    config::AuthConfig,
    db,
    models::ActorRequest,
    permissions::{Operation, PermissionSet},
    service::ResourceService,
    store::EntityStore,
    token::JwtVerifier,
};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";
pub const AUDIENCE: &str = "casting-agency";

pub const ASSISTANT: &[&str] =
    &["get:actors", "get:actor-by-id", "get:movies", "get:movie-by-id"];

pub const DIRECTOR: &[&str] = &[
    "get:actors",
    "get:actor-by-id",
    "post:actors",
    "patch:actors",
    "delete:actors",
    "get:movies",
    "get:movie-by-id",
    "patch:movies",
];

pub fn producer() -> PermissionSet {
    Operation::ALL.iter().map(|op| op.required_permission()).collect()
}

pub fn permissions(list: &[&str]) -> PermissionSet {
    list.iter().copied().collect()
}

pub async fn service() -> ResourceService {
    let db = db::connect_and_migrate("sqlite::memory:").await.unwrap();
    ResourceService::new(EntityStore::new(db))
}

/// Router over a fresh in-memory database, plus the service behind it for
/// seeding and inspecting rows directly.
pub async fn router() -> (Router, ResourceService) {
    let service = service().await;
    let verifier =
        JwtVerifier::from_config(&AuthConfig::shared_secret(SECRET, AUDIENCE)).unwrap();
    let state = Arc::new(AppState::new(service.clone(), Arc::new(verifier)));
    (app(state), service)
}

pub fn sign(claims: Value) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn token(permissions: &[&str]) -> String {
    sign(json!({
        "sub": "auth0|tester",
        "aud": AUDIENCE,
        "exp": jiff::Timestamp::now().as_second() + 3600,
        "permissions": permissions,
    }))
}

pub fn producer_token() -> String {
    let all: Vec<&str> = Operation::ALL.iter().map(|op| op.required_permission()).collect();
    token(&all)
}

pub async fn seed_actor(service: &ResourceService, name: &str, date_of_birth: &str) -> i32 {
    service
        .create_actor(
            &producer(),
            ActorRequest {
                name: Some(name.to_string()),
                full_name: Some(format!("{name} (full)")),
                date_of_birth: Some(date_of_birth.to_string()),
            },
        )
        .await
        .unwrap()
}

pub async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        },
        None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn call_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = call(app, method, uri, token, body).await;
    let status = response.status();
    (status, read_json(response).await)
}

pub async fn read_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn read_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&read_bytes(response).await).unwrap()
}
