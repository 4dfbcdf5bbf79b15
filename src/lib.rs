pub mod cast;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod permissions;
pub mod routes;
pub mod service;
pub mod store;
pub mod token;

use std::sync::Arc;

use axum::{
    Router,
    http::{Method, header},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{service::ResourceService, token::TokenVerifier};

pub struct AppState {
    pub service: ResourceService,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(service: ResourceService, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { service, verifier }
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/actors", get(routes::list_actors).post(routes::create_actor))
        .route(
            "/actors/{id}",
            get(routes::get_actor).patch(routes::update_actor).delete(routes::delete_actor),
        )
        .route("/movies", get(routes::list_movies).post(routes::create_movie))
        .route(
            "/movies/{id}",
            get(routes::get_movie).patch(routes::update_movie).delete(routes::delete_movie),
        )
        .fallback(routes::not_found)
        .method_not_allowed_fallback(routes::method_not_allowed)
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors()))
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
}
