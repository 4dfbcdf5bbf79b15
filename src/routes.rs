use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{ActorRequest, MovieRequest},
    token::Caller,
};

/// JSON body whose rejections render through [`AppError`].
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Integer `{id}` path segment; anything else is a 404.
#[derive(FromRequestParts, Deserialize)]
#[from_request(via(Path), rejection(AppError))]
pub struct EntityId(pub i32);

type Shared = State<Arc<AppState>>;

pub async fn index() -> &'static str {
    "Welcome!!"
}

pub async fn list_actors(Caller(caller): Caller, State(state): Shared) -> AppResult<Json<Value>> {
    let actors = state.service.list_actors(&caller).await?;
    Ok(Json(json!({ "success": true, "actors": actors })))
}

pub async fn get_actor(
    Caller(caller): Caller,
    EntityId(id): EntityId,
    State(state): Shared,
) -> AppResult<Json<Value>> {
    let actor = state.service.get_actor(&caller, id).await?;
    Ok(Json(json!({ "success": true, "actor": actor })))
}

pub async fn create_actor(
    Caller(caller): Caller,
    State(state): Shared,
    AppJson(body): AppJson<ActorRequest>,
) -> AppResult<impl IntoResponse> {
    let id = state.service.create_actor(&caller, body).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "created_actor_id": id }))))
}

pub async fn update_actor(
    Caller(caller): Caller,
    EntityId(id): EntityId,
    State(state): Shared,
    AppJson(body): AppJson<ActorRequest>,
) -> AppResult<Json<Value>> {
    let actor = state.service.update_actor(&caller, id, body).await?;
    Ok(Json(json!({ "success": true, "actor_info": actor })))
}

pub async fn delete_actor(
    Caller(caller): Caller,
    EntityId(id): EntityId,
    State(state): Shared,
) -> AppResult<Json<Value>> {
    let id = state.service.delete_actor(&caller, id).await?;
    Ok(Json(json!({ "success": true, "deleted_actor_id": id })))
}

pub async fn list_movies(Caller(caller): Caller, State(state): Shared) -> AppResult<Json<Value>> {
    let movies = state.service.list_movies(&caller).await?;
    Ok(Json(json!({ "success": true, "movies": movies })))
}

pub async fn get_movie(
    Caller(caller): Caller,
    EntityId(id): EntityId,
    State(state): Shared,
) -> AppResult<Json<Value>> {
    let movie = state.service.get_movie(&caller, id).await?;
    Ok(Json(json!({ "success": true, "movie": movie })))
}

pub async fn create_movie(
    Caller(caller): Caller,
    State(state): Shared,
    AppJson(body): AppJson<MovieRequest>,
) -> AppResult<impl IntoResponse> {
    let id = state.service.create_movie(&caller, body).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "created_movie_id": id }))))
}

pub async fn update_movie(
    Caller(caller): Caller,
    EntityId(id): EntityId,
    State(state): Shared,
    AppJson(body): AppJson<MovieRequest>,
) -> AppResult<Json<Value>> {
    let movie = state.service.update_movie(&caller, id, body).await?;
    Ok(Json(json!({ "success": true, "movie_info": movie })))
}

pub async fn delete_movie(
    Caller(caller): Caller,
    EntityId(id): EntityId,
    State(state): Shared,
) -> AppResult<Json<Value>> {
    let id = state.service.delete_movie(&caller, id).await?;
    Ok(Json(json!({ "success": true, "deleted_movie_id": id })))
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotSupported
}
