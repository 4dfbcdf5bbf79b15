mod common;

use axum::http::{StatusCode, header};
use common::{
    ASSISTANT, AUDIENCE, DIRECTOR, call, call_json, producer_token, read_bytes, router, seed_actor,
    sign, token,
};
use serde_json::json;

fn suicide_squad() -> serde_json::Value {
    json!({
        "title": "Suicide Squad",
        "release_year": 2016,
        "duration": 137,
        "imdb_rating": 6.0,
        "cast": ["Margot Robbie"],
    })
}

#[tokio::test]
async fn index_greets() {
    let (app, _) = router().await;
    let response = call(&app, "GET", "/", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_bytes(response).await, b"Welcome!!");
}

#[tokio::test]
async fn create_movie_then_read_it_back() {
    let (app, service) = router().await;
    seed_actor(&service, "Margot Robbie", "1990-07-02").await;
    let producer = producer_token();

    let (status, body) =
        call_json(&app, "POST", "/movies", Some(&producer), Some(suicide_squad())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let id = body["created_movie_id"].as_i64().unwrap();

    let assistant = token(ASSISTANT);
    let (status, body) = call_json(&app, "GET", &format!("/movies/{id}"), Some(&assistant), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["movie"]["title"], "Suicide Squad");
    assert_eq!(body["movie"]["imdb_rating"], 6.0);
    assert_eq!(body["movie"]["cast"], json!(["Margot Robbie"]));

    let (status, body) = call_json(&app, "GET", "/movies", Some(&assistant), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["movies"], json!([{ "id": id, "title": "Suicide Squad", "release_year": 2016 }]));
}

#[tokio::test]
async fn unknown_cast_member_is_unprocessable() {
    let (app, service) = router().await;
    seed_actor(&service, "Margot Robbie", "1990-07-02").await;
    let producer = producer_token();

    let mut body = suicide_squad();
    body["cast"] = json!(["Margot Robbie", "Ana de Armas"]);
    let (status, body) = call_json(&app, "POST", "/movies", Some(&producer), Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 422);
    assert_eq!(body["message"], "unprocessable");
    assert!(body["detail"].as_str().unwrap().contains("Ana de Armas"));

    let (_, body) = call_json(&app, "GET", "/movies", Some(&producer), None).await;
    assert_eq!(body["movies"], json!([]));
}

#[tokio::test]
async fn actor_lifecycle() {
    let (app, _) = router().await;
    let director = token(DIRECTOR);

    let (status, body) = call_json(
        &app,
        "POST",
        "/actors",
        Some(&director),
        Some(json!({ "name": "Gal Gadot", "full_name": "Gal Gadot-Varsano", "date_of_birth": "April 30, 1985" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["created_actor_id"].as_i64().unwrap();

    let (status, body) = call_json(
        &app,
        "PATCH",
        &format!("/actors/{id}"),
        Some(&director),
        Some(json!({ "date_of_birth": "1985-04-30", "full_name": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["actor_info"]["full_name"], "Gal Gadot-Varsano");
    assert_eq!(body["actor_info"]["date_of_birth"], "April 30, 1985");
    assert_eq!(body["actor_info"]["movies"], json!([]));

    let (status, body) = call_json(&app, "DELETE", &format!("/actors/{id}"), Some(&director), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted_actor_id"], id);

    let (status, body) = call_json(&app, "DELETE", &format!("/actors/{id}"), Some(&director), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "resource not found");
}

#[tokio::test]
async fn empty_patch_is_unprocessable() {
    let (app, service) = router().await;
    let id = seed_actor(&service, "Margot Robbie", "1990-07-02").await;
    let director = token(DIRECTOR);

    let (status, body) =
        call_json(&app, "PATCH", &format!("/actors/{id}"), Some(&director), Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], 422);

    let (status, _) = call_json(
        &app,
        "PATCH",
        &format!("/actors/{id}"),
        Some(&director),
        Some(json!({ "name": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn director_can_recast_but_not_create_movies() {
    let (app, service) = router().await;
    seed_actor(&service, "Margot Robbie", "1990-07-02").await;
    seed_actor(&service, "Will Smith", "1968-09-25").await;
    let (_, body) =
        call_json(&app, "POST", "/movies", Some(&producer_token()), Some(suicide_squad())).await;
    let id = body["created_movie_id"].as_i64().unwrap();
    let director = token(DIRECTOR);

    let (status, body) = call_json(&app, "POST", "/movies", Some(&director), Some(suicide_squad())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], 403);

    let (status, body) = call_json(
        &app,
        "PATCH",
        &format!("/movies/{id}"),
        Some(&director),
        Some(json!({ "cast": ["Will Smith"], "duration": 123 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["movie_info"]["cast"], json!(["Will Smith"]));
    assert_eq!(body["movie_info"]["duration"], 123);
    assert_eq!(body["movie_info"]["title"], "Suicide Squad");

    let (status, _) = call_json(&app, "DELETE", &format!("/movies/{id}"), Some(&director), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) =
        call_json(&app, "DELETE", &format!("/movies/{id}"), Some(&producer_token()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted_movie_id"], id);
}

#[tokio::test]
async fn missing_actor_is_not_found() {
    let (app, _) = router().await;
    let (status, body) = call_json(&app, "GET", "/actors/1000", Some(&token(ASSISTANT)), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "error": 404, "message": "resource not found" }));
}

#[tokio::test]
async fn non_integer_id_is_not_found() {
    let (app, _) = router().await;
    let (status, body) = call_json(&app, "GET", "/movies/abc", Some(&token(ASSISTANT)), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], 404);
}

#[tokio::test]
async fn unknown_route_is_json_not_found() {
    let (app, _) = router().await;
    let (status, body) = call_json(&app, "GET", "/directors", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn unsupported_method_is_json_405() {
    let (app, _) = router().await;
    let (status, body) = call_json(&app, "PUT", "/actors", Some(&producer_token()), None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "success": false, "error": 405, "message": "method not allowed" }));
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (app, _) = router().await;
    let (status, body) = call_json(&app, "GET", "/actors", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], 401);
    assert_eq!(body["message"], "unauthorized");
    assert_eq!(body["detail"], "authorization header is expected");
}

#[tokio::test]
async fn bad_tokens_are_unauthorized() {
    let (app, _) = router().await;

    let (status, _) = call_json(&app, "GET", "/actors", Some("not.a.token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let expired = sign(json!({ "aud": AUDIENCE, "exp": 1_000, "permissions": ["get:actors"] }));
    let (status, body) = call_json(&app, "GET", "/actors", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "token expired");

    let response = axum::http::Request::builder()
        .uri("/actors")
        .header(header::AUTHORIZATION, "Token abc")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.clone(), response).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_permissions_claim_is_bad_request() {
    let (app, _) = router().await;
    let token = sign(json!({ "aud": AUDIENCE, "exp": jiff::Timestamp::now().as_second() + 3600 }));
    let (status, body) = call_json(&app, "GET", "/actors", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "permissions not included in token");
}

#[tokio::test]
async fn assistant_cannot_create_actors() {
    let (app, _) = router().await;
    let body = json!({ "name": "Gal Gadot", "date_of_birth": "1985-04-30" });
    let (status, body) = call_json(&app, "POST", "/actors", Some(&token(ASSISTANT)), Some(body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "forbidden");
}

#[tokio::test]
async fn malformed_bodies() {
    let (app, _) = router().await;
    let producer = producer_token();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/actors")
        .header(header::AUTHORIZATION, format!("Bearer {producer}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.clone(), request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = call_json(
        &app,
        "POST",
        "/movies",
        Some(&producer),
        Some(json!({ "title": "Heat", "release_year": "soon" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let (app, _) = router().await;
    let request = axum::http::Request::builder()
        .method("OPTIONS")
        .uri("/movies")
        .header(header::ORIGIN, "https://casting.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.clone(), request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn actor_and_movie_ids_route_to_handlers() {
    let (app, service) = router().await;
    let id = seed_actor(&service, "Margot Robbie", "1990-07-02").await;
    let assistant = token(ASSISTANT);

    let (status, body) = call_json(&app, "GET", &format!("/actors/{id}"), Some(&assistant), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["actor"]["id"], id);
    assert_eq!(body["actor"]["name"], "Margot Robbie");
    assert_eq!(body["actor"]["full_name"], "Margot Robbie (full)");
    assert_eq!(body["actor"]["date_of_birth"], "July 02, 1990");
    assert_eq!(body["actor"]["movies"], json!([]));
}

#[tokio::test]
async fn missing_movie_is_not_found() {
    let (app, _) = router().await;
    let producer = producer_token();

    let (status, body) = call_json(&app, "GET", "/movies/999", Some(&producer), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) =
        call_json(&app, "PATCH", "/movies/999", Some(&producer), Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call_json(&app, "DELETE", "/movies/999", Some(&producer), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_movie_patch_is_unprocessable() {
    let (app, service) = router().await;
    seed_actor(&service, "Margot Robbie", "1990-07-02").await;
    let producer = producer_token();
    let (_, body) = call_json(&app, "POST", "/movies", Some(&producer), Some(suicide_squad())).await;
    let id = body["created_movie_id"].as_i64().unwrap();
    let uri = format!("/movies/{id}");

    for patch in [json!({ "cast": [] }), json!({ "release_year": 0 }), json!({ "imdb_rating": 11 })] {
        let (status, body) = call_json(&app, "PATCH", &uri, Some(&producer), Some(patch)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], 422);
    }

    let (_, body) = call_json(&app, "GET", &uri, Some(&producer), None).await;
    assert_eq!(body["movie"]["cast"], json!(["Margot Robbie"]));
    assert_eq!(body["movie"]["release_year"], 2016);
    assert_eq!(body["movie"]["imdb_rating"], 6.0);
}
