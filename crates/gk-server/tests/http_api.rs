// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! End-to-end exercises of the HTTP surface against an in-memory database.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use gk_server::{create_app_state, create_router};
use gk_server_config::ServerConfig;
use gk_server_db::testing::create_test_pool;

fn test_config() -> ServerConfig {
	let mut config = ServerConfig {
		env: "dev".to_string(),
		server: Default::default(),
		tls: Default::default(),
		db: Default::default(),
		auth: Default::default(),
		password: Default::default(),
		secrets: Default::default(),
		security: Default::default(),
		log: Default::default(),
	};
	config.auth.jwt.signing_key = "integration-test-signing-key-32b!".to_string();
	// Fast, insecure parameters for tests ONLY.
	config.password.argon2.time = 1;
	config.password.argon2.memory_kib = 1024;
	config.password.argon2.threads = 1;
	config
}

async fn test_app() -> Router {
	let pool = create_test_pool().await;
	create_router(create_app_state(pool, test_config()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
	let response = app.clone().oneshot(request).await.unwrap();
	let status = response.status();
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	let body = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).unwrap_or(Value::Null)
	};
	(status, body)
}

fn post_json(path: &str, body: Value, token: Option<&str>) -> Request<Body> {
	json_request("POST", path, Some(body), token)
}

fn json_request(method: &str, path: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
	let mut builder = Request::builder().method(method).uri(path);
	if let Some(token) = token {
		builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
	}
	match body {
		Some(body) => builder
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(serde_json::to_vec(&body).unwrap()))
			.unwrap(),
		None => builder.body(Body::empty()).unwrap(),
	}
}

async fn register_and_login(app: &Router, email: &str, password: &str) -> (String, String) {
	let (status, _) = send(
		app,
		post_json("/auth/register", json!({"email": email, "password": password}), None),
	)
	.await;
	assert_eq!(status, StatusCode::CREATED);

	let (status, body) = send(
		app,
		post_json("/auth/login", json!({"email": email, "password": password}), None),
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	(
		body["access_token"].as_str().unwrap().to_string(),
		body["refresh_token"].as_str().unwrap().to_string(),
	)
}

#[tokio::test]
async fn register_conflicts_on_duplicate_email() {
	let app = test_app().await;
	let req = json!({"email": "test@example.com", "password": "StrongPass123"});

	let (status, body) = send(&app, post_json("/auth/register", req.clone(), None)).await;
	assert_eq!(status, StatusCode::CREATED);
	assert!(!body["user_id"].as_str().unwrap().is_empty());

	let (status, body) = send(&app, post_json("/auth/register", req, None)).await;
	assert_eq!(status, StatusCode::CONFLICT);
	assert!(body["error"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn login_yields_tokens_and_rejects_wrong_password() {
	let app = test_app().await;
	let _ = register_and_login(&app, "login@example.com", "StrongPass123").await;

	let (status, body) = send(
		&app,
		post_json(
			"/auth/login",
			json!({"email": "login@example.com", "password": "wrong"}),
			None,
		),
	)
	.await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert_eq!(body["error"], "invalid credentials");
}

#[tokio::test]
async fn secret_create_then_list_roundtrip() {
	let app = test_app().await;
	let (access, _) = register_and_login(&app, "crud@example.com", "StrongPass123").await;

	let (status, created) = send(
		&app,
		post_json(
			"/secrets",
			json!({"type": "text", "title": "E2E text", "payload": "CIPHERTEXT"}),
			Some(&access),
		),
	)
	.await;
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(created["version"], 1);
	let id = created["id"].as_str().unwrap().to_string();

	let (status, listed) = send(&app, json_request("GET", "/secrets", None, Some(&access))).await;
	assert_eq!(status, StatusCode::OK);
	let secrets = listed["secrets"].as_array().unwrap();
	assert_eq!(secrets.len(), 1);
	assert_eq!(secrets[0]["id"], id.as_str());
	assert_eq!(secrets[0]["payload"], "CIPHERTEXT");
}

#[tokio::test]
async fn update_bumps_version_and_stale_update_conflicts() {
	let app = test_app().await;
	let (access, _) = register_and_login(&app, "update@example.com", "StrongPass123").await;

	let (_, created) = send(
		&app,
		post_json(
			"/secrets",
			json!({"type": "text", "title": "old", "payload": "CIPHERTEXT"}),
			Some(&access),
		),
	)
	.await;
	let id = created["id"].as_str().unwrap().to_string();

	let (status, _) = send(
		&app,
		json_request(
			"PUT",
			&format!("/secrets/{id}"),
			Some(json!({"title": "NEW", "version": 1})),
			Some(&access),
		),
	)
	.await;
	assert_eq!(status, StatusCode::NO_CONTENT);

	let (_, listed) = send(&app, json_request("GET", "/secrets", None, Some(&access))).await;
	assert_eq!(listed["secrets"][0]["version"], 2);
	assert_eq!(listed["secrets"][0]["title"], "NEW");

	let (status, body) = send(
		&app,
		json_request(
			"PUT",
			&format!("/secrets/{id}"),
			Some(json!({"title": "AGAIN", "version": 1})),
			Some(&access),
		),
	)
	.await;
	assert_eq!(status, StatusCode::CONFLICT);
	assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn delete_then_repeat_delete_is_not_found() {
	let app = test_app().await;
	let (access, _) = register_and_login(&app, "delete@example.com", "StrongPass123").await;

	let (_, created) = send(
		&app,
		post_json(
			"/secrets",
			json!({"type": "text", "title": "gone", "payload": "CIPHERTEXT"}),
			Some(&access),
		),
	)
	.await;
	let id = created["id"].as_str().unwrap().to_string();

	let (status, _) = send(
		&app,
		json_request("DELETE", &format!("/secrets/{id}?version=1"), None, Some(&access)),
	)
	.await;
	assert_eq!(status, StatusCode::NO_CONTENT);

	let (status, _) = send(
		&app,
		json_request("DELETE", &format!("/secrets/{id}?version=1"), None, Some(&access)),
	)
	.await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_routes_reject_missing_and_garbage_bearers() {
	let app = test_app().await;

	let (status, _) = send(&app, json_request("GET", "/secrets", None, None)).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);

	let (status, _) = send(&app, json_request("GET", "/secrets", None, Some("garbage"))).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);

	// Even with an unparseable body the 401 wins: auth runs first.
	let (status, _) = send(
		&app,
		Request::builder()
			.method("POST")
			.uri("/secrets")
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from("{not json"))
			.unwrap(),
	)
	.await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_rotates_and_replay_is_unauthorized() {
	let app = test_app().await;
	let (_, refresh) = register_and_login(&app, "refresh@example.com", "StrongPass123").await;

	let (status, body) = send(
		&app,
		post_json("/auth/refresh", json!({"refresh_token": refresh}), None),
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	let rotated = body["refresh_token"].as_str().unwrap().to_string();
	assert_ne!(rotated, refresh);

	let (status, _) = send(
		&app,
		post_json("/auth/refresh", json!({"refresh_token": refresh}), None),
	)
	.await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);

	// Reuse detection also burned the rotated sibling.
	let (status, _) = send(
		&app,
		post_json("/auth/refresh", json!({"refresh_token": rotated}), None),
	)
	.await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_json_and_oversized_payloads_map_to_their_statuses() {
	let app = test_app().await;
	let (access, _) = register_and_login(&app, "limits@example.com", "StrongPass123").await;

	let (status, body) = send(
		&app,
		Request::builder()
			.method("POST")
			.uri("/auth/register")
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from("{broken"))
			.unwrap(),
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], "bad json");

	let big_payload = "A".repeat(1024 * 1024 + 1);
	let (status, body) = send(
		&app,
		post_json(
			"/secrets",
			json!({"type": "text", "title": "big", "payload": big_payload}),
			Some(&access),
		),
	)
	.await;
	assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
	assert_eq!(body["error"], "payload too large");
}

#[tokio::test]
async fn users_cannot_see_or_touch_foreign_secrets() {
	let app = test_app().await;
	let (alice, _) = register_and_login(&app, "alice@example.com", "StrongPass123").await;
	let (mallory, _) = register_and_login(&app, "mallory@example.com", "StrongPass123").await;

	let (_, created) = send(
		&app,
		post_json(
			"/secrets",
			json!({"type": "text", "title": "private", "payload": "CIPHERTEXT"}),
			Some(&alice),
		),
	)
	.await;
	let id = created["id"].as_str().unwrap().to_string();

	let (_, listed) = send(&app, json_request("GET", "/secrets", None, Some(&mallory))).await;
	assert!(listed["secrets"].as_array().unwrap().is_empty());

	let (status, _) = send(
		&app,
		json_request(
			"PUT",
			&format!("/secrets/{id}"),
			Some(json!({"title": "mine now", "version": 1})),
			Some(&mallory),
		),
	)
	.await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn healthz_is_public() {
	let app = test_app().await;
	let (status, body) = send(&app, json_request("GET", "/healthz", None, None)).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], "ok");
}
