// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Exercises the JSON client contract against a loopback server.

use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use gk_agent::api::JsonClient;
use gk_agent::AgentError;

async fn error_with_body() -> impl IntoResponse {
	(StatusCode::CONFLICT, "  version conflict, resync first  ")
}

async fn error_without_body() -> impl IntoResponse {
	StatusCode::SERVICE_UNAVAILABLE
}

async fn no_content_with_noise() -> impl IntoResponse {
	// 204 must win even though this handler is misbehaving conceptually;
	// axum strips the body for 204 responses.
	StatusCode::NO_CONTENT
}

async fn empty_ok() -> impl IntoResponse {
	StatusCode::OK
}

async fn echo_headers(request: Request) -> Json<Value> {
	let headers = request.headers();
	let get_header =
		|name: header::HeaderName| headers.get(name).and_then(|v| v.to_str().ok()).map(String::from);
	Json(json!({
		"accept": get_header(header::ACCEPT),
		"content_type": get_header(header::CONTENT_TYPE),
		"authorization": get_header(header::AUTHORIZATION),
	}))
}

async fn spawn_server() -> String {
	let app = Router::new()
		.route("/error-body", get(error_with_body))
		.route("/error-empty", get(error_without_body))
		.route("/no-content", put(no_content_with_noise))
		.route("/empty-ok", get(empty_ok))
		.route("/echo", get(echo_headers).post(echo_headers));

	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		axum::serve(listener, app).await.unwrap();
	});
	format!("http://{addr}")
}

#[tokio::test]
async fn non_2xx_error_message_is_the_trimmed_body() {
	let base = spawn_server().await;
	let client = JsonClient::new(&base, false);

	let err = client
		.get_json::<Value>("/error-body", None)
		.await
		.unwrap_err();
	match err {
		AgentError::Api(message) => assert_eq!(message, "version conflict, resync first"),
		other => panic!("expected Api error, got {other:?}"),
	}
}

#[tokio::test]
async fn empty_error_body_falls_back_to_the_status_line() {
	let base = spawn_server().await;
	let client = JsonClient::new(&base, false);

	let err = client
		.get_json::<Value>("/error-empty", None)
		.await
		.unwrap_err();
	match err {
		AgentError::Api(message) => assert!(message.starts_with("503"), "got {message:?}"),
		other => panic!("expected Api error, got {other:?}"),
	}
}

#[tokio::test]
async fn no_content_is_success_without_decoding() {
	let base = spawn_server().await;
	let client = JsonClient::new(&base, false);

	let resp: Option<Value> = client
		.put_json("/no-content", Some(&json!({"version": 1})), Some("tok"))
		.await
		.unwrap();
	assert!(resp.is_none());
}

#[tokio::test]
async fn empty_2xx_body_is_tolerated() {
	let base = spawn_server().await;
	let client = JsonClient::new(&base, false);

	let resp: Option<Value> = client.get_json("/empty-ok", None).await.unwrap();
	assert!(resp.is_none());
}

#[tokio::test]
async fn accept_always_content_type_only_with_a_body() {
	let base = spawn_server().await;
	let client = JsonClient::new(&base, false);

	let no_body: Value = client.get_json("/echo", Some("tok-123")).await.unwrap().unwrap();
	assert_eq!(no_body["accept"], "application/json");
	assert_eq!(no_body["content_type"], Value::Null);
	assert_eq!(no_body["authorization"], "Bearer tok-123");

	let with_body: Value = client
		.post_json("/echo", Some(&json!({"k": "v"})), None)
		.await
		.unwrap()
		.unwrap();
	assert_eq!(with_body["accept"], "application/json");
	assert_eq!(with_body["content_type"], "application/json");
	assert_eq!(with_body["authorization"], Value::Null);
}
