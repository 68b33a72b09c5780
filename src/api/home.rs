use crate::AppState;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/", get(index))
		.route("/health", get(health))
}

async fn index() -> impl IntoResponse {
	format!(
		"This server is running vet-case-gateway (v{})",
		env!("CARGO_PKG_VERSION")
	)
}

async fn health() -> impl IntoResponse {
	Json(json!({ "status": "ok" }))
}
