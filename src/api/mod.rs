use crate::AppState;
use axum::Router;

pub mod cases;
mod common;
mod home;
mod series;

pub fn routes(base_path: &str) -> Router<AppState> {
	let router = Router::new()
		.merge(home::routes())
		.merge(series::routes())
		.merge(cases::routes());

	// axum no longer supports nesting at the root
	match base_path {
		"/" | "" => router,
		base_path => Router::new().nest(base_path, router),
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use crate::api::cases::CaseAggregator;
	use crate::backend::testing::MockArchive;
	use crate::backend::SeriesFetcher;
	use crate::records::InMemoryRecordStore;
	use axum::body::Body;
	use axum::http::{Request, StatusCode};
	use axum::response::Response;
	use pretty_assertions::assert_eq;
	use std::sync::Arc;
	use std::time::Duration;
	use tower::ServiceExt;
	use url::Url;

	pub const STUDY: &str = "1.2.840.113619.2.55.3.123456789.001";
	pub const PRIMARY: &str = "http://primary.test:8042";
	pub const FALLBACK: &str = "http://fallback.test:8042";

	pub fn state(archive: Arc<MockArchive>) -> AppState {
		let fetcher = SeriesFetcher::new(
			archive,
			Url::parse(PRIMARY).unwrap(),
			Url::parse(FALLBACK).unwrap(),
			Duration::from_millis(100),
		);
		AppState {
			cases: CaseAggregator::new(Arc::new(InMemoryRecordStore::seeded()), fetcher.clone()),
			fetcher,
		}
	}

	pub fn app(archive: Arc<MockArchive>) -> Router {
		routes("/").with_state(state(archive))
	}

	pub async fn get(app: Router, uri: &str) -> Response {
		let request = Request::get(uri).body(Body::empty()).unwrap();
		app.oneshot(request).await.unwrap()
	}

	pub async fn body_json(response: Response) -> serde_json::Value {
		let body = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		serde_json::from_slice(&body).unwrap()
	}

	#[tokio::test]
	async fn health() {
		let response = get(app(Arc::new(MockArchive::default())), "/health").await;

		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(body_json(response).await, serde_json::json!({ "status": "ok" }));
	}

	#[tokio::test]
	async fn routes_are_nested_under_base_path() {
		let archive = Arc::new(MockArchive::default());
		let app = routes("/api").with_state(state(archive));

		let response = get(app.clone(), "/api/health").await;
		assert_eq!(response.status(), StatusCode::OK);

		let response = get(app, "/health").await;
		assert_eq!(response.status(), StatusCode::NOT_FOUND);
	}
}
