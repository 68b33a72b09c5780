use crate::api::common::{ApiError, StudyUid};
use crate::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tracing::instrument;

/// <https://dicom.nema.org/medical/dicom/current/output/chtml/part18/sect_8.7.3.html>
const DICOM_JSON: &str = "application/dicom+json";

pub fn routes() -> Router<AppState> {
	Router::new().route("/studies/{study}/series", get(studys_series))
}

/// Lists the series of a study as DICOM JSON.
#[instrument(skip_all, fields(study = %study))]
async fn studys_series(
	State(state): State<AppState>,
	StudyUid(study): StudyUid,
) -> Result<Response, ApiError> {
	let series = state
		.fetcher
		.fetch_study_series(&study)
		.await
		.ok_or(ApiError::ArchiveUnavailable)?;

	if series.is_empty() {
		return Ok(StatusCode::NO_CONTENT.into_response());
	}

	Ok(([(header::CONTENT_TYPE, DICOM_JSON)], Json(series)).into_response())
}

#[cfg(test)]
mod tests {
	use crate::api::tests::{app, body_json, get, PRIMARY, STUDY};
	use crate::backend::testing::MockArchive;
	use crate::backend::ArchiveQueryOutcome;
	use crate::dicom_json::series_object;
	use axum::http::{header, StatusCode};
	use pretty_assertions::assert_eq;
	use serde_json::json;
	use std::sync::Arc;

	#[tokio::test]
	async fn returns_series_as_dicom_json() {
		let archive = Arc::new(MockArchive::default().with(
			PRIMARY,
			ArchiveQueryOutcome::Found(vec![series_object("1.2.3.1"), series_object("1.2.3.2")]),
		));

		let response = get(app(archive), &format!("/studies/{STUDY}/series")).await;

		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(
			response.headers()[header::CONTENT_TYPE],
			"application/dicom+json"
		);
		assert_eq!(
			body_json(response).await,
			json!([
				{ "0020000E": { "vr": "UI", "Value": ["1.2.3.1"] } },
				{ "0020000E": { "vr": "UI", "Value": ["1.2.3.2"] } }
			])
		);
	}

	#[tokio::test]
	async fn no_content_for_study_without_series() {
		let archive = Arc::new(MockArchive::default().with(PRIMARY, ArchiveQueryOutcome::NotFound));

		let response = get(app(archive), &format!("/studies/{STUDY}/series")).await;

		assert_eq!(response.status(), StatusCode::NO_CONTENT);
	}

	#[tokio::test]
	async fn unavailable_archive() {
		let archive = Arc::new(MockArchive::default());

		let response = get(app(archive.clone()), &format!("/studies/{STUDY}/series")).await;

		assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
		assert_eq!(
			body_json(response).await,
			json!({ "error": "archive unreachable" })
		);
		assert_eq!(archive.total_calls(), 2);
	}

	#[tokio::test]
	async fn malformed_uid_is_rejected_before_querying() {
		let archive = Arc::new(MockArchive::default());

		let response = get(app(archive.clone()), "/studies/invalid-uid/series").await;

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
		assert_eq!(archive.total_calls(), 0);
	}
}
