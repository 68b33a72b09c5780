use crate::types::UI;
use crate::utils::uid::is_valid_uid;
use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

/// Errors reported to HTTP clients.
///
/// Messages never contain details of the archive or record store, these are only logged.
#[derive(Debug, Error)]
pub enum ApiError {
	#[error("invalid Study Instance UID")]
	InvalidStudyUid,
	#[error("no patient record for study {0}")]
	RecordNotFound(UI),
	#[error("archive unreachable")]
	ArchiveUnavailable,
	#[error("internal server error")]
	Internal,
	#[error(transparent)]
	Path(#[from] PathRejection),
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = match &self {
			Self::InvalidStudyUid => StatusCode::BAD_REQUEST,
			Self::RecordNotFound(_) => StatusCode::NOT_FOUND,
			Self::ArchiveUnavailable => StatusCode::SERVICE_UNAVAILABLE,
			Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
			Self::Path(rejection) => rejection.status(),
		};
		(status, Json(json!({ "error": self.to_string() }))).into_response()
	}
}

/// A validated Study Instance UID taken from the `{study}` path parameter.
///
/// Requests with a malformed UID are rejected before any handler runs.
#[derive(Debug, Clone)]
pub struct StudyUid(pub UI);

impl<S> FromRequestParts<S> for StudyUid
where
	S: Send + Sync,
{
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		#[derive(Deserialize)]
		struct StudyPath {
			study: String,
		}

		let Path(StudyPath { study }) = Path::from_request_parts(parts, state).await?;

		if is_valid_uid(&study) {
			Ok(Self(study))
		} else {
			debug!(study, "Rejected malformed Study Instance UID");
			Err(ApiError::InvalidStudyUid)
		}
	}
}
