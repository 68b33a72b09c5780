use crate::api::cases::CaseError;
use crate::api::common::{ApiError, StudyUid};
use crate::records::PatientRecord;
use crate::AppState;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, instrument};

pub fn routes() -> Router<AppState> {
	Router::new().route("/cases/{study}", get(case))
}

/// Returns the patient record of a study, including the series held by the archive.
#[instrument(skip_all, fields(study = %study))]
async fn case(
	State(state): State<AppState>,
	StudyUid(study): StudyUid,
) -> Result<Json<PatientRecord>, ApiError> {
	let record = state.cases.aggregate(&study).await?;
	Ok(Json(record))
}

impl From<CaseError> for ApiError {
	fn from(err: CaseError) -> Self {
		match err {
			CaseError::RecordNotFound(study) => Self::RecordNotFound(study),
			CaseError::ArchiveUnavailable => Self::ArchiveUnavailable,
			CaseError::Store(err) => {
				error!("Failed to look up patient record: {err}");
				Self::Internal
			}
		}
	}
}
