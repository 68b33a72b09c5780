use crate::backend::SeriesFetcher;
use crate::dicom_json::extract_series_uids;
use crate::records::{PatientRecord, RecordStore, StoreError};
use crate::types::UI;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

/// Combines the patient record of a study with the series held by the archive.
#[derive(Clone)]
pub struct CaseAggregator {
	records: Arc<dyn RecordStore>,
	fetcher: SeriesFetcher,
}

impl CaseAggregator {
	pub fn new(records: Arc<dyn RecordStore>, fetcher: SeriesFetcher) -> Self {
		Self { records, fetcher }
	}

	/// Looks up the record of the study and replaces its series with those of the archive.
	///
	/// The archive is only queried for studies that have a record.
	#[instrument(skip(self))]
	pub async fn aggregate(&self, study_instance_uid: &str) -> Result<PatientRecord, CaseError> {
		let record = self
			.records
			.find_by_study_id(study_instance_uid)
			.await?
			.ok_or_else(|| CaseError::RecordNotFound(UI::from(study_instance_uid)))?;

		let series = self
			.fetcher
			.fetch_study_series(study_instance_uid)
			.await
			.ok_or(CaseError::ArchiveUnavailable)?;

		let series_instance_uids = extract_series_uids(&series);
		debug!(
			patient_id = %record.patient_id,
			count = series_instance_uids.len(),
			"Merged series into patient record"
		);
		Ok(record.with_series(series_instance_uids))
	}
}

#[derive(Debug, Error)]
pub enum CaseError {
	#[error("no patient record for study {0}")]
	RecordNotFound(UI),
	#[error("no archive is available")]
	ArchiveUnavailable,
	#[error(transparent)]
	Store(#[from] StoreError),
}
