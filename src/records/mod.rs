//! Patient records of the clinic, keyed by the Study Instance UID of their imaging study.

mod file;
mod memory;

pub use file::FileRecordStore;
pub use memory::InMemoryRecordStore;

use crate::config::RecordsConfig;
use crate::types::UI;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// A veterinary patient together with its imaging study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
	pub patient_id: String,
	pub name: String,
	pub species: String,
	pub breed: String,
	pub age_years: u32,
	pub owner: String,
	pub study_instance_uid: UI,
	pub study_description: String,
	pub modality: String,
	/// Series of the study. Stored records only hold a placeholder list.
	#[serde(default)]
	pub series_instance_uids: Vec<UI>,
}

impl PatientRecord {
	/// Replaces the series of this record with the series reported by the archive.
	#[must_use]
	pub fn with_series(mut self, series_instance_uids: Vec<UI>) -> Self {
		self.series_instance_uids = series_instance_uids;
		self
	}
}

#[async_trait]
pub trait RecordStore: Send + Sync {
	async fn find_by_study_id(
		&self,
		study_instance_uid: &str,
	) -> Result<Option<PatientRecord>, StoreError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
	#[error("failed to read records: {0}")]
	Io(#[from] std::io::Error),
	#[error("malformed records: {0}")]
	Malformed(#[from] serde_json::Error),
	#[error("study {0} is assigned to more than one record")]
	DuplicateStudy(UI),
}

/// Creates the record store selected in the configuration.
pub async fn from_config(config: &RecordsConfig) -> Result<Arc<dyn RecordStore>, StoreError> {
	let store: Arc<dyn RecordStore> = match config {
		RecordsConfig::Memory => Arc::new(InMemoryRecordStore::seeded()),
		RecordsConfig::File { path } => Arc::new(FileRecordStore::open(path).await?),
	};
	Ok(store)
}
