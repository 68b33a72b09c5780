use super::{InMemoryRecordStore, PatientRecord, RecordStore, StoreError};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

/// Record store loaded once from a JSON file containing an array of patient records.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
	inner: InMemoryRecordStore,
}

impl FileRecordStore {
	pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
		let path = path.as_ref();
		let content = tokio::fs::read_to_string(path).await?;
		let records: Vec<PatientRecord> = serde_json::from_str(&content)?;
		info!(path = %path.display(), count = records.len(), "Loaded patient records");

		Ok(Self {
			inner: InMemoryRecordStore::new(records)?,
		})
	}
}

#[async_trait]
impl RecordStore for FileRecordStore {
	async fn find_by_study_id(
		&self,
		study_instance_uid: &str,
	) -> Result<Option<PatientRecord>, StoreError> {
		self.inner.find_by_study_id(study_instance_uid).await
	}
}
