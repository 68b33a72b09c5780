use crate::backend::{ArchiveClient, ArchiveQueryOutcome};
use crate::config::ArchiveConfig;
use crate::dicom_json::DicomJsonObject;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use url::Url;

/// Fetches the series of a study from a primary archive, falling back to a secondary archive
/// if the primary is unavailable.
///
/// Archives are queried strictly one after another. Results are never merged.
#[derive(Clone)]
pub struct SeriesFetcher {
	client: Arc<dyn ArchiveClient>,
	primary: Url,
	fallback: Url,
	timeout: Duration,
}

impl SeriesFetcher {
	pub fn new(
		client: Arc<dyn ArchiveClient>,
		primary: Url,
		fallback: Url,
		timeout: Duration,
	) -> Self {
		Self {
			client,
			primary,
			fallback,
			timeout,
		}
	}

	pub fn from_config(client: Arc<dyn ArchiveClient>, config: &ArchiveConfig) -> Self {
		Self::new(
			client,
			config.primary.clone(),
			config.fallback.clone(),
			config.timeout(),
		)
	}

	/// Returns the series of the study, or `None` if no archive could be queried.
	///
	/// A study that is unknown to the archive yields an empty list, exactly like a study
	/// without any series.
	#[instrument(skip(self))]
	pub async fn fetch_study_series(
		&self,
		study_instance_uid: &str,
	) -> Option<Vec<DicomJsonObject>> {
		for (attempt, base_url) in [&self.primary, &self.fallback].into_iter().enumerate() {
			if attempt > 0 {
				info!(archive = %base_url, "Falling back to secondary archive");
			}
			match self
				.client
				.query_study_series(base_url, study_instance_uid, self.timeout)
				.await
			{
				ArchiveQueryOutcome::Found(series) => return Some(series),
				ArchiveQueryOutcome::NotFound => return Some(Vec::new()),
				ArchiveQueryOutcome::Unavailable => {}
			}
		}

		warn!("No archive is available");
		None
	}
}
