//! This module contains the image archive backend.
//! - [`orthanc::OrthancClient`] resolves a study and lists its series via the Orthanc REST API.
//! - [`fallback::SeriesFetcher`] queries a primary archive and falls back to a secondary one.

pub mod fallback;
pub mod orthanc;
#[cfg(test)]
pub mod testing;

use crate::dicom_json::DicomJsonObject;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

pub use fallback::SeriesFetcher;
pub use orthanc::OrthancClient;

/// Result of querying a single archive for the series of a study.
#[derive(Debug, Clone, PartialEq)]
pub enum ArchiveQueryOutcome {
	/// The study exists. Holds one DICOM JSON object per series, which may be none.
	Found(Vec<DicomJsonObject>),
	/// The archive answered, but does not know the study.
	NotFound,
	/// The archive could not be queried (connection error, error status, timeout).
	Unavailable,
}

/// Queries a single archive server for the series of a study.
///
/// Implementations never fail: every network or protocol error is reported as
/// [`ArchiveQueryOutcome::Unavailable`].
#[async_trait]
pub trait ArchiveClient: Send + Sync {
	async fn query_study_series(
		&self,
		base_url: &Url,
		study_instance_uid: &str,
		timeout: Duration,
	) -> ArchiveQueryOutcome;
}
