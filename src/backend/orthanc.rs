use crate::backend::{ArchiveClient, ArchiveQueryOutcome};
use crate::dicom_json::{series_object, tag_key, DicomJsonObject, TaggedValue};
use crate::types::QueryRetrieveLevel;
use async_trait::async_trait;
use dicom::core::VR;
use dicom::dictionary_std::tags;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, trace, warn};
use url::Url;

/// Client for the Orthanc REST API.
///
/// A study is resolved with [`/tools/find`](https://orthanc.uclouvain.be/api/#tag/System/paths/~1tools~1find/post)
/// and its series are listed with
/// [`/studies/{id}/series`](https://orthanc.uclouvain.be/api/#tag/Studies/paths/~1studies~1{id}~1series/get).
#[derive(Debug, Clone, Default)]
pub struct OrthancClient {
	http: reqwest::Client,
}

impl OrthancClient {
	pub const fn new(http: reqwest::Client) -> Self {
		Self { http }
	}

	/// Returns the Orthanc IDs of all studies with the given Study Instance UID.
	async fn find_studies(
		&self,
		base_url: &Url,
		study_instance_uid: &str,
		timeout: Duration,
	) -> Result<Vec<String>, ArchiveError> {
		let url = endpoint(base_url, &["tools", "find"])?;
		let body = FindRequest {
			level: QueryRetrieveLevel::Study,
			query: FindQuery { study_instance_uid },
		};
		trace!(%url, level = %body.level, "Sending find request");
		let request = self.http.post(url).json(&body);
		request_json(request, timeout).await
	}

	async fn list_series(
		&self,
		base_url: &Url,
		study_id: &str,
		timeout: Duration,
	) -> Result<Vec<SeriesDescriptor>, ArchiveError> {
		let url = endpoint(base_url, &["studies", study_id, "series"])?;
		trace!(%url, level = %QueryRetrieveLevel::Series, "Listing series");
		request_json(self.http.get(url), timeout).await
	}
}

#[async_trait]
impl ArchiveClient for OrthancClient {
	#[instrument(skip_all, fields(archive = %base_url, study = study_instance_uid))]
	async fn query_study_series(
		&self,
		base_url: &Url,
		study_instance_uid: &str,
		timeout: Duration,
	) -> ArchiveQueryOutcome {
		let study_ids = match self
			.find_studies(base_url, study_instance_uid, timeout)
			.await
		{
			Ok(ids) => ids,
			Err(err) => {
				warn!("Failed to find study: {err}");
				return ArchiveQueryOutcome::Unavailable;
			}
		};

		// Orthanc may index the same Study Instance UID more than once; the first match wins.
		let Some(study_id) = study_ids.first() else {
			debug!("Study is not known to the archive");
			return ArchiveQueryOutcome::NotFound;
		};

		match self.list_series(base_url, study_id, timeout).await {
			Ok(series) => {
				debug!(study_id, count = series.len(), "Received series");
				ArchiveQueryOutcome::Found(series.into_iter().map(DicomJsonObject::from).collect())
			}
			Err(err) => {
				warn!(study_id, "Failed to list series: {err}");
				ArchiveQueryOutcome::Unavailable
			}
		}
	}
}

/// Sends `request` and decodes the JSON response body, all within `timeout`.
async fn request_json<T: DeserializeOwned>(
	request: reqwest::RequestBuilder,
	timeout: Duration,
) -> Result<T, ArchiveError> {
	let exchange = async {
		let response = request.send().await?;
		let status = response.status();
		if !status.is_success() {
			return Err(ArchiveError::Status(status));
		}
		Ok::<T, ArchiveError>(response.json::<T>().await?)
	};

	tokio::time::timeout(timeout, exchange)
		.await
		.map_err(|_| ArchiveError::Timeout(timeout))?
}

/// Appends path segments to the base URL of an archive.
fn endpoint(base_url: &Url, segments: &[&str]) -> Result<Url, ArchiveError> {
	let mut url = base_url.clone();
	url.path_segments_mut()
		.map_err(|()| ArchiveError::InvalidBaseUrl(base_url.clone()))?
		.pop_if_empty()
		.extend(segments);
	Ok(url)
}

#[derive(Debug, Error)]
pub enum ArchiveError {
	#[error("request timed out after {0:?}")]
	Timeout(Duration),
	#[error("archive responded with status {0}")]
	Status(reqwest::StatusCode),
	#[error(transparent)]
	Http(#[from] reqwest::Error),
	#[error("{0} cannot be used as a base URL")]
	InvalidBaseUrl(Url),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct FindRequest<'a> {
	level: QueryRetrieveLevel,
	query: FindQuery<'a>,
}

#[derive(Debug, Serialize)]
struct FindQuery<'a> {
	#[serde(rename = "StudyInstanceUID")]
	study_instance_uid: &'a str,
}

/// Series entry of `/studies/{id}/series` (incomplete).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SeriesDescriptor {
	/// The schema of "MainDicomTags" depends on the Orthanc configuration.
	#[serde(default)]
	main_dicom_tags: serde_json::Value,
}

impl From<SeriesDescriptor> for DicomJsonObject {
	fn from(descriptor: SeriesDescriptor) -> Self {
		match descriptor.main_dicom_tags.get("SeriesInstanceUID") {
			Some(serde_json::Value::String(uid)) => series_object(uid.as_str()),
			// Kept as is, dropped during extraction
			Some(other) => Self::from([(
				tag_key(tags::SERIES_INSTANCE_UID),
				TaggedValue::new(VR::UI, vec![other.clone()]),
			)]),
			None => Self::new(),
		}
	}
}
