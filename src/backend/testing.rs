use crate::backend::{ArchiveClient, ArchiveQueryOutcome};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// In-memory archive that answers with a fixed outcome per base URL.
/// Base URLs without an outcome are unavailable.
#[derive(Default)]
pub struct MockArchive {
	outcomes: HashMap<String, ArchiveQueryOutcome>,
	calls: Mutex<Vec<(String, String)>>,
}

impl MockArchive {
	pub fn with(mut self, base_url: &str, outcome: ArchiveQueryOutcome) -> Self {
		self.outcomes.insert(normalize(base_url), outcome);
		self
	}

	/// Number of queries sent to `base_url`.
	pub fn calls(&self, base_url: &str) -> usize {
		let base_url = normalize(base_url);
		self.calls
			.lock()
			.unwrap()
			.iter()
			.filter(|(url, _)| *url == base_url)
			.count()
	}

	pub fn total_calls(&self) -> usize {
		self.calls.lock().unwrap().len()
	}
}

fn normalize(base_url: &str) -> String {
	Url::parse(base_url).unwrap().to_string()
}

#[async_trait]
impl ArchiveClient for MockArchive {
	async fn query_study_series(
		&self,
		base_url: &Url,
		study_instance_uid: &str,
		_timeout: Duration,
	) -> ArchiveQueryOutcome {
		self.calls
			.lock()
			.unwrap()
			.push((base_url.to_string(), study_instance_uid.to_owned()));
		self.outcomes
			.get(base_url.as_str())
			.cloned()
			.unwrap_or(ArchiveQueryOutcome::Unavailable)
	}
}
