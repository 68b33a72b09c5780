use super::{PatientRecord, RecordStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;

/// Record store backed by a map held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
	records: HashMap<String, PatientRecord>,
}

impl InMemoryRecordStore {
	pub fn new(records: impl IntoIterator<Item = PatientRecord>) -> Result<Self, StoreError> {
		let mut map = HashMap::new();
		for record in records {
			let study = record.study_instance_uid.clone();
			if map.insert(study.clone(), record).is_some() {
				return Err(StoreError::DuplicateStudy(study));
			}
		}
		Ok(Self { records: map })
	}

	/// A store holding the demo cases of [`Self::seeded_records`].
	pub fn seeded() -> Self {
		let records = Self::seeded_records()
			.into_iter()
			.map(|record| (record.study_instance_uid.clone(), record))
			.collect();
		Self { records }
	}

	pub fn seeded_records() -> Vec<PatientRecord> {
		vec![
			PatientRecord {
				patient_id: String::from("VET-0001"),
				name: String::from("Bella"),
				species: String::from("Canine"),
				breed: String::from("Labrador Retriever"),
				age_years: 7,
				owner: String::from("Maria Keller"),
				study_instance_uid: String::from("1.2.840.113619.2.55.3.123456789.001"),
				study_description: String::from("Thorax CT"),
				modality: String::from("CT"),
				series_instance_uids: vec![String::from("pending")],
			},
			PatientRecord {
				patient_id: String::from("VET-0002"),
				name: String::from("Milo"),
				species: String::from("Feline"),
				breed: String::from("Maine Coon"),
				age_years: 4,
				owner: String::from("Jonas Weber"),
				study_instance_uid: String::from("1.2.840.113619.2.55.3.123456789.002"),
				study_description: String::from("Abdomen radiograph"),
				modality: String::from("DX"),
				series_instance_uids: vec![String::from("pending")],
			},
			PatientRecord {
				patient_id: String::from("VET-0003"),
				name: String::from("Storm"),
				species: String::from("Equine"),
				breed: String::from("Hanoverian"),
				age_years: 12,
				owner: String::from("Lena Fischer"),
				study_instance_uid: String::from("1.2.840.113619.2.55.3.123456789.003"),
				study_description: String::from("Left forelimb MRI"),
				modality: String::from("MR"),
				series_instance_uids: vec![String::from("pending")],
			},
		]
	}
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
	async fn find_by_study_id(
		&self,
		study_instance_uid: &str,
	) -> Result<Option<PatientRecord>, StoreError> {
		Ok(self.records.get(study_instance_uid).cloned())
	}
}
