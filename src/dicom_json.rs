//! Minimal model of the DICOM JSON format.
//!
//! <https://dicom.nema.org/medical/dicom/current/output/chtml/part18/chapter_F.html>
use crate::types::UI;
use dicom::core::{Tag, VR};
use dicom::dictionary_std::tags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A DICOM JSON object: attribute tag keys (`ggggeeee`) mapped to attributes.
pub type DicomJsonObject = BTreeMap<String, TaggedValue>;

/// A single attribute of a DICOM JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedValue {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub vr: Option<String>,
	#[serde(rename = "Value", default, skip_serializing_if = "Option::is_none")]
	pub value: Option<Vec<serde_json::Value>>,
}

impl TaggedValue {
	pub fn new(vr: VR, value: Vec<serde_json::Value>) -> Self {
		Self {
			vr: Some(vr.to_string().into()),
			value: Some(value),
		}
	}

	/// Creates a UI attribute holding a single UID.
	pub fn uid(uid: impl Into<UI>) -> Self {
		Self::new(VR::UI, vec![serde_json::Value::String(uid.into())])
	}

	/// The first value, if it is a string.
	pub fn first_str(&self) -> Option<&str> {
		self.value.as_ref()?.first()?.as_str()
	}
}

/// Formats a tag as a DICOM JSON attribute key, e.g. `0020000E`.
pub fn tag_key(tag: Tag) -> String {
	format!("{:04X}{:04X}", tag.group(), tag.element())
}

/// Builds the DICOM JSON object describing a single series.
pub fn series_object(series_instance_uid: impl Into<UI>) -> DicomJsonObject {
	DicomJsonObject::from([(
		tag_key(tags::SERIES_INSTANCE_UID),
		TaggedValue::uid(series_instance_uid),
	)])
}

/// Collects the Series Instance UIDs of `series` in order.
///
/// Objects without a Series Instance UID, or whose first value is not a string, are skipped.
pub fn extract_series_uids(series: &[DicomJsonObject]) -> Vec<UI> {
	let key = tag_key(tags::SERIES_INSTANCE_UID);
	series
		.iter()
		.filter_map(|object| object.get(&key)?.first_str())
		.map(UI::from)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use serde_json::json;

	#[test]
	fn series_instance_uid_key() {
		assert_eq!(tag_key(tags::SERIES_INSTANCE_UID), "0020000E");
		assert_eq!(tag_key(tags::STUDY_INSTANCE_UID), "0020000D");
	}

	#[test]
	fn serialize_series_object() {
		let object = series_object("1.2.3.4");
		assert_eq!(
			serde_json::to_value(&object).unwrap(),
			json!({ "0020000E": { "vr": "UI", "Value": ["1.2.3.4"] } })
		);
	}

	#[test]
	fn extract_keeps_order() {
		let series = vec![
			series_object("1.1"),
			series_object("1.2"),
			series_object("1.3"),
		];
		assert_eq!(extract_series_uids(&series), vec!["1.1", "1.2", "1.3"]);
	}

	#[test]
	fn extract_skips_malformed_entries() {
		let series: Vec<DicomJsonObject> = serde_json::from_value(json!([
			{ "0020000E": { "vr": "UI", "Value": ["1.1"] } },
			{ "0020000E": { "vr": "UI" } },
			{ "0020000E": { "vr": "UI", "Value": [42] } },
			{ "0020000E": { "vr": "UI", "Value": [] } },
			{ "0020000E": { "vr": "UI", "Value": ["1.2"] } },
			{ "00080060": { "vr": "CS", "Value": ["CT"] } },
			{},
			{ "0020000E": { "vr": "UI", "Value": [null, "1.9"] } },
			{ "0020000E": { "vr": "UI", "Value": ["1.3"] } }
		]))
		.unwrap();

		assert_eq!(extract_series_uids(&series), vec!["1.1", "1.2", "1.3"]);
	}

	#[test]
	fn extract_from_empty_list() {
		assert!(extract_series_uids(&[]).is_empty());
	}
}
