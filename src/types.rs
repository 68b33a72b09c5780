use serde::Serialize;
use std::fmt::{Display, Formatter};

/// UI (Unique Identifier) value representation.
pub type UI = String;

/// Resource level of an archive query. Displays the same way as it is serialized.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum QueryRetrieveLevel {
	Study,
	Series,
}

impl Display for QueryRetrieveLevel {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Study => write!(f, "Study"),
			Self::Series => write!(f, "Series"),
		}
	}
}
