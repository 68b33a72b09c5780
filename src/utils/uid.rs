use regex::Regex;
use std::sync::LazyLock;

/// Maximum length of a UID (PS3.5 section 9.1).
pub const MAX_UID_LENGTH: usize = 64;

static UID_PATTERN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)*$").expect("UID pattern is valid"));

/// Checks whether `candidate` is a well-formed UID: numeric components separated by single
/// dots, at most 64 characters.
pub fn is_valid_uid(candidate: &str) -> bool {
	!candidate.is_empty() && candidate.len() <= MAX_UID_LENGTH && UID_PATTERN.is_match(candidate)
}
