//! Edge keys of the form `<source>_<label>_<target>`.
//!
//! Node ids never contain the delimiter, relationship labels may
//! (`AZMGGroup_ReadWrite_All`), so the first and last segments are the
//! endpoints and everything in between is the label.

use log::warn;

use super::types::EDGE_ID_PREFIX;

pub const DELIMITER: char = '_';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeKey {
	pub source: String,
	pub label: String,
	pub target: String,
}

impl EdgeKey {
	/// Strips the flat-graph `rel_` prefix before parsing.
	pub fn from_flat_id(id: &str) -> Option<Self> {
		parse(id.strip_prefix(EDGE_ID_PREFIX).unwrap_or(id))
	}

	pub fn key(&self) -> String {
		format(&self.source, &self.label, &self.target)
	}
}

pub fn format(source: &str, label: &str, target: &str) -> String {
	format!("{source}{DELIMITER}{label}{DELIMITER}{target}")
}

pub fn parse(key: &str) -> Option<EdgeKey> {
	let segments: Vec<&str> = key.split(DELIMITER).collect();
	if segments.len() < 3 {
		warn!("unable to parse edge key {key:?}: expected source_label_target");
		return None;
	}

	let last = segments.len() - 1;
	Some(EdgeKey {
		source: segments[0].to_string(),
		label: segments[1..last].join(&DELIMITER.to_string()),
		target: segments[last].to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_simple_key() {
		let key = parse("a_MemberOf_b").unwrap();
		assert_eq!(key.source, "a");
		assert_eq!(key.label, "MemberOf");
		assert_eq!(key.target, "b");
	}

	#[test]
	fn label_may_contain_delimiter() {
		let key = parse("a_AZMGGroup_ReadWrite_All_b").unwrap();
		assert_eq!(
			key,
			EdgeKey {
				source: "a".into(),
				label: "AZMGGroup_ReadWrite_All".into(),
				target: "b".into(),
			}
		);
	}

	#[test]
	fn sid_endpoints_round_trip_through_format() {
		let key = EdgeKey {
			source: "S-1-5-21-3130019616-2776909439-2417379446-1105".into(),
			label: "AZMGServicePrincipalEndpoint_ReadWrite_All".into(),
			target: "0F0B2C3A-DA4E-4A9E-B8C5-8F2E7F4A3E11".into(),
		};
		assert_eq!(parse(&key.key()), Some(key));
	}

	#[test]
	fn rejects_keys_with_too_few_segments() {
		assert_eq!(parse(""), None);
		assert_eq!(parse("invalid"), None);
		assert_eq!(parse("still_invalid"), None);
		assert_eq!(parse("a_"), None);
	}

	#[test]
	fn flat_ids_drop_the_rel_prefix() {
		let key = EdgeKey::from_flat_id("rel_1_GenericAll_2").unwrap();
		assert_eq!(key.source, "1");
		assert_eq!(key.label, "GenericAll");
		assert_eq!(key.target, "2");
	}
}
