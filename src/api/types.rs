use std::fmt;

use serde::{Deserialize, Serialize};

/// Every API payload is wrapped in `{ "data": ... }`.
#[derive(Clone, Debug, Deserialize)]
pub struct Envelope<T> {
	pub data: T,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
	pub objectid: String,
	pub name: String,
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub distinguishedname: Option<String>,
	#[serde(default)]
	pub system_tags: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
	pub user_id: String,
	pub session_token: String,
	#[serde(default)]
	pub auth_expired: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest<'a> {
	pub login_method: &'a str,
	pub username: &'a str,
	pub secret: &'a str,
}

#[derive(Clone, Debug, Serialize)]
pub struct CypherRequest<'a> {
	pub query: &'a str,
	pub include_properties: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetGroup {
	pub id: i64,
	pub name: String,
	pub tag: String,
	#[serde(default)]
	pub system_group: bool,
	#[serde(default)]
	pub member_count: u64,
}

pub const TIER_ZERO_TAG: &str = "admin_tier_0";

#[derive(Clone, Debug, Deserialize)]
pub struct AssetGroupList {
	pub asset_groups: Vec<AssetGroup>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
	Add,
	Remove,
}

/// One entry of an asset group selector changeset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorChange {
	pub action: ChangeKind,
	pub selector_name: String,
	pub sid: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlag {
	pub id: i64,
	pub key: String,
	pub name: String,
	pub description: String,
	pub enabled: bool,
	pub user_updatable: bool,
}

/// Ingest job states as numbered by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum JobStatus {
	Invalid,
	Ready,
	Running,
	Complete,
	Canceled,
	TimedOut,
	Failed,
	Ingesting,
	Analyzing,
	PartiallyComplete,
}

impl JobStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			JobStatus::Invalid => "Invalid",
			JobStatus::Ready => "Ready",
			JobStatus::Running => "Running",
			JobStatus::Complete => "Complete",
			JobStatus::Canceled => "Canceled",
			JobStatus::TimedOut => "Timed Out",
			JobStatus::Failed => "Failed",
			JobStatus::Ingesting => "Ingesting",
			JobStatus::Analyzing => "Analyzing",
			JobStatus::PartiallyComplete => "Partially Complete",
		}
	}
}

impl fmt::Display for JobStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl TryFrom<i32> for JobStatus {
	type Error = String;

	fn try_from(code: i32) -> Result<Self, Self::Error> {
		Ok(match code {
			-1 => JobStatus::Invalid,
			0 => JobStatus::Ready,
			1 => JobStatus::Running,
			2 => JobStatus::Complete,
			3 => JobStatus::Canceled,
			4 => JobStatus::TimedOut,
			5 => JobStatus::Failed,
			6 => JobStatus::Ingesting,
			7 => JobStatus::Analyzing,
			8 => JobStatus::PartiallyComplete,
			other => return Err(format!("unknown job status code {other}")),
		})
	}
}

impl From<JobStatus> for i32 {
	fn from(status: JobStatus) -> i32 {
		match status {
			JobStatus::Invalid => -1,
			JobStatus::Ready => 0,
			JobStatus::Running => 1,
			JobStatus::Complete => 2,
			JobStatus::Canceled => 3,
			JobStatus::TimedOut => 4,
			JobStatus::Failed => 5,
			JobStatus::Ingesting => 6,
			JobStatus::Analyzing => 7,
			JobStatus::PartiallyComplete => 8,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileIngestJob {
	pub id: i64,
	#[serde(default)]
	pub user_email_address: Option<String>,
	pub status: JobStatus,
	#[serde(default)]
	pub status_message: String,
	pub start_time: String,
	#[serde(default)]
	pub end_time: Option<String>,
	#[serde(default)]
	pub total_files: u32,
	#[serde(default)]
	pub failed_files: u32,
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn job_status_codes_map_to_labels() {
		let expected = [
			(-1, "Invalid"),
			(0, "Ready"),
			(1, "Running"),
			(2, "Complete"),
			(3, "Canceled"),
			(4, "Timed Out"),
			(5, "Failed"),
			(6, "Ingesting"),
			(7, "Analyzing"),
			(8, "Partially Complete"),
		];
		for (code, label) in expected {
			let status = JobStatus::try_from(code).unwrap();
			assert_eq!(status.to_string(), label);
			assert_eq!(i32::from(status), code);
		}
	}

	#[test]
	fn unknown_job_status_is_rejected() {
		assert!(JobStatus::try_from(9).is_err());
		assert!(serde_json::from_value::<JobStatus>(json!(-2)).is_err());
	}

	#[test]
	fn ingest_job_decodes_numeric_status() {
		let job: FileIngestJob = serde_json::from_value(json!({
			"id": 7,
			"user_email_address": "admin@corp.local",
			"status": 8,
			"status_message": "2 files failed",
			"start_time": "2024-03-01T10:00:00Z",
			"end_time": "2024-03-01T10:05:00Z",
			"total_files": 10,
			"failed_files": 2
		}))
		.unwrap();
		assert_eq!(job.status, JobStatus::PartiallyComplete);
	}

	#[test]
	fn selector_change_uses_lowercase_actions() {
		let change = SelectorChange {
			action: ChangeKind::Remove,
			selector_name: "S-1-5-21-1000".into(),
			sid: "S-1-5-21-1000".into(),
		};
		assert_eq!(
			serde_json::to_value(change).unwrap(),
			json!({ "action": "remove", "selector_name": "S-1-5-21-1000", "sid": "S-1-5-21-1000" })
		);
	}
}
