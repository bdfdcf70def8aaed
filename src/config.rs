//! Runtime configuration read from the host page.
//!
//! The page may embed `<script id="app-config" type="application/json">`;
//! every field is optional and falls back to the defaults below.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_ELEMENT_ID: &str = "app-config";

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid configuration: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("no document available")]
	NoDocument,
}

/// What the user sees when submitting tier zero changes fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushFailurePolicy {
	/// Log the error, keep the pending changes, show nothing.
	LogOnly,
	/// Log the error, keep the pending changes and show a notification.
	#[default]
	Notify,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankDirection {
	#[default]
	TopBottom,
	LeftRight,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelZoomConfig {
	/// Zoom factor applied per wheel tick.
	pub ratio: f64,
	pub duration_ms: f64,
}

impl Default for WheelZoomConfig {
	fn default() -> Self {
		Self {
			ratio: 1.25,
			duration_ms: 250.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayeredLayoutConfig {
	pub direction: RankDirection,
	pub node_sep: f64,
	pub rank_sep: f64,
	/// Crossing minimization sweeps.
	pub sweeps: usize,
}

impl Default for LayeredLayoutConfig {
	fn default() -> Self {
		Self {
			direction: RankDirection::LeftRight,
			node_sep: 50.0,
			rank_sep: 150.0,
			sweeps: 4,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	pub api_base_url: String,
	pub wheel_zoom: WheelZoomConfig,
	pub layout: LayeredLayoutConfig,
	pub default_node_size: f64,
	pub flush_failure: FlushFailurePolicy,
	pub file_ingest_page_size: u32,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base_url: String::new(),
			wheel_zoom: WheelZoomConfig::default(),
			layout: LayeredLayoutConfig::default(),
			default_node_size: 15.0,
			flush_failure: FlushFailurePolicy::default(),
			file_ingest_page_size: 25,
		}
	}
}

impl AppConfig {
	pub fn from_json(text: &str) -> Result<Self, ConfigError> {
		Ok(serde_json::from_str(text)?)
	}

	fn from_document() -> Result<Option<Self>, ConfigError> {
		let document = web_sys::window()
			.and_then(|w| w.document())
			.ok_or(ConfigError::NoDocument)?;
		match document
			.get_element_by_id(CONFIG_ELEMENT_ID)
			.and_then(|el| el.text_content())
		{
			Some(text) if !text.trim().is_empty() => Self::from_json(&text).map(Some),
			_ => Ok(None),
		}
	}

	/// Reads the page configuration, logging and falling back to defaults
	/// when it is missing or malformed. An empty base URL means the API is
	/// served from the page origin.
	pub fn load() -> Self {
		let mut config = match Self::from_document() {
			Ok(Some(config)) => {
				info!("Loaded configuration from #{CONFIG_ELEMENT_ID}");
				config
			}
			Ok(None) => Self::default(),
			Err(e) => {
				warn!("Using default configuration: {e}");
				Self::default()
			}
		};
		if config.api_base_url.is_empty() {
			config.api_base_url = web_sys::window()
				.and_then(|w| w.location().origin().ok())
				.unwrap_or_default();
		}
		config
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let config = AppConfig::from_json(
			r#"{ "api_base_url": "https://bh.corp.local", "wheel_zoom": { "ratio": 1.5 } }"#,
		)
		.unwrap();
		assert_eq!(config.api_base_url, "https://bh.corp.local");
		assert_eq!(config.wheel_zoom.ratio, 1.5);
		assert_eq!(config.wheel_zoom.duration_ms, 250.0);
		assert_eq!(config.flush_failure, FlushFailurePolicy::Notify);
	}

	#[test]
	fn flush_policy_is_configurable() {
		let config = AppConfig::from_json(r#"{ "flush_failure": "log_only" }"#).unwrap();
		assert_eq!(config.flush_failure, FlushFailurePolicy::LogOnly);
	}

	#[test]
	fn malformed_json_is_an_error() {
		assert!(matches!(
			AppConfig::from_json("{ nope"),
			Err(ConfigError::Parse(_))
		));
	}
}
