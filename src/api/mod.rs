//! Typed access to the analysis backend.
//!
//! Each concern is a trait so the effect workers can be driven by the real
//! [`ApiClient`] in the browser and by in-memory fakes in tests.

mod client;
mod error;
pub mod types;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
use types::{AssetGroup, FeatureFlag, FileIngestJob, SearchResult, SelectorChange, Session};

use crate::graph::{GraphPayload, PropertyMap};

/// Entity panel payload: the object's properties plus relationship counts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityInfo {
	#[serde(default)]
	pub props: PropertyMap,
	#[serde(flatten)]
	pub counts: PropertyMap,
}

#[async_trait(?Send)]
pub trait GraphApi {
	async fn search(&self, keyword: &str, kind: Option<&str>) -> ApiResult<Vec<SearchResult>>;
	async fn graph_search(&self, query: &str, search_type: &str) -> ApiResult<GraphPayload>;
	async fn pathfinding(&self, start: &str, end: &str) -> ApiResult<GraphPayload>;
	async fn cypher(&self, query: &str, include_properties: bool) -> ApiResult<GraphPayload>;
	async fn node_info(&self, url: &str) -> ApiResult<GraphPayload>;
	async fn asset_group_graph(&self, asset_group_id: i64) -> ApiResult<GraphPayload>;
}

#[async_trait(?Send)]
pub trait EntityApi {
	async fn entity_info(&self, object_id: &str) -> ApiResult<EntityInfo>;
}

#[async_trait(?Send)]
pub trait AssetGroupApi {
	async fn list_asset_groups(&self) -> ApiResult<Vec<AssetGroup>>;
	async fn update_selectors(&self, asset_group_id: i64, changes: &[SelectorChange])
	-> ApiResult<()>;
}

#[async_trait(?Send)]
pub trait FeatureFlagApi {
	async fn feature_flags(&self) -> ApiResult<Vec<FeatureFlag>>;
	async fn toggle_feature_flag(&self, flag_id: i64) -> ApiResult<()>;
}

#[async_trait(?Send)]
pub trait FileIngestApi {
	async fn file_ingest_jobs(&self, skip: u32, limit: u32) -> ApiResult<Vec<FileIngestJob>>;
}

#[async_trait(?Send)]
pub trait AuthApi {
	async fn login(&self, username: &str, secret: &str) -> ApiResult<Session>;
	async fn logout(&self) -> ApiResult<()>;
}

/// Everything the effect runner needs from the backend.
pub trait Backend:
	GraphApi + EntityApi + AssetGroupApi + FeatureFlagApi + FileIngestApi + AuthApi
{
}

impl<T> Backend for T where
	T: GraphApi + EntityApi + AssetGroupApi + FeatureFlagApi + FileIngestApi + AuthApi
{
}
