use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use log::debug;
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::{ApiError, ApiResult};
use super::types::{
	AssetGroup, AssetGroupList, CypherRequest, Envelope, FeatureFlag, FileIngestJob,
	LoginRequest, SearchResult, SelectorChange, Session,
};
use super::{AssetGroupApi, AuthApi, EntityApi, EntityInfo, FeatureFlagApi, FileIngestApi, GraphApi};
use crate::graph::GraphPayload;

/// REST client for the analysis backend. Clones share the session token.
#[derive(Clone)]
pub struct ApiClient {
	base_url: String,
	http: reqwest::Client,
	token: Rc<RefCell<Option<String>>>,
}

impl ApiClient {
	pub fn new(base_url: &str) -> Self {
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
			http: reqwest::Client::new(),
			token: Rc::new(RefCell::new(None)),
		}
	}

	pub fn set_token(&self, token: Option<String>) {
		*self.token.borrow_mut() = token;
	}

	pub fn has_token(&self) -> bool {
		self.token.borrow().is_some()
	}

	fn url(&self, path: &str) -> String {
		if path.starts_with("http://") || path.starts_with("https://") {
			return path.to_string();
		}
		format!("{}/{}", self.base_url, path.trim_start_matches('/'))
	}

	fn request(&self, method: Method, path: &str) -> RequestBuilder {
		let url = self.url(path);
		debug!("{method} {url}");
		let builder = self.http.request(method, url);
		match self.token.borrow().as_deref() {
			Some(token) => builder.bearer_auth(token),
			None => builder,
		}
	}

	async fn send(builder: RequestBuilder) -> ApiResult<Response> {
		let response = builder.send().await?;
		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(ApiError::Status {
				status: status.as_u16(),
				body,
			});
		}
		Ok(response)
	}

	async fn data<T: DeserializeOwned>(builder: RequestBuilder) -> ApiResult<T> {
		let value: Value = Self::send(builder).await?.json().await?;
		let envelope: Envelope<T> = serde_json::from_value(value)?;
		Ok(envelope.data)
	}

	async fn graph(builder: RequestBuilder) -> ApiResult<GraphPayload> {
		let value: Value = Self::data(builder).await?;
		Ok(GraphPayload::from_json(value)?)
	}

	async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<()> {
		Self::send(self.request(Method::PUT, path).json(body)).await?;
		Ok(())
	}
}

#[async_trait(?Send)]
impl GraphApi for ApiClient {
	async fn search(&self, keyword: &str, kind: Option<&str>) -> ApiResult<Vec<SearchResult>> {
		let mut query = vec![("q", keyword)];
		if let Some(kind) = kind {
			query.push(("type", kind));
		}
		Self::data(
			self.request(Method::GET, "/api/v2/search")
				.query(&query)
				.header("Prefer", "wait=60"),
		)
		.await
	}

	async fn graph_search(&self, query: &str, search_type: &str) -> ApiResult<GraphPayload> {
		Self::graph(
			self.request(Method::GET, "/api/v2/graph-search")
				.query(&[("query", query), ("type", search_type)]),
		)
		.await
	}

	async fn pathfinding(&self, start: &str, end: &str) -> ApiResult<GraphPayload> {
		Self::graph(
			self.request(Method::GET, "/api/v2/pathfinding")
				.query(&[("start_node", start), ("end_node", end)]),
		)
		.await
	}

	async fn cypher(&self, query: &str, include_properties: bool) -> ApiResult<GraphPayload> {
		Self::graph(
			self.request(Method::POST, "/api/v2/graphs/cypher")
				.json(&CypherRequest {
					query,
					include_properties,
				}),
		)
		.await
	}

	async fn node_info(&self, url: &str) -> ApiResult<GraphPayload> {
		Self::graph(self.request(Method::GET, url)).await
	}

	async fn asset_group_graph(&self, asset_group_id: i64) -> ApiResult<GraphPayload> {
		Self::graph(self.request(
			Method::GET,
			&format!("/api/v2/asset-groups/{asset_group_id}/combo-node"),
		))
		.await
	}
}

#[async_trait(?Send)]
impl EntityApi for ApiClient {
	async fn entity_info(&self, object_id: &str) -> ApiResult<EntityInfo> {
		Self::data(self.request(Method::GET, &format!("/api/v2/base/{object_id}"))).await
	}
}

#[async_trait(?Send)]
impl AssetGroupApi for ApiClient {
	async fn list_asset_groups(&self) -> ApiResult<Vec<AssetGroup>> {
		let list: AssetGroupList = Self::data(self.request(Method::GET, "/api/v2/asset-groups")).await?;
		Ok(list.asset_groups)
	}

	async fn update_selectors(
		&self,
		asset_group_id: i64,
		changes: &[SelectorChange],
	) -> ApiResult<()> {
		self.put_json(
			&format!("/api/v2/asset-groups/{asset_group_id}/selectors"),
			changes,
		)
		.await
	}
}

#[async_trait(?Send)]
impl FeatureFlagApi for ApiClient {
	async fn feature_flags(&self) -> ApiResult<Vec<FeatureFlag>> {
		Self::data(self.request(Method::GET, "/api/v2/features")).await
	}

	async fn toggle_feature_flag(&self, flag_id: i64) -> ApiResult<()> {
		Self::send(self.request(Method::PUT, &format!("/api/v2/features/{flag_id}/toggle"))).await?;
		Ok(())
	}
}

#[async_trait(?Send)]
impl FileIngestApi for ApiClient {
	async fn file_ingest_jobs(&self, skip: u32, limit: u32) -> ApiResult<Vec<FileIngestJob>> {
		Self::data(
			self.request(Method::GET, "/api/v2/file-upload")
				.query(&[("skip", skip), ("limit", limit)]),
		)
		.await
	}
}

#[async_trait(?Send)]
impl AuthApi for ApiClient {
	async fn login(&self, username: &str, secret: &str) -> ApiResult<Session> {
		let session: Session = Self::data(self.request(Method::POST, "/api/v2/login").json(
			&LoginRequest {
				login_method: "secret",
				username,
				secret,
			},
		))
		.await?;
		self.set_token(Some(session.session_token.clone()));
		Ok(session)
	}

	async fn logout(&self) -> ApiResult<()> {
		if !self.has_token() {
			return Err(ApiError::Unauthenticated);
		}
		let result = Self::send(self.request(Method::POST, "/api/v2/logout")).await;
		self.set_token(None);
		result.map(|_| ())
	}
}
