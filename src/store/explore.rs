//! Search and graph query state for the Explore page.

use std::sync::Arc;

use log::{error, warn};

use super::notifications::{NotificationAction, Severity};
use super::{Action, Store};
use crate::api::GraphApi;
use crate::api::types::SearchResult;
use crate::graph::{FlatGraph, normalize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphRequest {
	Search { query: String, search_type: String },
	Pathfinding { start: String, end: String },
	Cypher { query: String },
	NodeInfo { url: String },
	AssetGroup { asset_group_id: i64 },
}

impl GraphRequest {
	/// Node-info graphs are opened from the entity panel and keep it open.
	pub fn replaces_selection(&self) -> bool {
		!matches!(self, GraphRequest::NodeInfo { .. })
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutKind {
	/// Force directed simulation.
	#[default]
	Standard,
	/// Layered layout following edge direction.
	Sequential,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExploreState {
	pub request: Option<GraphRequest>,
	pub request_id: u64,
	pub loading: bool,
	/// `None` until the first graph arrives.
	pub graph: Option<Arc<FlatGraph>>,
	pub error: Option<String>,
	pub layout: LayoutKind,
	pub search_term: String,
	pub search_results: Vec<SearchResult>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExploreAction {
	GraphStart(GraphRequest),
	GraphLoaded { request_id: u64, graph: FlatGraph },
	GraphFailed { request_id: u64, error: String },
	ClearGraph,
	SetLayout(LayoutKind),
	Search(String),
	SearchResults { term: String, results: Vec<SearchResult> },
}

impl ExploreState {
	pub fn reduce(mut self, action: &Action) -> Self {
		let Action::Explore(action) = action else {
			return self;
		};
		match action {
			ExploreAction::GraphStart(request) => {
				self.request = Some(request.clone());
				self.request_id += 1;
				self.loading = true;
				self.error = None;
			}
			ExploreAction::GraphLoaded { request_id, graph } => {
				if *request_id != self.request_id {
					warn!("dropping graph for superseded request {request_id}");
					return self;
				}
				self.loading = false;
				self.graph = Some(Arc::new(graph.clone()));
			}
			ExploreAction::GraphFailed { request_id, error } => {
				if *request_id != self.request_id {
					return self;
				}
				self.loading = false;
				self.error = Some(error.clone());
			}
			ExploreAction::ClearGraph => {
				self.graph = None;
				self.request = None;
				self.loading = false;
				self.error = None;
			}
			ExploreAction::SetLayout(layout) => self.layout = *layout,
			ExploreAction::Search(term) => {
				self.search_term = term.clone();
				if term.trim().is_empty() {
					self.search_results.clear();
				}
			}
			ExploreAction::SearchResults { term, results } => {
				if *term == self.search_term {
					self.search_results = results.clone();
				}
			}
		}
		self
	}
}

pub async fn run_graph_query<A: GraphApi + ?Sized>(
	store: &Store,
	api: &A,
	request_id: u64,
	request: &GraphRequest,
) {
	let response = match request {
		GraphRequest::Search { query, search_type } => api.graph_search(query, search_type).await,
		GraphRequest::Pathfinding { start, end } => api.pathfinding(start, end).await,
		GraphRequest::Cypher { query } => api.cypher(query, true).await,
		GraphRequest::NodeInfo { url } => api.node_info(url).await,
		GraphRequest::AssetGroup { asset_group_id } => api.asset_group_graph(*asset_group_id).await,
	};

	match response {
		Ok(payload) => store.dispatch(ExploreAction::GraphLoaded {
			request_id,
			graph: normalize(Some(payload)).unwrap_or_default(),
		}),
		Err(e) => {
			error!("graph query failed: {e}");
			if matches!(request, GraphRequest::NodeInfo { .. }) {
				store.dispatch(NotificationAction::push(
					"Query failed. Please try again.",
					Severity::Error,
					"nodeInfoQueryFailure",
				));
			}
			store.dispatch(ExploreAction::GraphFailed {
				request_id,
				error: e.to_string(),
			});
		}
	}
}

pub async fn run_search<A: GraphApi + ?Sized>(store: &Store, api: &A, term: &str) {
	if term.trim().is_empty() {
		return;
	}
	let results = match api.search(term, None).await {
		Ok(results) => results,
		Err(e) => {
			// an empty list reads as "no matches"
			warn!("search for {term:?} failed: {e}");
			Vec::new()
		}
	};
	store.dispatch(ExploreAction::SearchResults {
		term: term.to_string(),
		results,
	});
}

#[cfg(test)]
mod tests {
	use async_trait::async_trait;
	use futures::executor::block_on;
	use serde_json::json;

	use super::*;
	use crate::api::{ApiError, ApiResult};
	use crate::graph::GraphPayload;
	use crate::store::AppState;

	struct FakeGraphs;

	fn payload() -> GraphPayload {
		GraphPayload::from_json(json!({
			"nodes": {
				"1": { "label": "ALICE@CORP.LOCAL", "kind": "User", "objectId": "S-1-5-21-1000" },
				"2": { "label": "CORP.LOCAL", "kind": "Domain", "objectId": "S-1-5-21" }
			},
			"edges": [{ "source": "1", "target": "2", "label": "DCSync", "kind": "DCSync" }]
		}))
		.unwrap()
	}

	#[async_trait(?Send)]
	impl GraphApi for FakeGraphs {
		async fn search(&self, keyword: &str, _kind: Option<&str>) -> ApiResult<Vec<SearchResult>> {
			Ok(vec![SearchResult {
				objectid: "S-1-5-21-1000".into(),
				name: format!("{keyword}@CORP.LOCAL"),
				kind: "User".into(),
				distinguishedname: None,
				system_tags: None,
			}])
		}
		async fn graph_search(&self, _query: &str, _search_type: &str) -> ApiResult<GraphPayload> {
			Ok(payload())
		}
		async fn pathfinding(&self, _start: &str, _end: &str) -> ApiResult<GraphPayload> {
			Ok(payload())
		}
		async fn cypher(&self, _query: &str, _include: bool) -> ApiResult<GraphPayload> {
			Ok(payload())
		}
		async fn node_info(&self, _url: &str) -> ApiResult<GraphPayload> {
			Err(ApiError::Status {
				status: 404,
				body: "not found".into(),
			})
		}
		async fn asset_group_graph(&self, _id: i64) -> ApiResult<GraphPayload> {
			Ok(payload())
		}
	}

	fn start(store: &Store, request: GraphRequest) -> u64 {
		store.dispatch(ExploreAction::GraphStart(request));
		store.select(|s| s.explore.request_id)
	}

	#[test]
	fn graph_query_stores_normalized_graph() {
		let (store, _) = Store::new(AppState::default());
		let request = GraphRequest::Cypher {
			query: "MATCH (n) RETURN n".into(),
		};
		let id = start(&store, request.clone());

		block_on(run_graph_query(&store, &FakeGraphs, id, &request));

		let explore = store.select(|s| s.explore.clone());
		assert!(!explore.loading);
		let graph = explore.graph.unwrap();
		assert_eq!(graph.nodes().count(), 2);
		assert!(graph.edge("1_DCSync_2").is_some());
	}

	#[test]
	fn superseded_results_are_ignored() {
		let (store, _) = Store::new(AppState::default());
		let first = GraphRequest::Pathfinding {
			start: "a".into(),
			end: "b".into(),
		};
		let stale_id = start(&store, first.clone());
		start(
			&store,
			GraphRequest::Search {
				query: "alice".into(),
				search_type: "exact".into(),
			},
		);

		block_on(run_graph_query(&store, &FakeGraphs, stale_id, &first));

		let explore = store.select(|s| s.explore.clone());
		assert!(explore.loading);
		assert!(explore.graph.is_none());
	}

	#[test]
	fn failed_node_info_query_notifies() {
		let (store, _) = Store::new(AppState::default());
		let request = GraphRequest::NodeInfo {
			url: "/api/v2/users/1/sessions?type=graph".into(),
		};
		let id = start(&store, request.clone());

		block_on(run_graph_query(&store, &FakeGraphs, id, &request));

		let state = store.state();
		assert!(state.explore.error.is_some());
		assert_eq!(state.notifications.items[0].key, "nodeInfoQueryFailure");
	}

	#[test]
	fn search_results_for_old_terms_are_dropped() {
		let (store, _) = Store::new(AppState::default());
		store.dispatch(ExploreAction::Search("ali".into()));
		store.dispatch(ExploreAction::Search("alice".into()));

		block_on(run_search(&store, &FakeGraphs, "ali"));
		assert!(store.select(|s| s.explore.search_results.is_empty()));

		block_on(run_search(&store, &FakeGraphs, "alice"));
		assert_eq!(store.select(|s| s.explore.search_results.len()), 1);
	}
}
