//! Runs the API work behind dispatched actions.
//!
//! Reducers stay pure; anything that talks to the backend is started here
//! after the action has been reduced. Graph queries are "latest wins": a new
//! [`ExploreAction::GraphStart`] aborts the one in flight.

use std::rc::Rc;

use futures::StreamExt;
use futures::channel::mpsc::UnboundedReceiver;
use futures::future::{AbortHandle, abortable};
use leptos::task::spawn_local;
use log::{debug, info};

use super::auth::{self, AuthAction};
use super::entity_info::{EntityInfoAction, load_entity_info};
use super::explore::{ExploreAction, run_graph_query, run_search};
use super::features::{FeatureAction, fetch_flags, toggle_flag};
use super::file_ingest::{FileIngestAction, fetch_jobs};
use super::tier_zero::{TierZeroAction, flush_changelog, load_asset_groups};
use super::{Action, Store};
use crate::api::Backend;
use crate::config::AppConfig;

/// Consumes the store's intents until the store is dropped.
///
/// Request ids are counted here the same way the explore reducer counts
/// them, so the store must start from a default explore state.
pub async fn run<B: Backend + 'static>(
	store: Store,
	api: Rc<B>,
	config: AppConfig,
	mut intents: UnboundedReceiver<Action>,
) {
	info!("effects runner started");
	let mut graph_requests = 0u64;
	let mut in_flight: Option<AbortHandle> = None;

	while let Some(action) = intents.next().await {
		if let Action::Explore(ExploreAction::GraphStart(request)) = action {
			graph_requests += 1;
			if let Some(previous) = in_flight.take() {
				debug!("aborting graph request {}", graph_requests - 1);
				previous.abort();
			}
			let request_id = graph_requests;
			let (store, api) = (store.clone(), api.clone());
			let (task, handle) = abortable(async move {
				run_graph_query(&store, &*api, request_id, &request).await;
			});
			in_flight = Some(handle);
			spawn_local(async move {
				let _ = task.await;
			});
			continue;
		}

		let (store, api, config) = (store.clone(), api.clone(), config.clone());
		spawn_local(async move {
			handle(&store, &*api, &config, &action).await;
		});
	}
	info!("effects runner stopped");
}

/// Performs the work for one reduced action. Actions with no side effects
/// are ignored. Graph queries are started by [`run`] instead.
pub async fn handle<A: Backend + ?Sized>(store: &Store, api: &A, config: &AppConfig, action: &Action) {
	match action {
		Action::TierZero(TierZeroAction::FlushStart) => {
			flush_changelog(store, api, config.flush_failure).await
		}
		Action::TierZero(TierZeroAction::LoadAssetGroups) => load_asset_groups(store, api).await,
		Action::Explore(ExploreAction::Search(term)) => run_search(store, api, term).await,
		Action::EntityInfo(EntityInfoAction::Select(node)) => {
			load_entity_info(store, api, &node.id).await
		}
		Action::Features(FeatureAction::Fetch) => fetch_flags(store, api).await,
		Action::Features(FeatureAction::Toggle(id)) => toggle_flag(store, api, *id).await,
		Action::FileIngest(FileIngestAction::Fetch { page }) => {
			fetch_jobs(store, api, *page, config.file_ingest_page_size).await
		}
		Action::Auth(AuthAction::LoginStart { username, secret }) => {
			auth::login(store, api, username, secret).await
		}
		Action::Auth(AuthAction::Logout) => auth::logout(api).await,
		_ => {}
	}
}
