//! Pending membership edits for the tier zero asset group.
//!
//! The changelog is a local edit buffer keyed by principal id: a later
//! change for the same principal replaces the earlier one. It is submitted
//! as a whole by [`flush_changelog`] or discarded.

use std::collections::BTreeMap;

use log::{debug, error, info};
use thiserror::Error;

use super::notifications::{NotificationAction, Severity};
use super::{Action, Store};
use crate::api::types::{AssetGroup, ChangeKind, SelectorChange, TIER_ZERO_TAG};
use crate::api::{ApiError, AssetGroupApi};
use crate::config::FlushFailurePolicy;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingChange {
	pub change: ChangeKind,
	pub name: String,
	pub kind: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TierZeroState {
	pub changelog: BTreeMap<String, PendingChange>,
	pub asset_group_id: Option<i64>,
	pub flushing: bool,
	pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TierZeroAction {
	Change {
		id: String,
		change: PendingChange,
	},
	DiscardChange(String),
	DiscardAll,
	FlushStart,
	FlushSuccess,
	FlushFailure(String),
	LoadAssetGroups,
	AssetGroupsLoaded(Vec<AssetGroup>),
	AssetGroupsFailed(String),
}

impl TierZeroAction {
	pub fn add_principal(id: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
		Self::change(ChangeKind::Add, id.into(), name.into(), kind.into())
	}

	pub fn remove_principal(
		id: impl Into<String>,
		name: impl Into<String>,
		kind: impl Into<String>,
	) -> Self {
		Self::change(ChangeKind::Remove, id.into(), name.into(), kind.into())
	}

	fn change(change: ChangeKind, id: String, name: String, kind: String) -> Self {
		TierZeroAction::Change {
			id,
			change: PendingChange { change, name, kind },
		}
	}
}

impl TierZeroState {
	pub fn reduce(mut self, action: &Action) -> Self {
		let Action::TierZero(action) = action else {
			return self;
		};
		match action {
			TierZeroAction::Change { id, change } => {
				self.changelog.insert(id.clone(), change.clone());
			}
			TierZeroAction::DiscardChange(id) => {
				self.changelog.remove(id);
			}
			TierZeroAction::DiscardAll => self.changelog.clear(),
			TierZeroAction::FlushStart => {
				self.flushing = true;
				self.error = None;
			}
			TierZeroAction::FlushSuccess => {
				self.flushing = false;
				self.changelog.clear();
			}
			TierZeroAction::FlushFailure(e) => {
				self.flushing = false;
				self.error = Some(e.clone());
			}
			TierZeroAction::LoadAssetGroups => {}
			TierZeroAction::AssetGroupsLoaded(groups) => {
				self.asset_group_id = groups
					.iter()
					.find(|g| g.tag == TIER_ZERO_TAG)
					.map(|g| g.id);
			}
			TierZeroAction::AssetGroupsFailed(e) => self.error = Some(e.clone()),
		}
		self
	}

	pub fn pending(&self, id: &str) -> Option<ChangeKind> {
		self.changelog.get(id).map(|c| c.change)
	}
}

#[derive(Debug, Error)]
pub enum FlushError {
	#[error("the tier zero asset group has not been loaded")]
	NoTierZeroGroup,
	#[error(transparent)]
	Api(#[from] ApiError),
}

pub fn selector_changes(changelog: &BTreeMap<String, PendingChange>) -> Vec<SelectorChange> {
	changelog
		.iter()
		.map(|(id, pending)| SelectorChange {
			action: pending.change,
			selector_name: id.clone(),
			sid: id.clone(),
		})
		.collect()
}

async fn submit<A: AssetGroupApi + ?Sized>(
	api: &A,
	asset_group_id: Option<i64>,
	changelog: &BTreeMap<String, PendingChange>,
) -> Result<usize, FlushError> {
	let asset_group_id = asset_group_id.ok_or(FlushError::NoTierZeroGroup)?;
	let changes = selector_changes(changelog);
	api.update_selectors(asset_group_id, &changes).await?;
	Ok(changes.len())
}

/// Submits the changelog. Failures keep the changelog as it was so no
/// edits are lost; nothing is retried.
pub async fn flush_changelog<A: AssetGroupApi + ?Sized>(
	store: &Store,
	api: &A,
	policy: FlushFailurePolicy,
) {
	let (changelog, asset_group_id) =
		store.select(|s| (s.tier_zero.changelog.clone(), s.tier_zero.asset_group_id));

	if changelog.is_empty() {
		debug!("tier zero changelog is empty, nothing to submit");
		store.dispatch(TierZeroAction::FlushSuccess);
		return;
	}

	match submit(api, asset_group_id, &changelog).await {
		Ok(count) => {
			info!("submitted {count} tier zero changes");
			store.dispatch(NotificationAction::push(
				"Tier Zero update successful. Changes will take effect after the next analysis.",
				Severity::Success,
				"tierZeroUpdateSuccess",
			));
			store.dispatch(TierZeroAction::FlushSuccess);
		}
		Err(e) => {
			error!("failed to submit tier zero changes: {e}");
			if policy == FlushFailurePolicy::Notify {
				store.dispatch(NotificationAction::push(
					"Tier Zero update failed. Your pending changes have been kept.",
					Severity::Error,
					"tierZeroUpdateFailure",
				));
			}
			store.dispatch(TierZeroAction::FlushFailure(e.to_string()));
		}
	}
}

pub async fn load_asset_groups<A: AssetGroupApi + ?Sized>(store: &Store, api: &A) {
	match api.list_asset_groups().await {
		Ok(groups) => store.dispatch(TierZeroAction::AssetGroupsLoaded(groups)),
		Err(e) => {
			error!("failed to load asset groups: {e}");
			store.dispatch(TierZeroAction::AssetGroupsFailed(e.to_string()));
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use async_trait::async_trait;
	use futures::executor::block_on;
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::api::ApiResult;
	use crate::store::AppState;

	#[derive(Default)]
	struct FakeAssetGroups {
		fail: bool,
		submitted: RefCell<Vec<(i64, Vec<SelectorChange>)>>,
	}

	#[async_trait(?Send)]
	impl AssetGroupApi for FakeAssetGroups {
		async fn list_asset_groups(&self) -> ApiResult<Vec<AssetGroup>> {
			Ok(vec![
				AssetGroup {
					id: 1,
					name: "Admin Tier Zero".into(),
					tag: TIER_ZERO_TAG.into(),
					system_group: true,
					member_count: 12,
				},
				AssetGroup {
					id: 2,
					name: "Owned".into(),
					tag: "owned".into(),
					system_group: true,
					member_count: 0,
				},
			])
		}

		async fn update_selectors(
			&self,
			asset_group_id: i64,
			changes: &[SelectorChange],
		) -> ApiResult<()> {
			if self.fail {
				return Err(ApiError::Status {
					status: 500,
					body: "boom".into(),
				});
			}
			self.submitted
				.borrow_mut()
				.push((asset_group_id, changes.to_vec()));
			Ok(())
		}
	}

	fn reduce_all(actions: impl IntoIterator<Item = TierZeroAction>) -> TierZeroState {
		actions
			.into_iter()
			.fold(TierZeroState::default(), |state, action| {
				state.reduce(&Action::TierZero(action))
			})
	}

	#[test]
	fn later_change_for_same_principal_overwrites() {
		let state = reduce_all([
			TierZeroAction::add_principal("S-1-5-21-1000", "alice", "User"),
			TierZeroAction::remove_principal("S-1-5-21-1000", "alice", "User"),
		]);
		assert_eq!(state.changelog.len(), 1);
		assert_eq!(state.pending("S-1-5-21-1000"), Some(ChangeKind::Remove));
	}

	#[test]
	fn discard_drops_a_single_entry() {
		let state = reduce_all([
			TierZeroAction::add_principal("a", "alice", "User"),
			TierZeroAction::add_principal("b", "bob", "User"),
			TierZeroAction::DiscardChange("a".into()),
		]);
		assert_eq!(state.changelog.keys().collect::<Vec<_>>(), vec!["b"]);
	}

	#[test]
	fn asset_groups_resolve_the_tier_zero_id() {
		let (store, _intents) = Store::new(AppState::default());
		block_on(load_asset_groups(&store, &FakeAssetGroups::default()));
		assert_eq!(store.select(|s| s.tier_zero.asset_group_id), Some(1));
	}

	fn store_with_changes() -> Store {
		let (store, _) = Store::new(AppState::default());
		store.dispatch(TierZeroAction::AssetGroupsLoaded(vec![AssetGroup {
			id: 1,
			name: "Admin Tier Zero".into(),
			tag: TIER_ZERO_TAG.into(),
			system_group: true,
			member_count: 0,
		}]));
		store.dispatch(TierZeroAction::add_principal("S-1-5-21-1000", "alice", "User"));
		store.dispatch(TierZeroAction::remove_principal("S-1-5-21-1105", "svc_sql", "User"));
		store.dispatch(TierZeroAction::FlushStart);
		store
	}

	#[test]
	fn flush_success_submits_and_clears() {
		let store = store_with_changes();
		let api = FakeAssetGroups::default();

		block_on(flush_changelog(&store, &api, FlushFailurePolicy::Notify));

		let submitted = api.submitted.borrow();
		assert_eq!(submitted.len(), 1);
		assert_eq!(submitted[0].0, 1);
		assert_eq!(
			submitted[0].1,
			vec![
				SelectorChange {
					action: ChangeKind::Add,
					selector_name: "S-1-5-21-1000".into(),
					sid: "S-1-5-21-1000".into(),
				},
				SelectorChange {
					action: ChangeKind::Remove,
					selector_name: "S-1-5-21-1105".into(),
					sid: "S-1-5-21-1105".into(),
				},
			]
		);
		let state = store.state();
		assert!(state.tier_zero.changelog.is_empty());
		assert!(!state.tier_zero.flushing);
		assert_eq!(state.notifications.items[0].severity, Severity::Success);
	}

	#[test]
	fn flush_failure_keeps_changelog_intact() {
		let store = store_with_changes();
		let before = store.select(|s| s.tier_zero.changelog.clone());
		let api = FakeAssetGroups {
			fail: true,
			..Default::default()
		};

		block_on(flush_changelog(&store, &api, FlushFailurePolicy::LogOnly));

		let state = store.state();
		assert_eq!(state.tier_zero.changelog, before);
		assert!(!state.tier_zero.flushing);
		assert!(state.tier_zero.error.is_some());
		assert!(state.notifications.items.is_empty());
	}

	#[test]
	fn notify_policy_surfaces_failures() {
		let store = store_with_changes();
		let api = FakeAssetGroups {
			fail: true,
			..Default::default()
		};

		block_on(flush_changelog(&store, &api, FlushFailurePolicy::Notify));

		let state = store.state();
		assert_eq!(state.tier_zero.changelog.len(), 2);
		assert_eq!(state.notifications.items.len(), 1);
		assert_eq!(state.notifications.items[0].severity, Severity::Error);
	}

	#[test]
	fn flush_without_tier_zero_group_fails_without_calling_backend() {
		let (store, _intents) = Store::new(AppState::default());
		store.dispatch(TierZeroAction::add_principal("a", "alice", "User"));
		let api = FakeAssetGroups::default();

		block_on(flush_changelog(&store, &api, FlushFailurePolicy::LogOnly));

		assert!(api.submitted.borrow().is_empty());
		assert_eq!(store.select(|s| s.tier_zero.changelog.len()), 1);
	}
}
