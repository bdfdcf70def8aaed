//! Feature flags, fetched once and cached until invalidated.

use std::collections::BTreeMap;

use log::{debug, error};

use super::notifications::{NotificationAction, Severity};
use super::{Action, Store};
use crate::api::FeatureFlagApi;
use crate::api::types::FeatureFlag;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureFlagsState {
	pub flags: BTreeMap<String, FeatureFlag>,
	pub loaded: bool,
	pub stale: bool,
	pub loading: bool,
	pub error: Option<String>,
}

impl FeatureFlagsState {
	pub fn needs_fetch(&self) -> bool {
		!self.loading && (!self.loaded || self.stale)
	}

}

#[derive(Clone, Debug, PartialEq)]
pub enum FeatureAction {
	Fetch,
	/// A request for the flags is in flight.
	FetchStarted,
	Loaded(Vec<FeatureFlag>),
	Failed(String),
	Toggle(i64),
	Invalidate,
}

impl FeatureFlagsState {
	pub fn reduce(mut self, action: &Action) -> Self {
		let Action::Features(action) = action else {
			return self;
		};
		match action {
			FeatureAction::Fetch | FeatureAction::Toggle(_) => {}
			FeatureAction::FetchStarted => self.loading = true,
			FeatureAction::Loaded(flags) => {
				self.flags = flags.iter().map(|f| (f.key.clone(), f.clone())).collect();
				self.loaded = true;
				self.stale = false;
				self.loading = false;
				self.error = None;
			}
			FeatureAction::Failed(e) => {
				self.loading = false;
				self.error = Some(e.clone());
			}
			FeatureAction::Invalidate => self.stale = true,
		}
		self
	}
}

pub async fn fetch_flags<A: FeatureFlagApi + ?Sized>(store: &Store, api: &A) {
	if !store.select(|s| s.features.needs_fetch()) {
		debug!("feature flags are cached");
		return;
	}
	// marked before awaiting so an overlapping fetch sees it
	store.dispatch(FeatureAction::FetchStarted);
	match api.feature_flags().await {
		Ok(flags) => store.dispatch(FeatureAction::Loaded(flags)),
		Err(e) => {
			error!("failed to load feature flags: {e}");
			store.dispatch(FeatureAction::Failed(e.to_string()));
		}
	}
}

pub async fn toggle_flag<A: FeatureFlagApi + ?Sized>(store: &Store, api: &A, flag_id: i64) {
	match api.toggle_feature_flag(flag_id).await {
		Ok(()) => {
			store.dispatch(FeatureAction::Invalidate);
			fetch_flags(store, api).await;
		}
		Err(e) => {
			error!("failed to toggle feature flag {flag_id}: {e}");
			store.dispatch(NotificationAction::push(
				"Unable to update the feature. Please try again.",
				Severity::Error,
				"featureToggleFailure",
			));
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::{Cell, RefCell};
	use std::task::Poll;

	use async_trait::async_trait;
	use futures::executor::block_on;
	use futures::future::{join, poll_fn};

	use super::*;
	use crate::api::ApiResult;
	use crate::store::AppState;

	struct FakeFlags {
		fetches: Cell<usize>,
		/// Makes the next list request wait for one poll.
		slow: Cell<bool>,
		flags: RefCell<Vec<FeatureFlag>>,
	}

	impl FakeFlags {
		fn new() -> Self {
			Self {
				fetches: Cell::new(0),
				slow: Cell::new(false),
				flags: RefCell::new(vec![FeatureFlag {
					id: 1,
					key: "dark_mode".into(),
					name: "Dark Mode".into(),
					description: "Darker theme".into(),
					enabled: false,
					user_updatable: true,
				}]),
			}
		}
	}

	#[async_trait(?Send)]
	impl FeatureFlagApi for FakeFlags {
		async fn feature_flags(&self) -> ApiResult<Vec<FeatureFlag>> {
			self.fetches.set(self.fetches.get() + 1);
			if self.slow.replace(false) {
				let mut waited = false;
				poll_fn(|cx| {
					if waited {
						Poll::Ready(())
					} else {
						waited = true;
						cx.waker().wake_by_ref();
						Poll::Pending
					}
				})
				.await;
			}
			Ok(self.flags.borrow().clone())
		}

		async fn toggle_feature_flag(&self, flag_id: i64) -> ApiResult<()> {
			for flag in self.flags.borrow_mut().iter_mut() {
				if flag.id == flag_id {
					flag.enabled = !flag.enabled;
				}
			}
			Ok(())
		}
	}

	#[test]
	fn flags_are_fetched_once() {
		let (store, _) = Store::new(AppState::default());
		let api = FakeFlags::new();
		block_on(fetch_flags(&store, &api));
		block_on(fetch_flags(&store, &api));
		assert_eq!(api.fetches.get(), 1);
		assert!(!store.select(|s| s.features.flags["dark_mode"].enabled));
	}

	#[test]
	fn toggling_invalidates_and_refetches() {
		let (store, _) = Store::new(AppState::default());
		let api = FakeFlags::new();
		block_on(fetch_flags(&store, &api));
		block_on(toggle_flag(&store, &api, 1));
		assert_eq!(api.fetches.get(), 2);
		assert!(store.select(|s| s.features.flags["dark_mode"].enabled));
	}

	#[test]
	fn overlapping_fetches_share_one_request() {
		let (store, _) = Store::new(AppState::default());
		let api = FakeFlags::new();
		api.slow.set(true);

		block_on(join(fetch_flags(&store, &api), fetch_flags(&store, &api)));

		assert_eq!(api.fetches.get(), 1);
		let features = store.select(|s| s.features.clone());
		assert!(features.loaded);
		assert!(!features.loading);
	}
}
