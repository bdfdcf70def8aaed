//! Global application state.
//!
//! Every slice is a pure reducer over the full [`Action`] set so a slice can
//! react to another slice's actions (a new graph clears the selection
//! panels, for instance). [`Store::dispatch`] applies the reducers, notifies
//! subscribers, then forwards the action to the effects runner which
//! performs the API calls.

pub mod auth;
pub mod edge_info;
pub mod effects;
pub mod entity_info;
pub mod explore;
pub mod features;
pub mod file_ingest;
pub mod notifications;
pub mod tier_zero;

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use log::debug;

use auth::{AuthAction, AuthState};
use edge_info::{EdgeInfoAction, EdgeInfoState};
use entity_info::{EntityInfoAction, EntityInfoState};
use explore::{ExploreAction, ExploreState};
use features::{FeatureAction, FeatureFlagsState};
use file_ingest::{FileIngestAction, FileIngestState};
use notifications::{NotificationAction, NotificationsState};
use tier_zero::{TierZeroAction, TierZeroState};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
	pub auth: AuthState,
	pub explore: ExploreState,
	pub tier_zero: TierZeroState,
	pub edge_info: EdgeInfoState,
	pub entity_info: EntityInfoState,
	pub notifications: NotificationsState,
	pub features: FeatureFlagsState,
	pub file_ingest: FileIngestState,
}

impl AppState {
	pub fn reduce(self, action: &Action) -> Self {
		Self {
			auth: self.auth.reduce(action),
			explore: self.explore.reduce(action),
			tier_zero: self.tier_zero.reduce(action),
			edge_info: self.edge_info.reduce(action),
			entity_info: self.entity_info.reduce(action),
			notifications: self.notifications.reduce(action),
			features: self.features.reduce(action),
			file_ingest: self.file_ingest.reduce(action),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
	Auth(AuthAction),
	Explore(ExploreAction),
	TierZero(TierZeroAction),
	EdgeInfo(EdgeInfoAction),
	EntityInfo(EntityInfoAction),
	Notifications(NotificationAction),
	Features(FeatureAction),
	FileIngest(FileIngestAction),
}

macro_rules! impl_from_action {
	($($variant:ident($ty:ty)),* $(,)?) => {
		$(impl From<$ty> for Action {
			fn from(action: $ty) -> Self {
				Action::$variant(action)
			}
		})*
	};
}

impl_from_action!(
	Auth(AuthAction),
	Explore(ExploreAction),
	TierZero(TierZeroAction),
	EdgeInfo(EdgeInfoAction),
	EntityInfo(EntityInfoAction),
	Notifications(NotificationAction),
	Features(FeatureAction),
	FileIngest(FileIngestAction),
);

type Listener = Rc<dyn Fn(&AppState)>;

struct Inner {
	state: RefCell<AppState>,
	listeners: RefCell<Vec<Listener>>,
	intents: UnboundedSender<Action>,
}

/// Single-threaded handle to the global state. Clones share the state.
#[derive(Clone)]
pub struct Store {
	inner: Rc<Inner>,
}

impl Store {
	/// Returns the store and the receiving end of its intents channel, to be
	/// handed to [`effects::run`].
	pub fn new(state: AppState) -> (Self, UnboundedReceiver<Action>) {
		let (intents, receiver) = unbounded();
		let store = Self {
			inner: Rc::new(Inner {
				state: RefCell::new(state),
				listeners: RefCell::new(Vec::new()),
				intents,
			}),
		};
		(store, receiver)
	}

	pub fn dispatch(&self, action: impl Into<Action>) {
		let action = action.into();
		debug!("dispatch {action:?}");

		let snapshot = {
			let mut state = self.inner.state.borrow_mut();
			let next = std::mem::take(&mut *state).reduce(&action);
			*state = next;
			state.clone()
		};

		let listeners = self.inner.listeners.borrow().clone();
		for listener in listeners {
			listener(&snapshot);
		}

		if self.inner.intents.unbounded_send(action).is_err() {
			debug!("effects runner is gone, intent dropped");
		}
	}

	pub fn select<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
		f(&self.inner.state.borrow())
	}

	pub fn state(&self) -> AppState {
		self.inner.state.borrow().clone()
	}

	pub fn subscribe(&self, listener: impl Fn(&AppState) + 'static) {
		self.inner.listeners.borrow_mut().push(Rc::new(listener));
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use futures::StreamExt;
	use futures::executor::block_on;

	use super::*;

	#[test]
	fn dispatch_reduces_notifies_and_forwards() {
		let (store, mut intents) = Store::new(AppState::default());
		let seen = Rc::new(Cell::new(0));
		let counter = seen.clone();
		store.subscribe(move |state| counter.set(state.tier_zero.changelog.len()));

		store.dispatch(TierZeroAction::add_principal("S-1-5-21-1000", "alice", "User"));

		assert_eq!(seen.get(), 1);
		assert_eq!(
			block_on(intents.next()),
			Some(Action::TierZero(TierZeroAction::add_principal(
				"S-1-5-21-1000",
				"alice",
				"User"
			)))
		);
	}

	#[test]
	fn listeners_may_dispatch() {
		let (store, _intents) = Store::new(AppState::default());
		let inner = store.clone();
		store.subscribe(move |state| {
			if state.tier_zero.changelog.contains_key("a") {
				inner.dispatch(TierZeroAction::DiscardChange("a".into()));
			}
		});
		store.dispatch(TierZeroAction::add_principal("a", "alice", "User"));
		assert!(store.select(|s| s.tier_zero.changelog.is_empty()));
	}

	#[test]
	fn dispatch_without_runner_still_reduces() {
		let (store, intents) = Store::new(AppState::default());
		drop(intents);
		store.dispatch(TierZeroAction::add_principal("a", "alice", "User"));
		assert_eq!(store.select(|s| s.tier_zero.changelog.len()), 1);
	}
}
