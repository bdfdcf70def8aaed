//! App-wide handles shared with components through Leptos context.

use leptos::prelude::*;

use crate::config::AppConfig;
use crate::store::{Action, AppState, Store};

/// Reactive view of the store plus a way to dispatch into it.
///
/// `state` mirrors the store after every dispatch, so components read it
/// like any other signal and never borrow the store directly.
#[derive(Clone, Copy)]
pub struct AppContext {
	pub state: RwSignal<AppState>,
	store: StoredValue<Store, LocalStorage>,
	config: StoredValue<AppConfig>,
}

impl AppContext {
	/// Bridges `store` into a signal. Must run inside the app's owner.
	pub fn new(store: Store, config: AppConfig) -> Self {
		let state = RwSignal::new(store.state());
		store.subscribe(move |next| state.set(next.clone()));
		Self {
			state,
			store: StoredValue::new_local(store),
			config: StoredValue::new(config),
		}
	}

	pub fn dispatch(&self, action: impl Into<Action>) {
		let action = action.into();
		self.store.with_value(|store| store.dispatch(action));
	}

	pub fn config(&self) -> AppConfig {
		self.config.get_value()
	}
}

pub fn use_app() -> AppContext {
	expect_context::<AppContext>()
}
