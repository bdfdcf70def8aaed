//! Leptos client-side attack graph explorer: store wiring and routes.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod api;
mod components;
pub mod config;
mod context;
pub mod graph;
mod pages;
pub mod store;

use crate::api::ApiClient;
use crate::components::snackbar::Snackbar;
use crate::config::AppConfig;
use crate::context::{AppContext, use_app};
use crate::store::auth::AuthAction;
use crate::store::{AppState, Store, effects};

// Top-Level pages
use crate::pages::explore::Explore;
use crate::pages::features::Features;
use crate::pages::file_ingest::FileIngest;
use crate::pages::login::Login;
use crate::pages::not_found::NotFound;
use crate::pages::tier_zero::TierZero;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

#[component]
fn NavBar() -> impl IntoView {
	let app = use_app();
	let username = move || app.state.with(|s| s.auth.username.clone().unwrap_or_default());

	view! {
		<nav class="navbar">
			<A href="/">"Explore"</A>
			<A href="/tier-zero">"Tier Zero"</A>
			<A href="/file-ingest">"File Ingest"</A>
			<A href="/early-access">"Early Access"</A>
			<span class="spacer"></span>
			<span class="user">{username}</span>
			<button class="btn btn-link" on:click=move |_| app.dispatch(AuthAction::Logout)>
				"Log out"
			</button>
		</nav>
	}
}

/// Creates the store, starts the effects runner and renders the routes
/// behind the login gate.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let config = AppConfig::load();
	let (store, intents) = Store::new(AppState::default());
	let api = Rc::new(ApiClient::new(&config.api_base_url));
	spawn_local(effects::run(store.clone(), api, config.clone(), intents));

	let app = AppContext::new(store, config);
	provide_context(app);
	let signed_in = Memo::new(move |_| app.state.with(|s| s.auth.is_authenticated()));

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Attack Graph Explorer" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Show when=move || signed_in.get() fallback=|| view! { <Login /> }>
				<NavBar />
				<main>
					<Routes fallback=|| view! { <NotFound /> }>
						<Route path=path!("/") view=Explore />
						<Route path=path!("/tier-zero") view=TierZero />
						<Route path=path!("/file-ingest") view=FileIngest />
						<Route path=path!("/early-access") view=Features />
					</Routes>
				</main>
			</Show>
			<Snackbar />
		</Router>
	}
}
