use leptos::prelude::*;

use crate::context::use_app;
use crate::store::auth::{AuthAction, Secret};

#[component]
pub fn Login() -> impl IntoView {
	let app = use_app();
	let username = RwSignal::new(String::new());
	let password = RwSignal::new(String::new());
	let auth = Memo::new(move |_| app.state.with(|s| (s.auth.pending, s.auth.error.clone())));

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let name = username.get_untracked();
		if name.trim().is_empty() || auth.with_untracked(|(pending, _)| *pending) {
			return;
		}
		app.dispatch(AuthAction::LoginStart {
			username: name,
			secret: Secret(password.get_untracked()),
		});
		password.set(String::new());
	};

	view! {
		<div class="page login">
			<form on:submit=on_submit>
				<h1>"Sign in"</h1>
				<input
					type="text"
					autocomplete="username"
					placeholder="Email Address"
					prop:value=move || username.get()
					on:input=move |ev| username.set(event_target_value(&ev))
				/>
				<input
					type="password"
					autocomplete="current-password"
					placeholder="Password"
					prop:value=move || password.get()
					on:input=move |ev| password.set(event_target_value(&ev))
				/>
				{move || auth.with(|(_, e)| e.clone()).map(|e| view! { <p class="error">{e}</p> })}
				<button type="submit" class="btn btn-primary" disabled=move || auth.with(|(p, _)| *p)>
					"Login"
				</button>
			</form>
		</div>
	}
}
