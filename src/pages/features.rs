use leptos::prelude::*;

use crate::context::use_app;
use crate::store::features::FeatureAction;

/// Early access features. Flags the user may not change are shown
/// read-only.
#[component]
pub fn Features() -> impl IntoView {
	let app = use_app();
	let features = Memo::new(move |_| app.state.with(|s| s.features.clone()));

	Effect::new(move |_| app.dispatch(FeatureAction::Fetch));

	view! {
		<div class="page features">
			<h1>"Early Access Features"</h1>
			{move || features.with(|f| f.error.clone()).map(|e| view! { <p class="error">{e}</p> })}
			<ul class="feature-flags">
				{move || {
					features
						.get()
						.flags
						.into_values()
						.map(|flag| {
							let id = flag.id;
							view! {
								<li class="feature-flag">
									<div>
										<h3>{flag.name}</h3>
										<p>{flag.description}</p>
									</div>
									<button
										class="btn"
										class:active={flag.enabled}
										disabled={!flag.user_updatable}
										on:click=move |_| app.dispatch(FeatureAction::Toggle(id))
									>
										{if flag.enabled { "Disable" } else { "Enable" }}
									</button>
								</li>
							}
						})
						.collect_view()
				}}
			</ul>
		</div>
	}
}
