use std::time::Duration;

use leptos::prelude::*;

use crate::context::use_app;
use crate::store::notifications::NotificationAction;

const AUTO_HIDE: Duration = Duration::from_secs(6);

/// Stack of worker notifications. Each one hides itself after a while or
/// on click.
#[component]
pub fn Snackbar() -> impl IntoView {
	let app = use_app();
	let items = Memo::new(move |_| app.state.with(|s| s.notifications.items.clone()));

	view! {
		<div class="snackbars">
			<For
				each=move || items.get()
				key=|n| n.id
				children=move |n| {
					let id = n.id;
					set_timeout(move || app.dispatch(NotificationAction::Dismiss(id)), AUTO_HIDE);
					view! {
						<div
							class=n.severity.class()
							on:click=move |_| app.dispatch(NotificationAction::Dismiss(id))
						>
							{n.message}
						</div>
					}
				}
			/>
		</div>
	}
}
