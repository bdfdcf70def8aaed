use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::api::types::ChangeKind;
use crate::context::use_app;
use crate::store::explore::{ExploreAction, GraphRequest};
use crate::store::tier_zero::TierZeroAction;

/// Pending tier zero membership edits with save and discard controls.
#[component]
pub fn TierZero() -> impl IntoView {
	let app = use_app();
	let navigate = use_navigate();
	let tier_zero = Memo::new(move |_| app.state.with(|s| s.tier_zero.clone()));

	Effect::new(move |_| app.dispatch(TierZeroAction::LoadAssetGroups));

	let view_graph = move |_: leptos::ev::MouseEvent| {
		if let Some(asset_group_id) = tier_zero.with_untracked(|t| t.asset_group_id) {
			app.dispatch(ExploreAction::GraphStart(GraphRequest::AssetGroup { asset_group_id }));
			navigate("/", Default::default());
		}
	};

	let rows = move || {
		tier_zero.with(|t| {
			t.changelog
				.iter()
				.map(|(id, pending)| {
					let (id, object_id) = (id.clone(), id.clone());
					let change = match pending.change {
						ChangeKind::Add => "Add",
						ChangeKind::Remove => "Remove",
					};
					view! {
						<tr>
							<td>{pending.name.clone()}</td>
							<td>{pending.kind.clone()}</td>
							<td class="object-id">{object_id}</td>
							<td>{change}</td>
							<td>
								<button
									class="btn btn-link"
									on:click=move |_| app.dispatch(TierZeroAction::DiscardChange(id.clone()))
								>
									"Discard"
								</button>
							</td>
						</tr>
					}
				})
				.collect_view()
		})
	};

	let nothing_pending = move || tier_zero.with(|t| t.changelog.is_empty());

	view! {
		<div class="page tier-zero">
			<header>
				<h1>"Tier Zero"</h1>
				<button
					class="btn"
					disabled=move || tier_zero.with(|t| t.asset_group_id.is_none())
					on:click=view_graph
				>
					"View in Explore"
				</button>
			</header>

			{move || tier_zero.with(|t| t.error.clone()).map(|e| view! { <p class="error">{e}</p> })}

			<Show
				when=move || !nothing_pending()
				fallback=|| view! { <p class="muted">"No pending changes."</p> }
			>
				<table class="changelog">
					<thead>
						<tr>
							<th>"Name"</th>
							<th>"Type"</th>
							<th>"Object ID"</th>
							<th>"Change"</th>
							<th></th>
						</tr>
					</thead>
					<tbody>{rows}</tbody>
				</table>
			</Show>

			<footer>
				<button
					class="btn"
					disabled=move || nothing_pending() || tier_zero.with(|t| t.flushing)
					on:click=move |_| app.dispatch(TierZeroAction::DiscardAll)
				>
					"Discard all"
				</button>
				<button
					class="btn btn-primary"
					disabled=move || nothing_pending() || tier_zero.with(|t| t.flushing)
					on:click=move |_| app.dispatch(TierZeroAction::FlushStart)
				>
					{move || if tier_zero.with(|t| t.flushing) { "Saving..." } else { "Save changes" }}
				</button>
			</footer>
		</div>
	}
}
