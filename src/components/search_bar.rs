use leptos::prelude::*;

use crate::api::types::SearchResult;
use crate::context::use_app;
use crate::store::Action;
use crate::store::entity_info::{EntityInfoAction, SelectedNode};
use crate::store::explore::{ExploreAction, GraphRequest};

pub const EXACT: &str = "exact";
pub const FUZZY: &str = "fuzzy";

/// Picking a result opens its graph and selects it. The graph request
/// comes first because a new query clears the selection.
pub fn result_actions(result: &SearchResult) -> [Action; 2] {
	[
		ExploreAction::GraphStart(GraphRequest::Search {
			query: result.objectid.clone(),
			search_type: EXACT.into(),
		})
		.into(),
		EntityInfoAction::Select(SelectedNode {
			id: result.objectid.clone(),
			kind: result.kind.clone(),
			name: result.name.clone(),
			graph_id: None,
		})
		.into(),
	]
}

/// Node search. Typing lists matching nodes; submitting runs a graph
/// search for the typed text with the chosen match type.
#[component]
pub fn SearchBar() -> impl IntoView {
	let app = use_app();
	let term = Memo::new(move |_| app.state.with(|s| s.explore.search_term.clone()));
	let results = Memo::new(move |_| app.state.with(|s| s.explore.search_results.clone()));
	let search_type = RwSignal::new(EXACT.to_string());

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let query = term.get_untracked();
		if query.trim().is_empty() {
			return;
		}
		app.dispatch(ExploreAction::GraphStart(GraphRequest::Search {
			query,
			search_type: search_type.get_untracked(),
		}));
	};

	view! {
		<form class="search-bar" on:submit=on_submit>
			<input
				type="search"
				placeholder="Search nodes"
				prop:value=move || term.get()
				on:input=move |ev| app.dispatch(ExploreAction::Search(event_target_value(&ev)))
			/>
			<select
				prop:value=move || search_type.get()
				on:change=move |ev| search_type.set(event_target_value(&ev))
			>
				<option value=EXACT>"Exact"</option>
				<option value=FUZZY>"Fuzzy"</option>
			</select>
			<button type="submit">"Search"</button>
		</form>
		<ul class="search-results">
			{move || {
				results
					.get()
					.into_iter()
					.map(|result| {
						let actions = result_actions(&result);
						view! {
							<li on:click=move |_| {
								for action in actions.clone() {
									app.dispatch(action);
								}
							}>
								<span class="kind">{result.kind}</span>
								<span class="name">{result.name}</span>
							</li>
						}
					})
					.collect_view()
			}}
		</ul>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::store::{AppState, Store};

	#[test]
	fn picking_a_result_keeps_it_selected() {
		let (store, _) = Store::new(AppState::default());
		let result = SearchResult {
			objectid: "S-1-5-21-1000".into(),
			name: "ALICE@CORP.LOCAL".into(),
			kind: "User".into(),
			distinguishedname: None,
			system_tags: None,
		};
		for action in result_actions(&result) {
			store.dispatch(action);
		}
		let state = store.state();
		assert!(state.explore.loading);
		assert!(state.entity_info.is_selected("S-1-5-21-1000"));
	}
}
