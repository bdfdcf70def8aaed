use leptos::prelude::*;

use crate::components::edge_panel::EdgePanel;
use crate::components::entity_panel::EntityPanel;
use crate::components::graph_canvas::{GraphCanvas, Hit};
use crate::components::search_bar::SearchBar;
use crate::context::use_app;
use crate::graph::FlatGraph;
use crate::store::edge_info::{EdgeInfoAction, SelectedEdge};
use crate::store::entity_info::{EntityInfoAction, SelectedNode};
use crate::store::explore::{ExploreAction, GraphRequest, LayoutKind};
use crate::store::{Action, AppState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
	Search,
	Pathfinding,
	Cypher,
}

/// Turns a canvas click into store actions. Clicking the background clears
/// both panels.
fn selection_actions(hit: Option<Hit>, graph: Option<&FlatGraph>) -> Vec<Action> {
	match hit {
		Some(Hit::Node(graph_id)) => graph
			.and_then(|g| g.node(&graph_id))
			.map(|node| {
				EntityInfoAction::Select(SelectedNode {
					id: node.data.object_id.clone(),
					kind: node.data.kind.clone(),
					name: node.label.text.clone(),
					graph_id: Some(graph_id.clone()),
				})
				.into()
			})
			.into_iter()
			.collect(),
		Some(Hit::Edge(key)) => SelectedEdge::from_key(&key, graph)
			.map(|edge| EdgeInfoAction::Select(edge).into())
			.into_iter()
			.collect(),
		None => vec![EntityInfoAction::Clear.into(), EdgeInfoAction::Clear.into()],
	}
}

/// What the canvas should show as selected.
fn selected_hit(state: &AppState) -> Option<Hit> {
	if let Some(graph_id) = state
		.entity_info
		.selected
		.as_ref()
		.and_then(|n| n.graph_id.clone())
	{
		return Some(Hit::Node(graph_id));
	}
	state
		.edge_info
		.selected
		.as_ref()
		.map(|e| Hit::Edge(e.id.clone()))
}

#[component]
fn PathfindingForm() -> impl IntoView {
	let app = use_app();
	let start = RwSignal::new(String::new());
	let end = RwSignal::new(String::new());

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let (start, end) = (start.get_untracked(), end.get_untracked());
		if start.trim().is_empty() || end.trim().is_empty() {
			return;
		}
		app.dispatch(ExploreAction::GraphStart(GraphRequest::Pathfinding { start, end }));
	};

	view! {
		<form class="pathfinding" on:submit=on_submit>
			<input
				placeholder="Start node object id"
				prop:value=move || start.get()
				on:input=move |ev| start.set(event_target_value(&ev))
			/>
			<input
				placeholder="Destination node object id"
				prop:value=move || end.get()
				on:input=move |ev| end.set(event_target_value(&ev))
			/>
			<button type="submit">"Find paths"</button>
		</form>
	}
}

#[component]
fn CypherForm() -> impl IntoView {
	let app = use_app();
	let query = RwSignal::new(String::new());

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let query = query.get_untracked();
		if !query.trim().is_empty() {
			app.dispatch(ExploreAction::GraphStart(GraphRequest::Cypher { query }));
		}
	};

	view! {
		<form class="cypher" on:submit=on_submit>
			<textarea
				rows="4"
				placeholder="MATCH (n:User) RETURN n LIMIT 25"
				prop:value=move || query.get()
				on:input=move |ev| query.set(event_target_value(&ev))
			/>
			<button type="submit">"Run"</button>
		</form>
	}
}

#[component]
pub fn Explore() -> impl IntoView {
	let app = use_app();
	let tab = RwSignal::new(Tab::Search);
	let graph = Memo::new(move |_| app.state.with(|s| s.explore.graph.clone()));
	let layout = Memo::new(move |_| app.state.with(|s| s.explore.layout));
	let selected = Memo::new(move |_| app.state.with(selected_hit));
	let loading = Memo::new(move |_| app.state.with(|s| s.explore.loading));
	let error = Memo::new(move |_| app.state.with(|s| s.explore.error.clone()));
	let empty = Memo::new(move |_| graph.with(|g| g.as_ref().is_some_and(|g| g.is_empty())));

	let on_select = Callback::new(move |hit: Option<Hit>| {
		let actions = app
			.state
			.with_untracked(|s| selection_actions(hit, s.explore.graph.as_deref()));
		for action in actions {
			app.dispatch(action);
		}
	});

	let tab_button = move |which: Tab, label: &'static str| {
		view! {
			<button class="tab" class:active=move || tab.get() == which on:click=move |_| tab.set(which)>
				{label}
			</button>
		}
	};

	view! {
		<div class="explore">
			<section class="explore-controls">
				<nav class="tabs">
					{tab_button(Tab::Search, "Search")}
					{tab_button(Tab::Pathfinding, "Pathfinding")}
					{tab_button(Tab::Cypher, "Cypher")}
				</nav>
				{move || match tab.get() {
					Tab::Search => view! { <SearchBar /> }.into_any(),
					Tab::Pathfinding => view! { <PathfindingForm /> }.into_any(),
					Tab::Cypher => view! { <CypherForm /> }.into_any(),
				}}
			</section>

			<div class="graph-area">
				<GraphCanvas
					graph=graph
					layout=layout
					selected=selected
					on_select=on_select
					config=app.config()
				/>
				<div class="graph-toolbar">
					<button
						class:active=move || layout.get() == LayoutKind::Standard
						on:click=move |_| app.dispatch(ExploreAction::SetLayout(LayoutKind::Standard))
					>
						"Standard"
					</button>
					<button
						class:active=move || layout.get() == LayoutKind::Sequential
						on:click=move |_| app.dispatch(ExploreAction::SetLayout(LayoutKind::Sequential))
					>
						"Sequential"
					</button>
					<button on:click=move |_| app.dispatch(ExploreAction::ClearGraph)>"Clear"</button>
				</div>
				<Show when=move || loading.get()>
					<div class="graph-status">"Loading..."</div>
				</Show>
				<Show when=move || empty.get() && !loading.get()>
					<div class="graph-status">"No results match your criteria"</div>
				</Show>
				{move || error.get().map(|e| view! { <div class="graph-status error">{e}</div> })}
			</div>

			<EntityPanel />
			<EdgePanel />
		</div>
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::graph::{GraphPayload, normalize};

	fn graph() -> FlatGraph {
		normalize(Some(
			GraphPayload::from_json(json!({
				"nodes": {
					"1": { "label": "ALICE@CORP.LOCAL", "kind": "User", "objectId": "S-1-5-21-1000" },
					"2": { "label": "CORP.LOCAL", "kind": "Domain", "objectId": "S-1-5-21" }
				},
				"edges": [{ "source": "1", "target": "2", "label": "DCSync", "kind": "DCSync" }]
			}))
			.unwrap(),
		))
		.unwrap()
	}

	#[test]
	fn node_clicks_select_by_object_id() {
		let graph = graph();
		let actions = selection_actions(Some(Hit::Node("1".into())), Some(&graph));
		assert_eq!(
			actions,
			vec![Action::EntityInfo(EntityInfoAction::Select(SelectedNode {
				id: "S-1-5-21-1000".into(),
				kind: "User".into(),
				name: "ALICE@CORP.LOCAL".into(),
				graph_id: Some("1".into()),
			}))]
		);
	}

	#[test]
	fn edge_clicks_select_the_edge() {
		let graph = graph();
		let actions = selection_actions(Some(Hit::Edge("1_DCSync_2".into())), Some(&graph));
		let [Action::EdgeInfo(EdgeInfoAction::Select(edge))] = actions.as_slice() else {
			panic!("expected an edge selection, got {actions:?}");
		};
		assert_eq!(edge.name, "DCSync");
		assert_eq!(edge.target_name.as_deref(), Some("CORP.LOCAL"));
	}

	#[test]
	fn unknown_nodes_and_background_clicks() {
		let graph = graph();
		assert!(selection_actions(Some(Hit::Node("9".into())), Some(&graph)).is_empty());
		assert_eq!(selection_actions(None, None).len(), 2);
	}

	#[test]
	fn canvas_selection_follows_the_panels() {
		let (store, _) = crate::store::Store::new(AppState::default());
		for action in selection_actions(Some(Hit::Node("1".into())), Some(&graph())) {
			store.dispatch(action);
		}
		assert_eq!(selected_hit(&store.state()), Some(Hit::Node("1".into())));

		store.dispatch(EdgeInfoAction::Select(
			SelectedEdge::from_key("1_DCSync_2", None).unwrap(),
		));
		assert_eq!(
			selected_hit(&store.state()),
			Some(Hit::Edge("1_DCSync_2".into()))
		);
	}
}
