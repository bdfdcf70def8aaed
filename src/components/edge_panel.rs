use leptos::prelude::*;

use crate::context::use_app;
use crate::store::edge_info::EdgeInfoAction;

const PROPERTIES: &str = "Relationship Information";

#[component]
pub fn EdgePanel() -> impl IntoView {
	let app = use_app();
	let edge_info = Memo::new(move |_| app.state.with(|s| s.edge_info.clone()));

	move || {
		let state = edge_info.get();
		let edge = state.selected?;
		let open = state.expanded.contains(PROPERTIES);
		let source = edge.source_name.unwrap_or(edge.source);
		let target = edge.target_name.unwrap_or(edge.target);
		let rows = edge
			.data
			.iter()
			.map(|(key, value)| {
				view! {
					<tr>
						<th>{key.clone()}</th>
						<td>{value.display()}</td>
					</tr>
				}
			})
			.collect_view();

		Some(view! {
			<aside class="info-panel edge-panel">
				<header>
					<span class="kind">"Relationship"</span>
					<h2>{edge.name}</h2>
					<button class="close" on:click=move |_| app.dispatch(EdgeInfoAction::Clear)>
						"×"
					</button>
				</header>
				<p class="endpoints">
					<span>{source}</span>
					" → "
					<span>{target}</span>
				</p>
				<ul class="sections">
					<li class="section" class:open=open>
						<button
							class="section-header"
							on:click=move |_| app.dispatch(EdgeInfoAction::ToggleSection(PROPERTIES.into()))
						>
							{PROPERTIES}
						</button>
						{open.then(|| view! { <table class="properties">{rows}</table> })}
					</li>
				</ul>
			</aside>
		})
	}
}
