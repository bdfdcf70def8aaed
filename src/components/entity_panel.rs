use leptos::prelude::*;

use crate::api::EntityInfo;
use crate::api::types::{ChangeKind, TIER_ZERO_TAG};
use crate::context::use_app;
use crate::graph::PropertyValue;
use crate::store::entity_info::{EntityInfoAction, OBJECT_INFORMATION, SelectedNode, section_graph_url};
use crate::store::explore::{ExploreAction, GraphRequest};
use crate::store::tier_zero::TierZeroAction;

/// Relationship counts of an entity, in display order. Only numeric
/// entries are counts; anything else in the payload is ignored.
fn count_sections(info: &EntityInfo) -> Vec<(String, i64)> {
	info.counts
		.iter()
		.filter_map(|(key, value)| match value {
			PropertyValue::Int(n) => Some((key.clone(), *n)),
			PropertyValue::Float(f) if f.fract() == 0.0 => Some((key.clone(), *f as i64)),
			_ => None,
		})
		.collect()
}

/// `adminRights` → `Admin Rights`.
fn section_title(key: &str) -> String {
	let mut title = String::with_capacity(key.len() + 4);
	for (i, c) in key.chars().enumerate() {
		if i == 0 {
			title.push(c.to_ascii_uppercase());
		} else if c.is_ascii_uppercase() {
			title.push(' ');
			title.push(c);
		} else {
			title.push(c);
		}
	}
	title
}

fn is_tier_zero(info: &EntityInfo) -> bool {
	info.props
		.get("system_tags")
		.and_then(PropertyValue::as_str)
		.is_some_and(|tags| tags.split_whitespace().any(|t| t == TIER_ZERO_TAG))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TierZeroControl {
	Add,
	Remove,
	Pending(ChangeKind),
}

fn tier_zero_control(member: bool, pending: Option<ChangeKind>) -> TierZeroControl {
	match pending {
		Some(change) => TierZeroControl::Pending(change),
		None if member => TierZeroControl::Remove,
		None => TierZeroControl::Add,
	}
}

#[component]
fn TierZeroButton(node: SelectedNode, member: bool) -> impl IntoView {
	let app = use_app();
	let id = node.id.clone();
	let control = Memo::new(move |_| {
		app.state
			.with(|s| tier_zero_control(member, s.tier_zero.pending(&id)))
	});

	move || {
		let node = node.clone();
		match control.get() {
			TierZeroControl::Add => view! {
				<button class="btn" on:click=move |_| {
					app.dispatch(TierZeroAction::add_principal(&node.id, &node.name, &node.kind))
				}>"Add to Tier Zero"</button>
			}
			.into_any(),
			TierZeroControl::Remove => view! {
				<button class="btn" on:click=move |_| {
					app.dispatch(TierZeroAction::remove_principal(&node.id, &node.name, &node.kind))
				}>"Remove from Tier Zero"</button>
			}
			.into_any(),
			TierZeroControl::Pending(change) => {
				let label = match change {
					ChangeKind::Add => "Pending addition to Tier Zero",
					ChangeKind::Remove => "Pending removal from Tier Zero",
				};
				view! {
					<span class="pending">{label}</span>
					<button class="btn btn-link" on:click=move |_| {
						app.dispatch(TierZeroAction::DiscardChange(node.id.clone()))
					}>"Undo"</button>
				}
				.into_any()
			}
		}
	}
}

/// Properties and relationship counts of the selected node. Expanding a
/// count section loads the matching graph into the canvas.
#[component]
pub fn EntityPanel() -> impl IntoView {
	let app = use_app();
	let entity = Memo::new(move |_| app.state.with(|s| s.entity_info.clone()));

	let toggle = move |section: String, url: Option<String>| {
		let opening = !entity.with_untracked(|e| e.is_expanded(&section));
		app.dispatch(EntityInfoAction::ToggleSection(section));
		if let (true, Some(url)) = (opening, url) {
			app.dispatch(ExploreAction::GraphStart(GraphRequest::NodeInfo { url }));
		}
	};

	move || {
		let state = entity.get();
		let node = state.selected.clone()?;
		let body = if state.loading {
			view! { <p class="muted">"Loading..."</p> }.into_any()
		} else if let Some(error) = state.error.clone() {
			view! { <p class="error">{error}</p> }.into_any()
		} else if let Some(info) = state.info.clone() {
			let member = is_tier_zero(&info);
			let props_open = state.is_expanded(OBJECT_INFORMATION);
			let properties = info
				.props
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
			let sections = count_sections(&info)
				.into_iter()
				.map(|(key, count)| {
					let open = state.is_expanded(&key);
					let url = (count > 0).then(|| section_graph_url(&node, &key));
					let title = section_title(&key);
					view! {
						<li class="section" class:open=open>
							<button
								class="section-header"
								disabled={count == 0}
								on:click=move |_| toggle(key.clone(), url.clone())
							>
								<span>{title}</span>
								<span class="count">{count}</span>
							</button>
						</li>
					}
				})
				.collect_view();
			view! {
				<div class="tier-zero-control">
					<TierZeroButton node=node.clone() member=member />
				</div>
				<ul class="sections">
					<li class="section" class:open=props_open>
						<button
							class="section-header"
							on:click=move |_| toggle(OBJECT_INFORMATION.to_string(), None)
						>
							{OBJECT_INFORMATION}
						</button>
						{props_open.then(|| view! { <table class="properties">{properties}</table> })}
					</li>
					{sections}
				</ul>
			}
			.into_any()
		} else {
			().into_any()
		};

		Some(view! {
			<aside class="info-panel entity-panel">
				<header>
					<span class="kind">{node.kind.clone()}</span>
					<h2>{node.name.clone()}</h2>
					<button class="close" on:click=move |_| app.dispatch(EntityInfoAction::Clear)>
						"×"
					</button>
				</header>
				{body}
			</aside>
		})
	}
}
