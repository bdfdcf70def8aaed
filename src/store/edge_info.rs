//! Selected edge and the expanded sections of its info panel.

use std::collections::BTreeSet;

use super::Action;
use super::entity_info::EntityInfoAction;
use super::explore::ExploreAction;
use crate::graph::{EdgeKey, FlatGraph, PropertyMap, edge_key};

#[derive(Clone, Debug, PartialEq)]
pub struct SelectedEdge {
	/// `source_label_target` key of the edge.
	pub id: String,
	pub name: String,
	pub source: String,
	pub target: String,
	pub source_name: Option<String>,
	pub target_name: Option<String>,
	pub data: PropertyMap,
}

impl SelectedEdge {
	/// Builds the selection from an edge key, filling display names and
	/// properties from the current graph when available.
	pub fn from_key(key: &str, graph: Option<&FlatGraph>) -> Option<Self> {
		let EdgeKey {
			source,
			label,
			target,
		} = edge_key::parse(key)?;
		let label_of = |id: &str| {
			graph
				.and_then(|g| g.node(id))
				.map(|n| n.label.text.clone())
		};
		let data = graph
			.and_then(|g| g.edge(key))
			.map(|e| {
				let mut data = e.data.properties.clone();
				if let Some(extra) = &e.data.data {
					data.extend(extra.clone());
				}
				data
			})
			.unwrap_or_default();

		Some(Self {
			id: key.to_string(),
			source_name: label_of(&source),
			target_name: label_of(&target),
			name: label,
			source,
			target,
			data,
		})
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeInfoState {
	pub selected: Option<SelectedEdge>,
	pub expanded: BTreeSet<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EdgeInfoAction {
	Select(SelectedEdge),
	Clear,
	ToggleSection(String),
}

impl EdgeInfoState {
	pub fn reduce(mut self, action: &Action) -> Self {
		match action {
			Action::EdgeInfo(EdgeInfoAction::Select(edge)) => Self {
				selected: Some(edge.clone()),
				expanded: BTreeSet::new(),
			},
			Action::EdgeInfo(EdgeInfoAction::Clear)
			| Action::EntityInfo(EntityInfoAction::Select(_))
			| Action::Explore(ExploreAction::ClearGraph) => Self::default(),
			Action::Explore(ExploreAction::GraphStart(request)) if request.replaces_selection() => {
				Self::default()
			}
			Action::EdgeInfo(EdgeInfoAction::ToggleSection(section)) => {
				if !self.expanded.remove(section) {
					self.expanded.insert(section.clone());
				}
				self
			}
			_ => self,
		}
	}

	pub fn is_expanded(&self, section: &str) -> bool {
		self.expanded.contains(section)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::graph::{GraphPayload, PropertyValue, normalize};
	use crate::store::entity_info::SelectedNode;

	fn graph() -> FlatGraph {
		normalize(Some(
			GraphPayload::from_json(json!({
				"nodes": {
					"1": { "label": "SVC_SQL@CORP.LOCAL", "kind": "User", "objectId": "S-1-5-21-1105" },
					"2": { "label": "GRAPH API", "kind": "AZServicePrincipal", "objectId": "sp-1" }
				},
				"edges": [{
					"source": "1",
					"target": "2",
					"label": "AZMGGroup_ReadWrite_All",
					"kind": "AZMGGroup_ReadWrite_All",
					"lastSeen": "2024-01-01T00:00:00Z",
					"data": { "isacl": false, "lastseen": "2024-01-01" }
				}]
			}))
			.unwrap(),
		))
		.unwrap()
	}

	#[test]
	fn selection_is_built_from_the_edge_key() {
		let graph = graph();
		let edge = SelectedEdge::from_key("1_AZMGGroup_ReadWrite_All_2", Some(&graph)).unwrap();
		assert_eq!(edge.name, "AZMGGroup_ReadWrite_All");
		assert_eq!(edge.source_name.as_deref(), Some("SVC_SQL@CORP.LOCAL"));
		assert_eq!(edge.target_name.as_deref(), Some("GRAPH API"));
		assert_eq!(
			edge.data.get("isacl"),
			Some(&PropertyValue::Bool(false))
		);
	}

	#[test]
	fn malformed_keys_select_nothing() {
		assert_eq!(SelectedEdge::from_key("still_invalid", None), None);
	}

	#[test]
	fn new_selection_collapses_sections() {
		let first = SelectedEdge::from_key("1_MemberOf_2", None).unwrap();
		let second = SelectedEdge::from_key("2_GenericAll_3", None).unwrap();
		let state = EdgeInfoState::default()
			.reduce(&Action::EdgeInfo(EdgeInfoAction::Select(first)))
			.reduce(&Action::EdgeInfo(EdgeInfoAction::ToggleSection(
				"Abuse".into(),
			)));
		assert!(state.is_expanded("Abuse"));

		let state = state.reduce(&Action::EdgeInfo(EdgeInfoAction::Select(second)));
		assert!(state.expanded.is_empty());
		assert_eq!(state.selected.unwrap().id, "2_GenericAll_3");
	}

	#[test]
	fn selecting_a_node_clears_the_edge() {
		let edge = SelectedEdge::from_key("1_MemberOf_2", None).unwrap();
		let state = EdgeInfoState::default()
			.reduce(&Action::EdgeInfo(EdgeInfoAction::Select(edge)))
			.reduce(&Action::EntityInfo(EntityInfoAction::Select(SelectedNode {
				id: "1".into(),
				kind: "User".into(),
				name: "alice".into(),
				..SelectedNode::default()
			})));
		assert_eq!(state.selected, None);
	}
}
