//! Turns backend graph responses into the flat structure the canvas renders.

use serde_json::Value;

use super::edge_key;
use super::style;
use super::types::{
	Border, EDGE_ID_PREFIX, EdgeEnd, EdgeLabel, FlatGraph, FontIcon, GraphData, GraphEdge,
	GraphNode, NodeLabel, StyledEdge, StyledNode,
};

/// A graph as received from the API or from a previous normalization pass.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphPayload {
	Structured(GraphData),
	Flat(FlatGraph),
}

impl GraphPayload {
	/// Objects with both `nodes` and `edges` are structured, anything else
	/// is treated as an already flat graph.
	pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
		let structured = value
			.as_object()
			.is_some_and(|o| o.contains_key("nodes") && o.contains_key("edges"));
		if structured {
			serde_json::from_value(value).map(GraphPayload::Structured)
		} else {
			serde_json::from_value(value).map(GraphPayload::Flat)
		}
	}
}

/// `None` means nothing has been loaded yet, which is different from an
/// empty graph.
pub fn normalize(payload: Option<GraphPayload>) -> Option<FlatGraph> {
	match payload? {
		GraphPayload::Flat(flat) => Some(flat),
		GraphPayload::Structured(data) => Some(to_flat_graph(data)),
	}
}

pub fn to_flat_graph(data: GraphData) -> FlatGraph {
	let mut flat = FlatGraph::default();
	for (id, node) in data.nodes {
		flat.insert_node(id, style_node(node));
	}
	for edge in data.edges {
		let key = edge_key::format(&edge.source, &edge.kind, &edge.target);
		flat.insert_edge(format!("{EDGE_ID_PREFIX}{key}"), style_edge(edge));
	}
	flat
}

fn style_node(node: GraphNode) -> StyledNode {
	let highlighted = node.is_tier_zero || node.is_owned_object;
	let border = if node.is_owned_object {
		style::OWNED_BORDER
	} else if node.is_tier_zero {
		style::TIER_ZERO_BORDER
	} else {
		style::DEFAULT_BORDER
	};

	// first kind label that has its own styling
	let kind = node
		.all_kinds()
		.into_iter()
		.find(|k| style::has_style(k))
		.unwrap_or(node.kind.as_str())
		.to_string();

	StyledNode {
		color: style::color_for_kind(&kind).to_string(),
		border: Border {
			color: border.to_string(),
		},
		font_icon: FontIcon {
			text: style::icon_for_kind(&kind).to_string(),
		},
		label: NodeLabel {
			text: if node.label.is_empty() {
				node.object_id.clone()
			} else {
				node.label.clone()
			},
			background_color: style::LABEL_BACKGROUND.to_string(),
			center: true,
			font_size: style::LABEL_FONT_SIZE,
		},
		size: if highlighted {
			style::HIGHLIGHTED_NODE_SIZE
		} else {
			style::NODE_SIZE
		},
		data: node,
	}
}

fn style_edge(edge: GraphEdge) -> StyledEdge {
	let acl = edge.is_acl();
	StyledEdge {
		color: if acl {
			style::ACL_EDGE_COLOR
		} else {
			style::EDGE_COLOR
		}
		.to_string(),
		end1: None,
		end2: Some(EdgeEnd { arrow: true }),
		id1: edge.source.clone(),
		id2: edge.target.clone(),
		label: EdgeLabel {
			text: edge.label.clone(),
		},
		acl,
		data: edge,
	}
}
