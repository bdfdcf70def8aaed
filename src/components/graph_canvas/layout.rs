//! Moves node positions between the canvas graph and the layout engines.

use std::collections::HashMap;

use force_graph::ForceGraph;
use log::warn;

use super::layered;
use super::state::NodeInfo;
use crate::config::LayeredLayoutConfig;
use crate::graph::style;

/// Size given to nodes that carry none, so the layered layout always has
/// dimensions to work with.
pub const DEFAULT_NODE_SIZE: f64 = style::NODE_SIZE;

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
	pub id: String,
	pub label: String,
	pub size: f64,
	pub x: Option<f64>,
	pub y: Option<f64>,
}

/// Directed graph handed to the layered engine. Edges index into `nodes`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutGraph {
	pub nodes: Vec<LayoutNode>,
	pub edges: Vec<(usize, usize)>,
}

impl LayoutGraph {
	pub fn node(&self, id: &str) -> Option<&LayoutNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

/// Copies the canvas nodes, with their label and size, and the given
/// `(source, target)` edges. Edges with an unknown endpoint are skipped.
pub fn to_layout_graph<'a>(
	graph: &ForceGraph<NodeInfo, ()>,
	edges: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> LayoutGraph {
	let mut nodes = Vec::new();
	graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		nodes.push(LayoutNode {
			id: info.id.clone(),
			label: info.label.clone().unwrap_or_default(),
			size: info.size.unwrap_or(DEFAULT_NODE_SIZE),
			x: None,
			y: None,
		});
	});

	let index: HashMap<&str, usize> = nodes
		.iter()
		.enumerate()
		.map(|(i, n)| (n.id.as_str(), i))
		.collect();
	let edges = edges
		.into_iter()
		.filter_map(|(s, t)| Some((*index.get(s)?, *index.get(t)?)))
		.collect();

	LayoutGraph { nodes, edges }
}

/// Copies computed positions back onto the canvas nodes. A missing axis is
/// logged and leaves that coordinate as it was. Returns the number of
/// missing axes.
pub fn apply_positions(graph: &mut ForceGraph<NodeInfo, ()>, layout: &LayoutGraph) -> usize {
	let positions: HashMap<&str, (Option<f64>, Option<f64>)> = layout
		.nodes
		.iter()
		.map(|n| (n.id.as_str(), (n.x, n.y)))
		.collect();

	let mut missing = 0;
	graph.visit_nodes_mut(|node| {
		let id = &node.data.user_data.id;
		let (x, y) = positions.get(id.as_str()).copied().unwrap_or((None, None));
		match x {
			Some(x) => node.data.x = x as f32,
			None => {
				warn!("layout has no x position for node {id}");
				missing += 1;
			}
		}
		match y {
			Some(y) => node.data.y = y as f32,
			None => {
				warn!("layout has no y position for node {id}");
				missing += 1;
			}
		}
	});
	missing
}

/// Runs the layered layout and pins the nodes where it put them.
pub fn apply_sequential<'a>(
	graph: &mut ForceGraph<NodeInfo, ()>,
	edges: impl IntoIterator<Item = (&'a str, &'a str)>,
	config: &LayeredLayoutConfig,
) -> LayoutGraph {
	let mut layout = to_layout_graph(graph, edges);
	layered::run(&mut layout, config);
	apply_positions(graph, &layout);
	set_anchored(graph, true);
	layout
}

/// Hands the nodes back to the force simulation.
pub fn apply_standard(graph: &mut ForceGraph<NodeInfo, ()>) {
	set_anchored(graph, false);
}

fn set_anchored(graph: &mut ForceGraph<NodeInfo, ()>, anchored: bool) {
	graph.visit_nodes_mut(|node| node.data.is_anchor = anchored);
}
