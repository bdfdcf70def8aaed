use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::camera::Camera;
use super::layout;
use super::zoom::WheelZoom;
use crate::config::AppConfig;
use crate::graph::curve::{self, EdgeGroup, Point};
use crate::graph::style;
use crate::graph::types::StyledEdge;
use crate::graph::{EdgeKey, FlatGraph};
use crate::store::explore::LayoutKind;

/// Minimum pick distance in pixels, so tiny nodes stay clickable.
pub const HIT_RADIUS: f64 = 8.0;
pub const EDGE_HIT_DISTANCE: f64 = 5.0;
pub const FIT_PADDING: f64 = 60.0;
const CURVE_SAMPLES: usize = 16;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: Option<String>,
	pub size: Option<f64>,
	pub color: String,
	pub border: String,
	pub glyph: char,
}

impl NodeInfo {
	pub fn radius(&self) -> f64 {
		self.size.unwrap_or(layout::DEFAULT_NODE_SIZE)
	}
}

#[derive(Clone, Debug)]
pub struct CanvasEdge {
	/// `source_label_target` key.
	pub key: String,
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub source_id: String,
	pub target_id: String,
	pub label: String,
	pub color: String,
	pub directed: bool,
	pub group: EdgeGroup,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub last_x: f64,
	pub last_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// What a pointer position resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hit {
	Node(String),
	Edge(String),
}

pub struct GraphCanvasState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edges: Vec<CanvasEdge>,
	pub camera: Camera,
	pub zoom: WheelZoom,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub selected: Option<Hit>,
	pub layout: LayoutKind,
	pub animation_running: bool,
	config: AppConfig,
	index: HashMap<String, DefaultNodeIdx>,
}

fn simulation() -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

impl GraphCanvasState {
	pub fn new(config: &AppConfig, width: f64, height: f64) -> Self {
		Self {
			graph: simulation(),
			edges: Vec::new(),
			camera: Camera::new(width, height),
			zoom: WheelZoom::new(&config.wheel_zoom),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			selected: None,
			layout: LayoutKind::default(),
			animation_running: true,
			config: config.clone(),
			index: HashMap::new(),
		}
	}

	/// Replaces the displayed graph, re-applies the current layout and
	/// fits the camera to it.
	pub fn load(&mut self, data: &FlatGraph) {
		let mut graph = simulation();
		let mut index = HashMap::new();
		let count = data.nodes().count().max(1);
		let radius = (count as f64 * 12.0).clamp(50.0, 400.0);

		for (i, (id, node)) in data.nodes().enumerate() {
			let angle = i as f64 * 2.0 * PI / count as f64;
			let size = if node.size > 0.0 {
				node.size
			} else {
				self.config.default_node_size
			};
			let idx = graph.add_node(NodeData {
				x: (radius * angle.cos()) as f32,
				y: (radius * angle.sin()) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: id.to_string(),
					label: Some(node.label.text.clone()).filter(|l| !l.is_empty()),
					size: Some(size),
					color: node.color.clone(),
					border: node.border.color.clone(),
					glyph: style::glyph_for_icon(&node.font_icon.text),
				},
			});
			index.insert(id.to_string(), idx);
		}

		let styled: Vec<(String, &StyledEdge)> = data
			.edges()
			.filter_map(|(id, edge)| Some((EdgeKey::from_flat_id(id)?.key(), edge)))
			.collect();
		let groups = curve::group_edges(styled.iter().map(|(_, e)| (e.id1.as_str(), e.id2.as_str())));

		let mut springs = HashSet::new();
		let mut edges = Vec::new();
		for ((key, edge), group) in styled.iter().zip(groups) {
			let (Some(&source), Some(&target)) = (index.get(&edge.id1), index.get(&edge.id2)) else {
				continue;
			};
			let pair = if edge.id1 <= edge.id2 {
				(source, target)
			} else {
				(target, source)
			};
			if source != target && springs.insert(pair) {
				graph.add_edge(source, target, EdgeData::default());
			}
			edges.push(CanvasEdge {
				key: key.clone(),
				source,
				target,
				source_id: edge.id1.clone(),
				target_id: edge.id2.clone(),
				label: edge.label.text.clone(),
				color: edge.color.clone(),
				directed: edge.is_directed(),
				group,
			});
		}

		self.graph = graph;
		self.edges = edges;
		self.index = index;
		self.hover = HoverState::default();
		self.drag = DragState::default();
		self.selected = None;
		self.animation_running = true;
		self.set_layout(self.layout);
		self.fit();
	}

	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}

	pub fn set_layout(&mut self, kind: LayoutKind) {
		self.layout = kind;
		match kind {
			LayoutKind::Sequential => {
				let edges: Vec<(&str, &str)> = self
					.edges
					.iter()
					.map(|e| (e.source_id.as_str(), e.target_id.as_str()))
					.collect();
				layout::apply_sequential(&mut self.graph, edges, &self.config.layout);
			}
			LayoutKind::Standard => layout::apply_standard(&mut self.graph),
		}
	}

	/// Fits the camera around every node.
	pub fn fit(&mut self) {
		let mut bounds: Option<((f64, f64), (f64, f64))> = None;
		self.graph.visit_nodes(|node| {
			let (x, y, r) = (node.x() as f64, node.y() as f64, node.data.user_data.radius());
			let (min, max) = bounds.get_or_insert(((x - r, y - r), (x + r, y + r)));
			*min = (min.0.min(x - r), min.1.min(y - r));
			*max = (max.0.max(x + r), max.1.max(y + r));
		});
		if let Some((min, max)) = bounds {
			self.camera.fit(min, max, FIT_PADDING);
		}
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.camera.screen_to_graph(sx, sy);
		let min_hit = HIT_RADIUS * self.camera.state().ratio;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.radius().max(min_hit) {
				found = Some(node.index());
			}
		});
		found
	}

	/// Node centres in canvas pixels.
	pub fn screen_positions(&self) -> HashMap<DefaultNodeIdx, Point> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			let (x, y) = self.camera.graph_to_screen(node.x() as f64, node.y() as f64);
			positions.insert(node.index(), Point { x, y });
		});
		positions
	}

	/// Index into `edges` of the edge drawn under the pointer. Curves are
	/// laid out in screen space, the same way they are drawn.
	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let positions = self.screen_positions();
		let p = Point { x: sx, y: sy };

		self.edges
			.iter()
			.enumerate()
			.filter(|(_, edge)| edge.source != edge.target)
			.filter_map(|(i, edge)| {
				let source = *positions.get(&edge.source)?;
				let target = *positions.get(&edge.target)?;
				let control = curve::control_point(curve::curve_height(edge.group), source, target);
				let distance = (0..CURVE_SAMPLES)
					.map(|s| {
						let at = |k: usize| {
							curve::point_on_curve(k as f64 / CURVE_SAMPLES as f64, source, control, target)
						};
						segment_distance(p, at(s), at(s + 1))
					})
					.fold(f64::INFINITY, f64::min);
				(distance < EDGE_HIT_DISTANCE).then_some((i, distance))
			})
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(i, _)| i)
	}

	/// Nodes win over edges.
	pub fn hit(&self, sx: f64, sy: f64) -> Option<Hit> {
		if let Some(idx) = self.node_at_position(sx, sy) {
			return self.node_id(idx).map(Hit::Node);
		}
		self.edge_at_position(sx, sy)
			.map(|i| Hit::Edge(self.edges[i].key.clone()))
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// keep the previous highlight around for the fade out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for edge in &self.edges {
				if edge.source == idx {
					self.hover.neighbors.insert(edge.target);
				} else if edge.target == idx {
					self.hover.neighbors.insert(edge.source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn is_selected_node(&self, id: &str) -> bool {
		matches!(&self.selected, Some(Hit::Node(n)) if n == id)
	}

	pub fn is_selected_edge(&self, key: &str) -> bool {
		matches!(&self.selected, Some(Hit::Edge(e)) if e == key)
	}

	/// Advances the camera animation and, for the standard layout, the
	/// simulation. `now` is in milliseconds, `dt` in seconds.
	pub fn tick(&mut self, now: f64, dt: f32) {
		self.zoom.on_frame(&mut self.camera, now);
		if self.animation_running && self.layout == LayoutKind::Standard {
			self.graph.update(dt);
		}

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.camera.resize(width, height);
	}
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len2 = dx * dx + dy * dy;
	let t = if len2 == 0.0 {
		0.0
	} else {
		(((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.x + t * dx, a.y + t * dy);
	((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::graph::{GraphPayload, normalize};

	fn flat() -> FlatGraph {
		normalize(Some(
			GraphPayload::from_json(json!({
				"nodes": {
					"1": { "label": "ALICE@CORP.LOCAL", "kind": "User", "objectId": "S-1-5-21-1000" },
					"2": { "label": "DOMAIN ADMINS@CORP.LOCAL", "kind": "Group", "objectId": "S-1-5-21-512", "isTierZero": true },
					"3": { "label": "CORP.LOCAL", "kind": "Domain", "objectId": "S-1-5-21" }
				},
				"edges": [
					{ "source": "1", "target": "2", "label": "MemberOf", "kind": "MemberOf" },
					{ "source": "1", "target": "2", "label": "GenericAll", "kind": "GenericAll" },
					{ "source": "2", "target": "3", "label": "DCSync", "kind": "DCSync" }
				]
			}))
			.unwrap(),
		))
		.unwrap()
	}

	fn loaded() -> GraphCanvasState {
		let mut state = GraphCanvasState::new(&AppConfig::default(), 800.0, 600.0);
		state.load(&flat());
		state
	}

	fn screen_of(state: &GraphCanvasState, id: &str) -> (f64, f64) {
		let p = state.screen_positions()[&state.index[id]];
		(p.x, p.y)
	}

	#[test]
	fn loading_builds_nodes_and_edge_groups() {
		let state = loaded();
		assert_eq!(state.index.len(), 3);
		assert_eq!(state.edges.len(), 3);
		let parallel: Vec<_> = state.edges.iter().filter(|e| e.group.is_curved()).collect();
		assert_eq!(parallel.len(), 2);
		assert!(state.edges.iter().any(|e| e.key == "2_DCSync_3"));
	}

	#[test]
	fn clicking_a_node_hits_it() {
		let state = loaded();
		let (x, y) = screen_of(&state, "3");
		assert_eq!(state.hit(x, y), Some(Hit::Node("3".into())));
	}

	#[test]
	fn clicking_an_edge_midpoint_hits_it() {
		let state = loaded();
		let a = screen_of(&state, "2");
		let b = screen_of(&state, "3");
		let mid = ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
		assert_eq!(state.hit(mid.0, mid.1), Some(Hit::Edge("2_DCSync_3".into())));
	}

	#[test]
	fn hovering_highlights_neighbours() {
		let mut state = loaded();
		let alice = state.index["1"];
		state.set_hover(Some(alice));
		assert!(state.is_highlighted(state.index["2"]));
		assert!(!state.is_highlighted(state.index["3"]));
	}

	#[test]
	fn sequential_layout_pins_nodes_in_ranks() {
		let mut state = loaded();
		state.set_layout(LayoutKind::Sequential);
		state.tick(16.0, 0.016);
		let p = state.screen_positions();
		let x = |id: &str| p[&state.index[id]].x;
		assert!(x("1") < x("2") && x("2") < x("3"));
	}

	#[test]
	fn fit_keeps_every_node_on_screen() {
		let state = loaded();
		for id in ["1", "2", "3"] {
			let (x, y) = screen_of(&state, id);
			assert!((0.0..=800.0).contains(&x) && (0.0..=600.0).contains(&y));
		}
	}
}
