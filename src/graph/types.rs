use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Prefix marking edge entries in a [`FlatGraph`].
pub const EDGE_ID_PREFIX: &str = "rel_";

/// A backend-supplied attribute value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	Text(String),
	List(Vec<PropertyValue>),
	Map(BTreeMap<String, PropertyValue>),
}

impl PropertyValue {
	pub fn as_str(&self) -> Option<&str> {
		match self {
			PropertyValue::Text(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			PropertyValue::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// Human readable rendering used by the info panels.
	pub fn display(&self) -> String {
		match self {
			PropertyValue::Null => "NULL".into(),
			PropertyValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.into(),
			PropertyValue::Int(i) => i.to_string(),
			PropertyValue::Float(f) => f.to_string(),
			PropertyValue::Text(s) => s.clone(),
			PropertyValue::List(items) => items
				.iter()
				.map(PropertyValue::display)
				.collect::<Vec<_>>()
				.join(", "),
			PropertyValue::Map(map) => map
				.iter()
				.map(|(k, v)| format!("{k}: {}", v.display()))
				.collect::<Vec<_>>()
				.join(", "),
		}
	}
}

pub type PropertyMap = BTreeMap<String, PropertyValue>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	pub label: String,
	pub kind: String,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub kinds: Vec<String>,
	pub object_id: String,
	#[serde(default)]
	pub last_seen: String,
	#[serde(default)]
	pub is_tier_zero: bool,
	#[serde(default)]
	pub is_owned_object: bool,
	#[serde(flatten)]
	pub properties: PropertyMap,
}

impl GraphNode {
	/// Every kind label of the node, primary kind first.
	pub fn all_kinds(&self) -> Vec<&str> {
		let mut kinds = vec![self.kind.as_str()];
		kinds.extend(
			self.kinds
				.iter()
				.map(String::as_str)
				.filter(|k| *k != self.kind),
		);
		kinds
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
	pub label: String,
	pub kind: String,
	#[serde(default)]
	pub last_seen: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub impact_percent: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<PropertyMap>,
	#[serde(flatten)]
	pub properties: PropertyMap,
}

impl GraphEdge {
	pub fn is_acl(&self) -> bool {
		self.data
			.as_ref()
			.and_then(|d| d.get("isacl"))
			.or_else(|| self.properties.get("isacl"))
			.and_then(PropertyValue::as_bool)
			.unwrap_or(false)
	}
}

/// Structured graph response: nodes keyed by id plus an edge list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	pub nodes: BTreeMap<String, GraphNode>,
	pub edges: Vec<GraphEdge>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Border {
	pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontIcon {
	pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLabel {
	pub text: String,
	pub background_color: String,
	pub center: bool,
	pub font_size: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledNode {
	pub color: String,
	pub data: GraphNode,
	pub border: Border,
	pub font_icon: FontIcon,
	pub label: NodeLabel,
	pub size: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeEnd {
	pub arrow: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeLabel {
	pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyledEdge {
	pub color: String,
	pub data: GraphEdge,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub end1: Option<EdgeEnd>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub end2: Option<EdgeEnd>,
	pub id1: String,
	pub id2: String,
	pub label: EdgeLabel,
	#[serde(default)]
	pub acl: bool,
}

impl StyledEdge {
	pub fn is_directed(&self) -> bool {
		self.end2.as_ref().is_some_and(|e| e.arrow)
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlatItem {
	Edge(StyledEdge),
	Node(StyledNode),
}

/// Renderer-ready graph. Edge ids start with [`EDGE_ID_PREFIX`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatGraph(pub BTreeMap<String, FlatItem>);

impl FlatGraph {
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn insert_node(&mut self, id: String, node: StyledNode) {
		self.0.insert(id, FlatItem::Node(node));
	}

	pub fn insert_edge(&mut self, id: String, edge: StyledEdge) {
		self.0.insert(id, FlatItem::Edge(edge));
	}

	pub fn nodes(&self) -> impl Iterator<Item = (&str, &StyledNode)> {
		self.0.iter().filter_map(|(id, item)| match item {
			FlatItem::Node(n) if !id.starts_with(EDGE_ID_PREFIX) => Some((id.as_str(), n)),
			_ => None,
		})
	}

	pub fn edges(&self) -> impl Iterator<Item = (&str, &StyledEdge)> {
		self.0.iter().filter_map(|(id, item)| match item {
			FlatItem::Edge(e) if id.starts_with(EDGE_ID_PREFIX) => Some((id.as_str(), e)),
			_ => None,
		})
	}

	pub fn node(&self, id: &str) -> Option<&StyledNode> {
		match self.0.get(id) {
			Some(FlatItem::Node(n)) => Some(n),
			_ => None,
		}
	}

	/// Looks up an edge by its `source_label_target` key.
	pub fn edge(&self, key: &str) -> Option<&StyledEdge> {
		match self.0.get(&format!("{EDGE_ID_PREFIX}{key}")) {
			Some(FlatItem::Edge(e)) => Some(e),
			_ => None,
		}
	}
}
