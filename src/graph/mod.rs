pub mod curve;
pub mod edge_key;
pub mod normalize;
pub mod style;
pub mod types;

pub use edge_key::EdgeKey;
pub use normalize::{GraphPayload, normalize};
pub use types::{FlatGraph, GraphData, GraphEdge, GraphNode, PropertyMap, PropertyValue};
