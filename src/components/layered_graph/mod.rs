mod component;
mod layout;
mod types;

pub use component::LayeredGraphView;
pub use layout::{LayeredLayout, LayoutError, OrderingHeuristic};
pub use types::{LayeredGraph, LayoutEdge, LayoutNode, Vertex};
