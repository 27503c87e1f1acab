/// Input vertex for the layered layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vertex {
	/// Unique name, referenced by edges.
	pub id: String,
	/// Caption shown when the rendered node is hovered.
	pub tag: String,
}

impl Vertex {
	/// Vertex whose caption is its id.
	pub fn new(id: impl Into<String>) -> Self {
		let id = id.into();
		Self {
			tag: id.clone(),
			id,
		}
	}

	/// Replace the hover caption.
	pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
		self.tag = tag.into();
		self
	}
}

/// A positioned vertex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutNode {
	/// Id of the input vertex.
	pub id: String,
	/// Hover caption.
	pub tag: String,
	/// Level, counted from the top.
	pub level: u32,
	/// Position within the level, counted from the left.
	pub order: u32,
}

/// A directed edge between two vertex ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutEdge {
	/// Id of the tail vertex.
	pub source: String,
	/// Id of the head vertex.
	pub target: String,
}

impl LayoutEdge {
	/// Edge from `source` to `target`.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
		}
	}
}

/// A graph whose nodes already carry a level and an in-level order.
#[derive(Clone, Debug, Default)]
pub struct LayeredGraph {
	/// Nodes, listed level by level from left to right.
	pub nodes: Vec<LayoutNode>,
	/// Edges as given to the layout, self-loops removed.
	pub edges: Vec<LayoutEdge>,
	/// Edge crossings left after ordering, counting edges routed through skipped levels.
	pub crossings: usize,
}

impl LayeredGraph {
	/// Look up a node by id.
	pub fn node(&self, id: &str) -> Option<&LayoutNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Ids on `level`, left to right.
	pub fn level(&self, level: u32) -> Vec<&str> {
		let mut row: Vec<&LayoutNode> = self.nodes.iter().filter(|n| n.level == level).collect();
		row.sort_by_key(|n| n.order);
		row.into_iter().map(|n| n.id.as_str()).collect()
	}

	/// Number of levels.
	pub fn depth(&self) -> u32 {
		self.nodes.iter().map(|n| n.level + 1).max().unwrap_or(0)
	}
}
