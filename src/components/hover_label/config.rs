const DEFAULT_LABEL_ID: &str = "name";
const DEFAULT_NODE_SELECTOR: &str = "DIV.node";
const DEFAULT_CAPTION_ATTRIBUTE: &str = "tag";

/// DOM identifiers the binder looks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverConfig {
	/// Id of the shared caption element.
	pub label_id: String,
	/// CSS selector matching node elements.
	pub node_selector: String,
	/// Attribute copied into the caption on hover.
	pub caption_attribute: String,
}

impl Default for HoverConfig {
	fn default() -> Self {
		Self {
			label_id: DEFAULT_LABEL_ID.into(),
			node_selector: DEFAULT_NODE_SELECTOR.into(),
			caption_attribute: DEFAULT_CAPTION_ATTRIBUTE.into(),
		}
	}
}

impl HoverConfig {
	/// Use a different caption element id.
	pub fn with_label_id(mut self, id: impl Into<String>) -> Self {
		self.label_id = id.into();
		self
	}

	/// Use a different CSS selector for node elements.
	pub fn with_node_selector(mut self, selector: impl Into<String>) -> Self {
		self.node_selector = selector.into();
		self
	}

	/// Read the caption from a different attribute.
	pub fn with_caption_attribute(mut self, attribute: impl Into<String>) -> Self {
		self.caption_attribute = attribute.into();
		self
	}
}
