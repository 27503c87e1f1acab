/// Caption currently shown in the shared label.
///
/// Every node writes to the same state, so the most recent pointer event wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoverLabelState {
	caption: Option<String>,
}

impl HoverLabelState {
	/// Pointer entered a node. A node without a caption attribute shows an empty label.
	pub fn enter(&mut self, caption: Option<String>) -> &str {
		self.caption = Some(caption.unwrap_or_default());
		self.text()
	}

	/// Pointer left a node.
	pub fn leave(&mut self) -> &str {
		self.caption = None;
		self.text()
	}

	/// Text the label element should display.
	pub fn text(&self) -> &str {
		self.caption.as_deref().unwrap_or("")
	}

	/// Whether some node is currently hovered.
	pub fn is_hovered(&self) -> bool {
		self.caption.is_some()
	}
}
