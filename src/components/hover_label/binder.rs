use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, Element, Event, MouseEvent};

use super::config::HoverConfig;
use super::error::{BindError, js_reason};
use super::state::HoverLabelState;

type HoverClosure = Closure<dyn FnMut(MouseEvent)>;

const ENTER_EVENT: &str = "mouseover";
const LEAVE_EVENT: &str = "mouseout";

struct NodeListeners {
	node: Element,
	on_enter: HoverClosure,
	on_leave: HoverClosure,
}

/// Listeners installed on the node elements found at bind time.
///
/// Dropping the handle detaches every listener. Call [`HoverBindings::keep_for_page`]
/// to leave them installed until the page unloads.
pub struct HoverBindings {
	nodes: Vec<NodeListeners>,
	state: Rc<RefCell<HoverLabelState>>,
}

impl HoverBindings {
	/// Number of node elements that received listeners.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether no node matched the selector.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Caption last written to the label.
	pub fn caption(&self) -> String {
		self.state.borrow().text().to_owned()
	}

	/// Leak the listeners so they live as long as the page.
	pub fn keep_for_page(mut self) {
		for listeners in self.nodes.drain(..) {
			listeners.on_enter.forget();
			listeners.on_leave.forget();
		}
	}
}

impl Drop for HoverBindings {
	fn drop(&mut self) {
		for listeners in &self.nodes {
			let _ = listeners.node.remove_event_listener_with_callback(
				ENTER_EVENT,
				listeners.on_enter.as_ref().unchecked_ref(),
			);
			let _ = listeners.node.remove_event_listener_with_callback(
				LEAVE_EVENT,
				listeners.on_leave.as_ref().unchecked_ref(),
			);
		}
	}
}

fn show(label: Option<&Element>, label_id: &str, text: &str) {
	match label {
		Some(label) => label.set_text_content(Some(text)),
		None => error!("caption label #{label_id} is missing from the page"),
	}
}

fn listen(node: &Element, event: &'static str, cb: &HoverClosure) -> Result<(), BindError> {
	node.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())
		.map_err(|e| BindError::ListenerFailed {
			event,
			reason: js_reason(&e),
		})
}

/// Attach caption hover listeners to every node element currently in `document`.
///
/// The label element is looked up once here. If it is absent, binding still
/// succeeds and each hover logs an error instead of updating anything.
pub fn bind_hover_labels(
	document: &Document,
	config: &HoverConfig,
) -> Result<HoverBindings, BindError> {
	let label = document.get_element_by_id(&config.label_id);
	if label.is_none() {
		warn!("no caption label #{} found, hovers will fail", config.label_id);
	}
	let found = document
		.query_selector_all(&config.node_selector)
		.map_err(|e| BindError::InvalidSelector {
			selector: config.node_selector.clone(),
			reason: js_reason(&e),
		})?;

	let mut bindings = HoverBindings {
		nodes: Vec::with_capacity(found.length() as usize),
		state: Rc::new(RefCell::new(HoverLabelState::default())),
	};

	for i in 0..found.length() {
		let Some(node) = found.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
			continue;
		};

		let (node_enter, label_enter, state_enter) =
			(node.clone(), label.clone(), bindings.state.clone());
		let (label_id, attribute) = (config.label_id.clone(), config.caption_attribute.clone());
		let on_enter: HoverClosure = Closure::new(move |_: MouseEvent| {
			let caption = node_enter.get_attribute(&attribute);
			let text = state_enter.borrow_mut().enter(caption).to_owned();
			debug!("hover caption: {text:?}");
			show(label_enter.as_ref(), &label_id, &text);
		});

		let (label_leave, state_leave) = (label.clone(), bindings.state.clone());
		let label_id = config.label_id.clone();
		let on_leave: HoverClosure = Closure::new(move |_: MouseEvent| {
			let text = state_leave.borrow_mut().leave().to_owned();
			show(label_leave.as_ref(), &label_id, &text);
		});

		listen(&node, ENTER_EVENT, &on_enter)?;
		if let Err(e) = listen(&node, LEAVE_EVENT, &on_leave) {
			let _ = node
				.remove_event_listener_with_callback(ENTER_EVENT, on_enter.as_ref().unchecked_ref());
			return Err(e);
		}
		bindings.nodes.push(NodeListeners {
			node,
			on_enter,
			on_leave,
		});
	}

	info!(
		"bound hover captions to {} `{}` nodes",
		bindings.len(),
		config.node_selector
	);
	Ok(bindings)
}

/// [`bind_hover_labels`] on the window's document.
pub fn bind_current_document(config: &HoverConfig) -> Result<HoverBindings, BindError> {
	let document = web_sys::window()
		.ok_or(BindError::WindowNotAvailable)?
		.document()
		.ok_or(BindError::DocumentNotAvailable)?;
	bind_hover_labels(&document, config)
}

/// Bind once the page has finished loading, keeping the listeners for the page lifetime.
///
/// Binds immediately when the document is already complete.
pub fn bind_on_page_ready(config: HoverConfig) -> Result<(), BindError> {
	let window = web_sys::window().ok_or(BindError::WindowNotAvailable)?;
	let document = window.document().ok_or(BindError::DocumentNotAvailable)?;

	if document.ready_state() == "complete" {
		bind_hover_labels(&document, &config)?.keep_for_page();
		return Ok(());
	}

	let on_load = Closure::once_into_js(move |_: Event| {
		match bind_hover_labels(&document, &config) {
			Ok(bindings) => bindings.keep_for_page(),
			Err(e) => error!("hover caption binding failed: {e}"),
		}
	});
	let options = AddEventListenerOptions::new();
	options.set_once(true);
	window
		.add_event_listener_with_callback_and_add_event_listener_options(
			"load",
			on_load.unchecked_ref(),
			&options,
		)
		.map_err(|e| BindError::ListenerFailed {
			event: "load",
			reason: js_reason(&e),
		})
}
