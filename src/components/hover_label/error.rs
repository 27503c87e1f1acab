use wasm_bindgen::JsValue;

/// Failures while wiring hover listeners into the page.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BindError {
	/// No global `window`, e.g. outside a browser.
	#[error("window is not available")]
	WindowNotAvailable,

	/// The window has no document.
	#[error("document is not available")]
	DocumentNotAvailable,

	/// `querySelectorAll` rejected the node selector.
	#[error("invalid node selector `{selector}`: {reason}")]
	InvalidSelector { selector: String, reason: String },

	/// `addEventListener` threw.
	#[error("failed to add `{event}` listener: {reason}")]
	ListenerFailed { event: &'static str, reason: String },
}

pub(crate) fn js_reason(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
