mod binder;
mod config;
mod error;
mod state;

pub use binder::{
	HoverBindings, bind_current_document, bind_hover_labels, bind_on_page_ready,
};
pub use config::HoverConfig;
pub use error::BindError;
pub use state::HoverLabelState;
