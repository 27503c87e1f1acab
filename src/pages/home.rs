use leptos::prelude::*;
use log::error;

use crate::components::hover_label::{HoverBindings, HoverConfig, bind_current_document};
use crate::components::layered_graph::{
	LayeredGraph, LayeredGraphView, LayeredLayout, LayoutEdge, LayoutError, Vertex,
};

/// Twelve vertices that settle into four levels with no crossings:
///
/// ```text
/// B C A
/// |/ /
/// D E F
/// |/|\|
/// G I H
/// |  /|
/// L K J
/// ```
fn sample_graph() -> (Vec<Vertex>, Vec<LayoutEdge>) {
	let vertices = "ABCDEFGHIJKL"
		.chars()
		.map(|id| Vertex::new(id).with_tag(format!("vertex {id}")))
		.collect();

	let edges = [
		("A", "E"),
		("B", "D"),
		("C", "D"),
		("D", "G"),
		("E", "G"),
		("E", "H"),
		("E", "I"),
		("F", "H"),
		("G", "L"),
		("H", "K"),
		("H", "J"),
	]
	.into_iter()
	.map(|(source, target)| LayoutEdge::new(source, target))
	.collect();

	(vertices, edges)
}

fn sample_layout() -> Result<LayeredGraph, LayoutError> {
	let (vertices, edges) = sample_graph();
	LayeredLayout::default().layout(&vertices, &edges)
}

/// Layout inspection page: hover a node to see its caption.
#[component]
pub fn Home() -> impl IntoView {
	// Dropped with the page, which detaches the listeners.
	let bindings = StoredValue::new_local(None::<HoverBindings>);

	Effect::new(move |_| match bind_current_document(&HoverConfig::default()) {
		Ok(bound) => bindings.set_value(Some(bound)),
		Err(e) => error!("could not bind hover captions: {e}"),
	});

	let graph = sample_layout().map(|graph| view! { <LayeredGraphView graph=graph /> });

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<div class="layout-inspector">
				<h1>"Layered Layout"</h1>
				<p class="subtitle">"Hover a node to show its tag."</p>
				<div id="name" class="caption"></div>
				{graph}
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sample_layout_is_crossing_free() {
		let graph = sample_layout().unwrap();
		assert_eq!(graph.nodes.len(), 12);
		assert_eq!(graph.depth(), 4);
		assert_eq!(graph.crossings, 0);
	}

	#[test]
	fn sample_edges_join_adjacent_levels() {
		let graph = sample_layout().unwrap();
		for edge in &graph.edges {
			let (src, tgt) = (graph.node(&edge.source), graph.node(&edge.target));
			assert!(src.is_some() && tgt.is_some(), "dangling edge {edge:?}");
			assert_eq!(src.unwrap().level + 1, tgt.unwrap().level);
		}
	}

	#[test]
	fn sample_tags_name_their_vertex() {
		let graph = sample_layout().unwrap();
		assert_eq!(graph.node("E").map(|n| n.tag.as_str()), Some("vertex E"));
	}
}
