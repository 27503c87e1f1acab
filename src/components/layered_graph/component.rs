use leptos::prelude::*;

use super::types::{LayeredGraph, LayoutNode};

pub const CELL_WIDTH: f64 = 80.0;
pub const CELL_HEIGHT: f64 = 70.0;
pub const NODE_SIZE: f64 = 24.0;

fn center(node: &LayoutNode) -> (f64, f64) {
	(
		node.order as f64 * CELL_WIDTH + CELL_WIDTH / 2.0,
		node.level as f64 * CELL_HEIGHT + CELL_HEIGHT / 2.0,
	)
}

/// Renders each node as an absolutely positioned `div.node` carrying a `tag`
/// attribute, with edges drawn underneath in SVG.
#[component]
pub fn LayeredGraphView(graph: LayeredGraph) -> impl IntoView {
	let width = graph.nodes.iter().map(|n| n.order + 1).max().unwrap_or(0) as f64 * CELL_WIDTH;
	let height = graph.depth() as f64 * CELL_HEIGHT;

	let lines = graph
		.edges
		.iter()
		.filter_map(|e| Some((center(graph.node(&e.source)?), center(graph.node(&e.target)?))))
		.map(|((x1, y1), (x2, y2))| {
			view! {
				<line
					x1=x1.to_string()
					y1=y1.to_string()
					x2=x2.to_string()
					y2=y2.to_string()
					stroke="#64b4ff"
					stroke-width="1.5"
				/>
			}
		})
		.collect_view();

	let nodes = graph
		.nodes
		.iter()
		.map(|node| {
			let (cx, cy) = center(node);
			let style = format!(
				"position: absolute; left: {}px; top: {}px; width: {NODE_SIZE}px; height: {NODE_SIZE}px;",
				cx - NODE_SIZE / 2.0,
				cy - NODE_SIZE / 2.0,
			);
			view! {
				<div class="node" style=style>
					{node.id.clone()}
				</div>
			}
			.attr("tag", node.tag.clone())
		})
		.collect_view();

	view! {
		<div
			class="layered-graph"
			style=format!("position: relative; width: {width}px; height: {height}px;")
		>
			<svg
				width=width.to_string()
				height=height.to_string()
				style="position: absolute; left: 0; top: 0;"
			>
				{lines}
			</svg>
			{nodes}
		</div>
	}
}
