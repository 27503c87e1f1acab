//! Layered (Sugiyama-style) layout: levels, then in-level ordering.
//!
//! 1. Cycles are broken by reversing the back edges found in a depth-first walk.
//! 2. Levels come from the longest path from the sources. Every vertex then
//!    falls as close to its successors as it can.
//! 3. Edges spanning several levels are routed through dummy vertices, one per
//!    skipped level.
//! 4. Levels are swept up and down, reordering by the chosen heuristic and
//!    transposing neighbors, until the crossing count stops dropping.

use std::collections::HashMap;

use log::debug;

use super::types::{LayeredGraph, LayoutEdge, LayoutNode, Vertex};

const DEFAULT_MAX_SWEEPS: usize = 24;

/// How a vertex's position is derived from its neighbors on the fixed level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderingHeuristic {
	/// Median neighbor position, skewed toward the more tightly packed side.
	#[default]
	WeightedMedian,
	/// Mean neighbor position.
	BaryCenter,
}

impl OrderingHeuristic {
	/// `None` means the vertex has no neighbor on the fixed level and keeps its slot.
	fn weight(self, mut neighbors: Vec<usize>) -> Option<f64> {
		if neighbors.is_empty() {
			return None;
		}
		neighbors.sort_unstable();
		let n = neighbors.len();
		let at = |i: usize| neighbors[i] as f64;

		let weight = match self {
			Self::BaryCenter => neighbors.iter().sum::<usize>() as f64 / n as f64,
			Self::WeightedMedian if n % 2 == 1 => at(n / 2),
			Self::WeightedMedian => {
				let (med_l, med_r) = (at(n / 2 - 1), at(n / 2));
				let (left, right) = (med_l - at(0), at(n - 1) - med_r);
				if n == 2 || left + right == 0.0 {
					(med_l + med_r) / 2.0
				} else {
					(med_l * right + med_r * left) / (left + right)
				}
			}
		};
		Some(weight)
	}
}

/// Rejected layout input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
	/// Two vertices share an id.
	#[error("vertex `{0}` is listed twice")]
	DuplicateVertex(String),

	/// An edge endpoint is not in the vertex list.
	#[error("edge `{from}` -> `{to}` names an unknown vertex")]
	UnknownVertex { from: String, to: String },
}

/// Layout settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayeredLayout {
	/// In-level ordering rule.
	pub heuristic: OrderingHeuristic,
	/// Upper bound on full up-and-down sweeps.
	pub max_sweeps: usize,
}

impl Default for LayeredLayout {
	fn default() -> Self {
		Self {
			heuristic: OrderingHeuristic::default(),
			max_sweeps: DEFAULT_MAX_SWEEPS,
		}
	}
}

impl LayeredLayout {
	/// Default settings with the given heuristic.
	pub fn new(heuristic: OrderingHeuristic) -> Self {
		Self {
			heuristic,
			..Self::default()
		}
	}

	/// Assign every vertex a level and an order.
	pub fn layout(
		&self,
		vertices: &[Vertex],
		edges: &[LayoutEdge],
	) -> Result<LayeredGraph, LayoutError> {
		let mut id_to_idx = HashMap::with_capacity(vertices.len());
		for (i, vertex) in vertices.iter().enumerate() {
			if id_to_idx.insert(vertex.id.as_str(), i).is_some() {
				return Err(LayoutError::DuplicateVertex(vertex.id.clone()));
			}
		}

		let mut adjacency = vec![Vec::new(); vertices.len()];
		let mut kept_edges = Vec::with_capacity(edges.len());
		for edge in edges {
			let (Some(&src), Some(&tgt)) = (
				id_to_idx.get(edge.source.as_str()),
				id_to_idx.get(edge.target.as_str()),
			) else {
				return Err(LayoutError::UnknownVertex {
					from: edge.source.clone(),
					to: edge.target.clone(),
				});
			};
			if src == tgt {
				continue;
			}
			push_unique(&mut adjacency[src], tgt);
			kept_edges.push(edge.clone());
		}

		let (mut succ, post_order) = break_cycles(&adjacency);
		let mut level = assign_levels(&succ, &post_order);
		insert_dummies(&mut succ, &mut level);
		let mut map = LevelMap::new(succ, &level);

		let mut best = (map.crossings(), map.levels.clone());
		for sweep in 0..self.max_sweeps {
			if best.0 == 0 {
				break;
			}
			let mut down = true;
			for pass in 0..4 {
				// ties are flipped on the first two passes to shake loose equal weights
				map.reorder(self.heuristic, down, pass < 2);
				map.transpose();
				down = !down;
			}
			let crossings = map.crossings();
			debug!("layout sweep {sweep}: {crossings} crossings (best {})", best.0);
			if crossings >= best.0 {
				break;
			}
			best = (crossings, map.levels.clone());
		}

		let (crossings, levels) = best;
		let nodes = levels
			.iter()
			.enumerate()
			.flat_map(move |(lv, row)| {
				row.iter()
					.filter(move |&&v| v < vertices.len())
					.enumerate()
					.map(move |(order, &v)| LayoutNode {
						id: vertices[v].id.clone(),
						tag: vertices[v].tag.clone(),
						level: lv as u32,
						order: order as u32,
					})
			})
			.collect();

		Ok(LayeredGraph {
			nodes,
			edges: kept_edges,
			crossings,
		})
	}
}

fn push_unique(list: &mut Vec<usize>, v: usize) {
	if !list.contains(&v) {
		list.push(v);
	}
}

/// Depth-first walk that turns every edge into an edge of a DAG.
///
/// Returns the successor lists and the post-order of the walk.
fn break_cycles(adjacency: &[Vec<usize>]) -> (Vec<Vec<usize>>, Vec<usize>) {
	#[derive(Clone, Copy, PartialEq, Eq)]
	enum Mark {
		New,
		Open,
		Done,
	}

	let n = adjacency.len();
	let mut mark = vec![Mark::New; n];
	let mut succ = vec![Vec::new(); n];
	let mut post_order = Vec::with_capacity(n);

	for root in 0..n {
		if mark[root] != Mark::New {
			continue;
		}
		mark[root] = Mark::Open;
		let mut stack = vec![(root, 0usize)];
		while let Some((v, next)) = stack.last_mut() {
			let v = *v;
			if let Some(&w) = adjacency[v].get(*next) {
				*next += 1;
				if mark[w] == Mark::Open {
					// back edge
					push_unique(&mut succ[w], v);
				} else {
					push_unique(&mut succ[v], w);
					if mark[w] == Mark::New {
						mark[w] = Mark::Open;
						stack.push((w, 0));
					}
				}
			} else {
				mark[v] = Mark::Done;
				post_order.push(v);
				stack.pop();
			}
		}
	}

	(succ, post_order)
}

/// Longest path from the sources, then each vertex drops to just above its nearest successor.
fn assign_levels(succ: &[Vec<usize>], post_order: &[usize]) -> Vec<usize> {
	let mut level = vec![0; succ.len()];
	for &v in post_order.iter().rev() {
		for &w in &succ[v] {
			level[w] = level[w].max(level[v] + 1);
		}
	}
	for &v in post_order {
		if let Some(nearest) = succ[v].iter().map(|&w| level[w]).min() {
			level[v] = level[v].max(nearest - 1);
		}
	}
	level
}

/// Split every edge longer than one level with dummy vertices appended after the real ones.
fn insert_dummies(succ: &mut Vec<Vec<usize>>, level: &mut Vec<usize>) {
	for v in 0..succ.len() {
		let targets = std::mem::take(&mut succ[v]);
		for w in targets {
			let mut prev = v;
			for lv in level[v] + 1..level[w] {
				let dummy = succ.len();
				succ.push(Vec::new());
				level.push(lv);
				succ[prev].push(dummy);
				prev = dummy;
			}
			succ[prev].push(w);
		}
	}
}

struct LevelMap {
	succ: Vec<Vec<usize>>,
	pred: Vec<Vec<usize>>,
	levels: Vec<Vec<usize>>,
	pos: Vec<usize>,
}

impl LevelMap {
	fn new(succ: Vec<Vec<usize>>, level: &[usize]) -> Self {
		let n = succ.len();
		let mut pred = vec![Vec::new(); n];
		for (v, targets) in succ.iter().enumerate() {
			for &w in targets {
				pred[w].push(v);
			}
		}
		let depth = level.iter().map(|&l| l + 1).max().unwrap_or(0);
		let mut levels = vec![Vec::new(); depth];
		for (v, &l) in level.iter().enumerate() {
			levels[l].push(v);
		}
		let mut map = Self {
			succ,
			pred,
			levels,
			pos: vec![0; n],
		};
		for li in 0..depth {
			map.sync_positions(li);
		}
		map
	}

	fn sync_positions(&mut self, li: usize) {
		for (i, &v) in self.levels[li].iter().enumerate() {
			self.pos[v] = i;
		}
	}

	/// Crossings between level `li` and the one below it.
	fn crossings_below(&self, li: usize) -> usize {
		let Some(upper) = self.levels.get(li) else {
			return 0;
		};
		let mut count = 0;
		for (i, &a) in upper.iter().enumerate() {
			for &b in &upper[i + 1..] {
				for &c in &self.succ[a] {
					for &d in &self.succ[b] {
						if self.pos[c] > self.pos[d] {
							count += 1;
						}
					}
				}
			}
		}
		count
	}

	fn crossings_around(&self, li: usize) -> usize {
		li.checked_sub(1).map_or(0, |above| self.crossings_below(above)) + self.crossings_below(li)
	}

	fn crossings(&self) -> usize {
		(0..self.levels.len()).map(|li| self.crossings_below(li)).sum()
	}

	fn reorder(&mut self, heuristic: OrderingHeuristic, down: bool, flip_equal: bool) {
		let depth = self.levels.len();
		let sweep: Vec<usize> = if down {
			(1..depth).collect()
		} else {
			(0..depth.saturating_sub(1)).rev().collect()
		};

		for li in sweep {
			let fixed = if down { &self.pred } else { &self.succ };
			let weighted: Vec<(Option<f64>, usize)> = self.levels[li]
				.iter()
				.map(|&v| {
					let neighbors = fixed[v].iter().map(|&u| self.pos[u]).collect();
					(heuristic.weight(neighbors), v)
				})
				.collect();

			let mut movable: Vec<(f64, usize, usize)> = weighted
				.iter()
				.enumerate()
				.filter_map(|(i, &(w, v))| w.map(|w| (w, i, v)))
				.collect();
			movable.sort_by(|a, b| {
				let tie = if flip_equal { b.1.cmp(&a.1) } else { a.1.cmp(&b.1) };
				a.0.total_cmp(&b.0).then(tie)
			});

			let mut moved = movable.into_iter().map(|(_, _, v)| v);
			self.levels[li] = weighted
				.iter()
				.map(|&(w, v)| match w {
					Some(_) => moved.next().unwrap_or(v),
					None => v,
				})
				.collect();
			self.sync_positions(li);
		}
	}

	fn swap(&mut self, li: usize, i: usize) {
		self.levels[li].swap(i, i + 1);
		self.sync_positions(li);
	}

	/// Swap neighbors while that strictly lowers the local crossing count.
	fn transpose(&mut self) {
		let depth = self.levels.len();
		for _ in 0..depth * 4 + 4 {
			let mut improved = false;
			for li in 0..depth {
				for i in 0..self.levels[li].len().saturating_sub(1) {
					let before = self.crossings_around(li);
					self.swap(li, i);
					if self.crossings_around(li) < before {
						improved = true;
					} else {
						self.swap(li, i);
					}
				}
			}
			if !improved {
				break;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// ```text
	/// B C A
	/// |/ /
	/// D E F
	/// |/|\|
	/// G I H
	/// |  /|
	/// L K J
	/// ```
	fn twelve_vertex_graph() -> (Vec<Vertex>, Vec<LayoutEdge>) {
		let vertices = "abcdefghijkl".chars().map(Vertex::new).collect();
		let edges = [
			("a", "e"),
			("b", "d"),
			("c", "d"),
			("d", "g"),
			("e", "g"),
			("e", "h"),
			("e", "i"),
			("f", "h"),
			("g", "l"),
			("h", "k"),
			("h", "j"),
		]
		.into_iter()
		.map(|(s, t)| LayoutEdge::new(s, t))
		.collect();
		(vertices, edges)
	}

	/// `Some(true)` when `actual` equals one of `orders`, `Some(false)` when its mirror does.
	fn matches_order(actual: &[&str], orders: &[&str]) -> Option<bool> {
		let actual: String = actual.concat();
		let mirrored: String = actual.chars().rev().collect();
		if orders.contains(&actual.as_str()) {
			Some(true)
		} else if orders.contains(&mirrored.as_str()) {
			Some(false)
		} else {
			None
		}
	}

	fn assert_expected_layout(graph: &LayeredGraph) {
		for (lv, ids) in [(0, "abc"), (1, "def"), (2, "ghi"), (3, "jkl")] {
			for id in ids.chars() {
				assert_eq!(graph.node(&id.to_string()).map(|n| n.level), Some(lv), "{id}");
			}
		}
		assert_eq!(graph.crossings, 0);

		let sides: Vec<Option<bool>> = [
			(0, &["bca", "cba"][..]),
			(1, &["def"][..]),
			(2, &["gih"][..]),
			(3, &["lkj", "ljk"][..]),
		]
		.into_iter()
		.map(|(lv, orders)| matches_order(&graph.level(lv), orders))
		.collect();
		assert!(sides.iter().all(|s| s.is_some()), "inconsistent order: {graph:?}");
		assert!(
			sides.iter().all(|s| *s == sides[0]),
			"levels mirrored independently: {graph:?}"
		);
	}

	#[test]
	fn weighted_median_finds_crossing_free_order() {
		let (vertices, edges) = twelve_vertex_graph();
		let graph = LayeredLayout::new(OrderingHeuristic::WeightedMedian)
			.layout(&vertices, &edges)
			.unwrap();
		assert_expected_layout(&graph);
	}

	#[test]
	fn bary_center_finds_crossing_free_order() {
		let (vertices, edges) = twelve_vertex_graph();
		let graph = LayeredLayout::new(OrderingHeuristic::BaryCenter)
			.layout(&vertices, &edges)
			.unwrap();
		assert_expected_layout(&graph);
	}

	#[test]
	fn repeated_layouts_agree() {
		let (vertices, edges) = twelve_vertex_graph();
		let layout = LayeredLayout::default();
		let first = layout.layout(&vertices, &edges).unwrap();
		for _ in 0..16 {
			assert_eq!(layout.layout(&vertices, &edges).unwrap().nodes, first.nodes);
		}
	}

	#[test]
	fn reversed_input_still_untangles() {
		let (mut vertices, mut edges) = twelve_vertex_graph();
		vertices.reverse();
		edges.reverse();
		for heuristic in [OrderingHeuristic::WeightedMedian, OrderingHeuristic::BaryCenter] {
			let graph = LayeredLayout::new(heuristic)
				.layout(&vertices, &edges)
				.unwrap();
			assert_expected_layout(&graph);
		}
	}

	#[test]
	fn sources_fall_next_to_their_successors() {
		let vertices = ["a", "b", "c", "f"].map(Vertex::new);
		let edges = [("a", "b"), ("b", "c"), ("f", "c")].map(|(s, t)| LayoutEdge::new(s, t));
		let graph = LayeredLayout::default().layout(&vertices, &edges).unwrap();
		assert_eq!(graph.node("f").map(|n| n.level), Some(1));
		assert_eq!(graph.node("c").map(|n| n.level), Some(2));
	}

	#[test]
	fn long_edges_keep_levels_and_hide_dummies() {
		let vertices = ["a", "b", "c", "d"].map(Vertex::new);
		let edges = [("a", "b"), ("b", "c"), ("a", "c"), ("c", "d"), ("a", "d")]
			.map(|(s, t)| LayoutEdge::new(s, t));
		let graph = LayeredLayout::default().layout(&vertices, &edges).unwrap();
		assert_eq!(graph.nodes.len(), 4);
		assert_eq!(graph.depth(), 4);
		assert_eq!(graph.crossings, 0);
		assert!(graph.nodes.iter().all(|n| n.order == 0));
	}

	#[test]
	fn cycles_are_broken() {
		let vertices = ["x", "y", "z"].map(Vertex::new);
		let edges = [("x", "y"), ("y", "z"), ("z", "x"), ("x", "x")]
			.map(|(s, t)| LayoutEdge::new(s, t));
		let graph = LayeredLayout::default().layout(&vertices, &edges).unwrap();
		assert_eq!(graph.level(0), ["x"]);
		assert_eq!(graph.level(1), ["y"]);
		assert_eq!(graph.level(2), ["z"]);
		assert_eq!(graph.edges.len(), 3);
	}

	#[test]
	fn empty_graph_has_no_levels() {
		let graph = LayeredLayout::default().layout(&[], &[]).unwrap();
		assert_eq!(graph.depth(), 0);
		assert_eq!(graph.crossings, 0);
	}

	#[test]
	fn unknown_and_duplicate_vertices_are_rejected() {
		let vertices = [Vertex::new("a"), Vertex::new("a")];
		assert_eq!(
			LayeredLayout::default().layout(&vertices, &[]).unwrap_err(),
			LayoutError::DuplicateVertex("a".into())
		);
		assert_eq!(
			LayeredLayout::default()
				.layout(&vertices[..1], &[LayoutEdge::new("a", "q")])
				.unwrap_err(),
			LayoutError::UnknownVertex {
				from: "a".into(),
				to: "q".into()
			}
		);
	}

	#[test]
	fn weights_follow_neighbor_positions() {
		assert_eq!(OrderingHeuristic::BaryCenter.weight(vec![]), None);
		assert_eq!(OrderingHeuristic::BaryCenter.weight(vec![0, 3]), Some(1.5));
		assert_eq!(OrderingHeuristic::WeightedMedian.weight(vec![4, 0, 2]), Some(2.0));
		assert_eq!(OrderingHeuristic::WeightedMedian.weight(vec![1, 3]), Some(2.0));
		// left gap 1, right gap 3: pulled toward the packed left median
		assert_eq!(OrderingHeuristic::WeightedMedian.weight(vec![0, 1, 2, 5]), Some(1.25));
	}
}
