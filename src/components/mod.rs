pub mod hover_label;
pub mod layered_graph;
