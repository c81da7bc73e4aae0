//! Coordinate assignment.
//!
//! `y` comes from stacking ranks (each rank as tall as its tallest node, separated by `ranksep`);
//! `x` comes from Brandes-Köpf compaction.

use crate::graphlib::Graph;
use crate::{EdgeLabel, GraphLabel, NodeLabel};

pub mod bk;

pub fn position(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    position_y(g);
    for (v, x) in bk::position_x(g) {
        if let Some(n) = g.node_mut(&v) {
            n.x = Some(x);
        }
    }
}

fn position_y(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    let layering = crate::util::build_layer_matrix(g);
    let rank_sep = g.graph().ranksep;
    let mut prev_y = 0.0;
    for layer in &layering {
        let max_height = layer
            .iter()
            .filter_map(|v| g.node(v))
            .map(|n| n.height)
            .fold(0.0, f64::max);
        for v in layer {
            if let Some(n) = g.node_mut(v) {
                n.y = Some(prev_y + max_height / 2.0);
            }
        }
        prev_y += max_height + rank_sep;
    }
}
