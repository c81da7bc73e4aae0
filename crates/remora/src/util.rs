//! Small helpers shared across layout phases.

use crate::graphlib::{Graph, GraphOptions};
use crate::{EdgeLabel, GraphLabel, NodeLabel, Point};
use std::collections::BTreeMap;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Center.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Point where the segment from the center of `rect` towards `point` leaves the rectangle.
///
/// A `point` that coincides with the center yields the center itself.
pub fn intersect_rect(rect: Rect, point: Point) -> Point {
    let dx = point.x - rect.x;
    let dy = point.y - rect.y;
    if dx == 0.0 && dy == 0.0 {
        return Point {
            x: rect.x,
            y: rect.y,
        };
    }

    let mut w = rect.width / 2.0;
    let mut h = rect.height / 2.0;
    let (sx, sy) = if dy.abs() * w > dx.abs() * h {
        if dy < 0.0 {
            h = -h;
        }
        (h * dx / dy, h)
    } else {
        if dx < 0.0 {
            w = -w;
        }
        (w, w * dy / dx)
    };

    Point {
        x: rect.x + sx,
        y: rect.y + sy,
    }
}

/// Collapses a multigraph into a simple graph: parallel edges sum their weights and keep the
/// largest `minlen`.
pub fn simplify(
    g: &Graph<NodeLabel, EdgeLabel, GraphLabel>,
) -> Graph<NodeLabel, EdgeLabel, GraphLabel> {
    let mut simplified: Graph<NodeLabel, EdgeLabel, GraphLabel> =
        Graph::new(GraphOptions { multigraph: false });
    simplified.set_graph(g.graph().clone());
    g.for_each_node(|v, lbl| {
        simplified.set_node(v, lbl.clone());
    });

    for e in g.edges() {
        let lbl = g.edge_by_key(e).cloned().unwrap_or_default();
        let merged = match simplified.edge(&e.v, &e.w, None) {
            Some(prev) => EdgeLabel {
                weight: prev.weight + lbl.weight,
                minlen: prev.minlen.max(lbl.minlen),
                ..Default::default()
            },
            None => EdgeLabel {
                weight: lbl.weight,
                minlen: lbl.minlen,
                ..Default::default()
            },
        };
        simplified.set_edge_with_label(e.v.clone(), e.w.clone(), merged);
    }

    simplified
}

/// Node ids grouped by rank (index = rank) and sorted by `order` inside each rank.
pub fn build_layer_matrix(g: &Graph<NodeLabel, EdgeLabel, GraphLabel>) -> Vec<Vec<String>> {
    let mut by_rank: BTreeMap<i32, Vec<(usize, String)>> = BTreeMap::new();
    g.for_each_node(|id, n| {
        let Some(rank) = n.rank else {
            return;
        };
        by_rank
            .entry(rank)
            .or_default()
            .push((n.order.unwrap_or(usize::MAX), id.to_string()));
    });

    let Some(&max_rank) = by_rank.keys().next_back() else {
        return Vec::new();
    };
    let mut layers: Vec<Vec<String>> = vec![Vec::new(); (max_rank.max(0) + 1) as usize];
    for (rank, mut entries) in by_rank {
        if rank < 0 {
            continue;
        }
        entries.sort_by_key(|(order, _)| *order);
        layers[rank as usize] = entries.into_iter().map(|(_, id)| id).collect();
    }
    layers
}

/// Shifts ranks so the smallest one is `0`.
pub fn normalize_ranks(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    let mut min_rank = i32::MAX;
    g.for_each_node(|_id, n| {
        if let Some(rank) = n.rank {
            min_rank = min_rank.min(rank);
        }
    });
    if min_rank == i32::MAX {
        return;
    }
    g.for_each_node_mut(|_id, n| {
        if let Some(rank) = n.rank.as_mut() {
            *rank -= min_rank;
        }
    });
}

pub fn max_rank(g: &Graph<NodeLabel, EdgeLabel, GraphLabel>) -> Option<i32> {
    let mut max: Option<i32> = None;
    g.for_each_node(|_id, n| {
        if let Some(rank) = n.rank {
            max = Some(max.map_or(rank, |m| m.max(rank)));
        }
    });
    max
}

/// Runs `f`, and when `enabled` reports its duration on stderr.
pub fn time<T>(enabled: bool, name: &str, f: impl FnOnce() -> T) -> T {
    if !enabled {
        return f();
    }
    let start = Instant::now();
    let out = f();
    eprintln!("{name} time: {:?}", start.elapsed());
    out
}
