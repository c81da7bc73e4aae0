//! The layout pipeline.
//!
//! The input graph is copied into a private multigraph so phases can add dummy nodes and
//! reversed edges freely; only coordinates, edge points, and the graph size are written back.
//! Set `REMORA_TIMING=1` to print per-phase timings to stderr.

use crate::graphlib::{Graph, GraphOptions};
use crate::util::{Rect, intersect_rect, time};
use crate::{
    EdgeLabel, GraphLabel, NodeLabel, Point, acyclic, coordinate_system, normalize, order,
    position, rank, self_edges, util,
};

pub fn layout(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    let timing = std::env::var("REMORA_TIMING")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    time(timing, "layout", || {
        let mut lg = time(timing, "  buildLayoutGraph", || build_layout_graph(g));
        time(timing, "  runLayout", || run_layout(&mut lg, timing));
        time(timing, "  updateInputGraph", || update_input_graph(g, &lg));
    });
}

fn run_layout(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>, timing: bool) {
    time(timing, "    removeSelfEdges", || self_edges::remove_self_edges(g));
    time(timing, "    acyclic", || acyclic::run(g));
    time(timing, "    rank", || rank::rank(g));
    time(timing, "    normalizeRanks", || util::normalize_ranks(g));
    time(timing, "    normalize", || normalize::run(g));
    time(timing, "    order", || order::order(g));
    time(timing, "    insertSelfEdges", || self_edges::insert_self_edges(g));
    time(timing, "    adjustCoordinateSystem", || coordinate_system::adjust(g));
    time(timing, "    position", || position::position(g));
    time(timing, "    positionSelfEdges", || self_edges::position_self_edges(g));
    time(timing, "    normalize.undo", || normalize::undo(g));
    time(timing, "    undoCoordinateSystem", || coordinate_system::undo(g));
    time(timing, "    translateGraph", || translate_graph(g));
    time(timing, "    assignNodeIntersects", || assign_node_intersects(g));
    time(timing, "    acyclic.undo", || acyclic::undo(g));
}

fn build_layout_graph(
    input: &Graph<NodeLabel, EdgeLabel, GraphLabel>,
) -> Graph<NodeLabel, EdgeLabel, GraphLabel> {
    let mut g: Graph<NodeLabel, EdgeLabel, GraphLabel> =
        Graph::new(GraphOptions { multigraph: true });
    g.set_graph(GraphLabel {
        dummy_chains: Vec::new(),
        width: 0.0,
        height: 0.0,
        ..input.graph().clone()
    });

    input.for_each_node(|v, n| {
        g.set_node(
            v,
            NodeLabel {
                width: finite_or_zero(n.width),
                height: finite_or_zero(n.height),
                ..Default::default()
            },
        );
    });
    input.for_each_edge(|e, lbl| {
        g.set_edge_named(
            e.v.clone(),
            e.w.clone(),
            e.name.clone(),
            Some(EdgeLabel {
                minlen: lbl.minlen,
                weight: finite_or_zero(lbl.weight),
                ..Default::default()
            }),
        );
    });
    g
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

fn update_input_graph(
    input: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>,
    g: &Graph<NodeLabel, EdgeLabel, GraphLabel>,
) {
    input.for_each_node_mut(|v, n| {
        let Some(laid_out) = g.node(v) else {
            return;
        };
        n.x = laid_out.x;
        n.y = laid_out.y;
        n.rank = laid_out.rank;
        n.order = laid_out.order;
    });
    input.for_each_edge_mut(|e, lbl| {
        if let Some(laid_out) = g.edge(&e.v, &e.w, e.name.as_deref()) {
            lbl.points = laid_out.points.clone();
        }
    });
    let graph = g.graph();
    let (width, height) = (graph.width, graph.height);
    let out = input.graph_mut();
    out.width = width;
    out.height = height;
}

/// Moves the drawing so its top-left extent sits at `(marginx, marginy)` and records the size.
fn translate_graph(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    g.for_each_node(|_v, n| {
        let (Some(x), Some(y)) = (n.x, n.y) else {
            return;
        };
        min_x = min_x.min(x - n.width / 2.0);
        max_x = max_x.max(x + n.width / 2.0);
        min_y = min_y.min(y - n.height / 2.0);
        max_y = max_y.max(y + n.height / 2.0);
    });
    g.for_each_edge(|_e, lbl| {
        for p in &lbl.points {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
    });

    let margin_x = g.graph().marginx;
    let margin_y = g.graph().marginy;
    if !min_x.is_finite() || !min_y.is_finite() {
        let graph = g.graph_mut();
        graph.width = 2.0 * margin_x;
        graph.height = 2.0 * margin_y;
        return;
    }

    let dx = margin_x - min_x;
    let dy = margin_y - min_y;
    g.for_each_node_mut(|_v, n| {
        if let (Some(x), Some(y)) = (n.x, n.y) {
            n.x = Some(x + dx);
            n.y = Some(y + dy);
        }
    });
    g.for_each_edge_mut(|_e, lbl| {
        for p in &mut lbl.points {
            p.x += dx;
            p.y += dy;
        }
    });

    let graph = g.graph_mut();
    graph.width = max_x - min_x + 2.0 * margin_x;
    graph.height = max_y - min_y + 2.0 * margin_y;
}

/// Clips both ends of every edge polyline to the border of its endpoint nodes.
fn assign_node_intersects(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    for e in g.edge_keys() {
        let (Some(v), Some(w)) = (node_rect(g, &e.v), node_rect(g, &e.w)) else {
            continue;
        };
        let Some(lbl) = g.edge_mut_by_key(&e) else {
            continue;
        };
        let (toward_v, toward_w) = match (lbl.points.first(), lbl.points.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => (Point { x: w.x, y: w.y }, Point { x: v.x, y: v.y }),
        };
        lbl.points.insert(0, intersect_rect(v, toward_v));
        lbl.points.push(intersect_rect(w, toward_w));
    }
}

fn node_rect(g: &Graph<NodeLabel, EdgeLabel, GraphLabel>, v: &str) -> Option<Rect> {
    let n = g.node(v)?;
    Some(Rect {
        x: n.x?,
        y: n.y?,
        width: n.width,
        height: n.height,
    })
}
