//! Rank direction handling.
//!
//! Every phase assumes ranks grow downwards. Horizontal layouts swap node extents up front, and
//! `undo` maps the finished top-to-bottom drawing back onto the requested direction.

use crate::graphlib::Graph;
use crate::{EdgeLabel, GraphLabel, NodeLabel, RankDir};

pub fn adjust(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    if g.graph().rankdir.is_horizontal() {
        swap_width_height(g);
    }
}

pub fn undo(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    let rankdir = g.graph().rankdir;
    if matches!(rankdir, RankDir::BT | RankDir::RL) {
        reverse_y(g);
    }
    if rankdir.is_horizontal() {
        swap_xy(g);
        swap_width_height(g);
    }
}

fn swap_width_height(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    g.for_each_node_mut(|_id, n| {
        (n.width, n.height) = (n.height, n.width);
    });
}

fn reverse_y(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    g.for_each_node_mut(|_id, n| {
        if let Some(y) = n.y.as_mut() {
            *y = -*y;
        }
    });
    g.for_each_edge_mut(|_ek, e| {
        for p in &mut e.points {
            p.y = -p.y;
        }
    });
}

fn swap_xy(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    g.for_each_node_mut(|_id, n| {
        if let (Some(x), Some(y)) = (n.x, n.y) {
            n.x = Some(y);
            n.y = Some(x);
        }
    });
    g.for_each_edge_mut(|_ek, e| {
        for p in &mut e.points {
            (p.x, p.y) = (p.y, p.x);
        }
    });
}
