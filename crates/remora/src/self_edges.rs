//! Self loops are taken out before ranking and come back as a placeholder node placed right of
//! their owner, which reserves horizontal room during positioning. The loop is then drawn as a
//! five point hook around the owner's right side.

use crate::graphlib::Graph;
use crate::{Dummy, EdgeLabel, GraphLabel, NodeLabel, Point, SelfEdge};

pub fn remove_self_edges(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    for ek in g.edge_keys() {
        if !ek.is_self_loop() {
            continue;
        }
        let Some(label) = g.edge_by_key(&ek).cloned() else {
            continue;
        };
        let _ = g.remove_edge_key(&ek);
        if let Some(n) = g.node_mut(&ek.v) {
            n.self_edges.push(SelfEdge { edge_obj: ek, label });
        }
    }
}

/// Inserts one placeholder per removed loop directly after its owner in the same rank.
pub fn insert_self_edges(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    let layering = crate::util::build_layer_matrix(g);
    for layer in layering {
        let mut extra: usize = 0;
        for (idx, node_id) in layer.iter().enumerate() {
            let Some(node) = g.node_mut(node_id) else {
                continue;
            };
            node.order = Some(idx + extra);
            let Some(rank) = node.rank else {
                continue;
            };
            let self_edges = std::mem::take(&mut node.self_edges);

            for se in self_edges {
                extra += 1;
                let id = placeholder_id(g, node_id);
                g.set_node(
                    id,
                    NodeLabel {
                        rank: Some(rank),
                        order: Some(idx + extra),
                        dummy: Some(Dummy::SelfEdge),
                        edge_label: Some(se.label),
                        edge_obj: Some(se.edge_obj),
                        ..Default::default()
                    },
                );
            }
        }
    }
}

fn placeholder_id(g: &Graph<NodeLabel, EdgeLabel, GraphLabel>, owner: &str) -> String {
    let mut i = 0usize;
    loop {
        let id = format!("_se_{owner}_{i}");
        if !g.has_node(&id) {
            return id;
        }
        i += 1;
    }
}

pub fn position_self_edges(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    for id in g.node_ids() {
        let Some(node) = g.node(&id) else {
            continue;
        };
        if node.dummy != Some(Dummy::SelfEdge) {
            continue;
        }
        let (Some(x), Some(edge_obj), Some(mut label)) =
            (node.x, node.edge_obj.clone(), node.edge_label.clone())
        else {
            continue;
        };
        let Some(owner) = g.node(&edge_obj.v) else {
            continue;
        };
        let (Some(ox), Some(oy)) = (owner.x, owner.y) else {
            continue;
        };

        let right = ox + owner.width / 2.0;
        let dx = x - right;
        let dy = owner.height / 2.0;
        label.points = vec![
            Point {
                x: right + 2.0 * dx / 3.0,
                y: oy - dy,
            },
            Point {
                x: right + 5.0 * dx / 6.0,
                y: oy - dy,
            },
            Point { x: right + dx, y: oy },
            Point {
                x: right + 5.0 * dx / 6.0,
                y: oy + dy,
            },
            Point {
                x: right + 2.0 * dx / 3.0,
                y: oy + dy,
            },
        ];

        let _ = g.remove_node(&id);
        g.set_edge_key(edge_obj, label);
    }
}
