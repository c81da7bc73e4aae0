//! Split edges spanning several ranks into chains of dummy nodes.
//!
//! After `run`, every edge connects adjacent ranks, which ordering and positioning rely on.
//! `undo` removes the chains again and turns the dummy centers into edge bend points.

use crate::graphlib::{EdgeKey, Graph};
use crate::{Dummy, EdgeLabel, GraphLabel, NodeLabel, Point};

pub fn run(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    g.graph_mut().dummy_chains.clear();
    for e in g.edge_keys() {
        normalize_edge(g, e);
    }
}

fn normalize_edge(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>, e: EdgeKey) {
    let v_rank = g.node(&e.v).and_then(|n| n.rank).unwrap_or(0);
    let w_rank = g.node(&e.w).and_then(|n| n.rank).unwrap_or(0);
    if w_rank <= v_rank + 1 {
        return;
    }
    let Some(mut edge_label) = g.edge_by_key(&e).cloned() else {
        return;
    };
    let _ = g.remove_edge_key(&e);
    edge_label.points.clear();

    let mut prev = e.v.clone();
    for r in v_rank + 1..w_rank {
        let dummy = next_dummy_id(g);
        g.set_node(
            dummy.clone(),
            NodeLabel {
                rank: Some(r),
                dummy: Some(Dummy::Edge),
                edge_label: Some(edge_label.clone()),
                edge_obj: Some(e.clone()),
                ..Default::default()
            },
        );
        if r == v_rank + 1 {
            g.graph_mut().dummy_chains.push(dummy.clone());
        }
        g.set_edge_named(
            prev,
            dummy.clone(),
            e.name.clone(),
            Some(EdgeLabel {
                weight: edge_label.weight,
                ..Default::default()
            }),
        );
        prev = dummy;
    }

    g.set_edge_named(
        prev,
        e.w.clone(),
        e.name.clone(),
        Some(EdgeLabel {
            weight: edge_label.weight,
            ..Default::default()
        }),
    );
}

fn next_dummy_id(g: &Graph<NodeLabel, EdgeLabel, GraphLabel>) -> String {
    let mut i = g.node_count();
    loop {
        let id = format!("_d{i}");
        if !g.has_node(&id) {
            return id;
        }
        i += 1;
    }
}

pub fn undo(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    let chains = std::mem::take(&mut g.graph_mut().dummy_chains);
    for start in chains {
        let Some(start_node) = g.node(&start) else {
            continue;
        };
        let (Some(mut orig_label), Some(edge_obj)) =
            (start_node.edge_label.clone(), start_node.edge_obj.clone())
        else {
            continue;
        };

        let mut v = start;
        loop {
            let Some(node) = g.node(&v) else {
                break;
            };
            if node.dummy.is_none() {
                break;
            }
            if let (Some(x), Some(y)) = (node.x, node.y) {
                orig_label.points.push(Point { x, y });
            }
            let next = g.successors(&v).first().map(|s| s.to_string());
            let _ = g.remove_node(&v);
            let Some(next) = next else {
                break;
            };
            v = next;
        }

        g.set_edge_key(edge_obj, orig_label);
    }
}
