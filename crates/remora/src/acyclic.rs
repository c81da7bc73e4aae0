//! Break cycles by reversing a depth-first feedback arc set.
//!
//! Reversed edges are renamed `rev{n}` and remember their original name, so `undo` can restore
//! them (with their polyline flipped back to the original direction).

use crate::graphlib::{EdgeKey, Graph};
use crate::{EdgeLabel, GraphLabel, NodeLabel};
use rustc_hash::FxHashSet;

pub fn run(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    for e in dfs_fas(g) {
        let Some(mut label) = g.edge_by_key(&e).cloned() else {
            continue;
        };
        let _ = g.remove_edge_key(&e);

        label.forward_name = e.name.clone();
        label.reversed = true;

        let name = unique_rev_name(g, &e.w, &e.v);
        g.set_edge_named(e.w, e.v, Some(name), Some(label));
    }
}

pub fn undo(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    for e in g.edge_keys() {
        let Some(mut label) = g.edge_by_key(&e).filter(|l| l.reversed).cloned() else {
            continue;
        };
        let _ = g.remove_edge_key(&e);

        let forward_name = label.forward_name.take();
        label.reversed = false;
        label.points.reverse();
        g.set_edge_named(e.w, e.v, forward_name, Some(label));
    }
}

fn unique_rev_name(g: &Graph<NodeLabel, EdgeLabel, GraphLabel>, v: &str, w: &str) -> String {
    let mut i = 1usize;
    loop {
        let candidate = format!("rev{i}");
        if !g.has_edge(v, w, Some(&candidate)) {
            return candidate;
        }
        i += 1;
    }
}

/// Back edges found by a DFS started from every node in insertion order. Self loops are skipped.
fn dfs_fas(g: &Graph<NodeLabel, EdgeLabel, GraphLabel>) -> Vec<EdgeKey> {
    let mut fas: Vec<EdgeKey> = Vec::new();
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut on_stack: FxHashSet<&str> = FxHashSet::default();

    for root in g.nodes() {
        if !visited.insert(root) {
            continue;
        }
        on_stack.insert(root);
        // (node, out edges, next edge index)
        let mut stack: Vec<(&str, Vec<EdgeKey>, usize)> = vec![(root, g.out_edges(root, None), 0)];
        while let Some(top) = stack.last_mut() {
            if top.2 >= top.1.len() {
                on_stack.remove(top.0);
                stack.pop();
                continue;
            }
            let e = top.1[top.2].clone();
            top.2 += 1;
            if e.is_self_loop() {
                continue;
            }
            let Some(w) = g.node_key(&e.w) else {
                continue;
            };
            if on_stack.contains(w) {
                fas.push(e);
            } else if visited.insert(w) {
                on_stack.insert(w);
                stack.push((w, g.out_edges(w, None), 0));
            }
        }
    }
    fas
}
