//! Traversal helpers shared by the layout phases.

use super::Graph;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Depth-first preorder over successors, starting from each root in turn.
pub fn preorder<N, E, G>(g: &Graph<N, E, G>, roots: &[&str]) -> Vec<String>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut out: Vec<String> = Vec::new();
    for &root in roots {
        let mut stack: Vec<&str> = vec![root];
        while let Some(v) = stack.pop() {
            if !g.has_node(v) || !visited.insert(v) {
                continue;
            }
            out.push(v.to_string());
            // Reverse so the first successor is visited first.
            for w in g.successors(v).into_iter().rev() {
                if !visited.contains(w) {
                    stack.push(w);
                }
            }
        }
    }
    out
}

/// Depth-first postorder over successors, starting from each root in turn.
pub fn postorder<N, E, G>(g: &Graph<N, E, G>, roots: &[&str]) -> Vec<String>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut out: Vec<String> = Vec::new();
    for &root in roots {
        if !g.has_node(root) || !visited.insert(root) {
            continue;
        }
        // (node, successors, next successor index)
        let mut stack: Vec<(&str, Vec<&str>, usize)> = vec![(root, g.successors(root), 0)];
        while let Some(top) = stack.last_mut() {
            if top.2 < top.1.len() {
                let w = top.1[top.2];
                top.2 += 1;
                if visited.insert(w) {
                    stack.push((w, g.successors(w), 0));
                }
                continue;
            }
            out.push(top.0.to_string());
            stack.pop();
        }
    }
    out
}

/// Weakly connected components, each listed in discovery order.
pub fn components<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut out: Vec<Vec<String>> = Vec::new();

    for start in g.nodes() {
        if !seen.insert(start) {
            continue;
        }
        let mut comp: Vec<String> = Vec::new();
        let mut q: VecDeque<&str> = VecDeque::new();
        q.push_back(start);
        while let Some(v) = q.pop_front() {
            comp.push(v.to_string());
            for n in g.neighbors(v) {
                if seen.insert(n) {
                    q.push_back(n);
                }
            }
        }
        out.push(comp);
    }

    out
}
