//! Brandes-Köpf horizontal coordinate assignment.
//!
//! Four alignments are computed (upper/lower neighbors crossed with left/right scan order), the
//! narrowest one becomes the reference, and every node finally takes the mean of its two median
//! candidate coordinates (or the coordinate of a fixed alignment when one is requested).

use crate::graphlib::{Graph, GraphOptions};
use crate::{Align, EdgeLabel, GraphLabel, NodeLabel};
use rustc_hash::{FxHashMap, FxHashSet};

/// Unordered node pairs whose segments must not be aligned.
pub type Conflicts = FxHashSet<(String, String)>;

pub fn add_conflict(conflicts: &mut Conflicts, v: &str, w: &str) {
    let (v, w) = if v <= w { (v, w) } else { (w, v) };
    conflicts.insert((v.to_string(), w.to_string()));
}

pub fn has_conflict(conflicts: &Conflicts, v: &str, w: &str) -> bool {
    let (v, w) = if v <= w { (v, w) } else { (w, v) };
    conflicts.contains(&(v.to_string(), w.to_string()))
}

fn is_dummy(g: &Graph<NodeLabel, EdgeLabel, GraphLabel>, v: &str) -> bool {
    g.node(v).is_some_and(|n| n.dummy.is_some())
}

/// Type-1 conflicts: a non-inner segment crossing an inner segment (one between two dummies).
/// Inner segments win, so long edges stay straight.
pub fn find_type1_conflicts(
    g: &Graph<NodeLabel, EdgeLabel, GraphLabel>,
    layering: &[Vec<String>],
) -> Conflicts {
    let mut conflicts = Conflicts::default();

    for pair in layering.windows(2) {
        let (prev_layer, layer) = (&pair[0], &pair[1]);
        let mut k0: usize = 0;
        let mut scan_pos: usize = 0;
        let last = layer.len().saturating_sub(1);

        for (idx, v) in layer.iter().enumerate() {
            let inner = if is_dummy(g, v) {
                g.predecessors(v).into_iter().find(|u| is_dummy(g, u))
            } else {
                None
            };
            let k1 = inner
                .and_then(|w| g.node(w))
                .and_then(|n| n.order)
                .unwrap_or(prev_layer.len());

            if inner.is_none() && idx != last {
                continue;
            }
            for scan_node in &layer[scan_pos..=idx] {
                for u in g.predecessors(scan_node) {
                    let u_pos = g.node(u).and_then(|n| n.order).unwrap_or(0);
                    if (u_pos < k0 || k1 < u_pos) && !(is_dummy(g, u) && is_dummy(g, scan_node))
                    {
                        add_conflict(&mut conflicts, u, scan_node);
                    }
                }
            }
            scan_pos = idx + 1;
            k0 = k1;
        }
    }

    conflicts
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Alignment {
    /// Block root of every node.
    pub root: FxHashMap<String, String>,
    /// Next node in the block (cyclic, the last node points back at the root).
    pub align: FxHashMap<String, String>,
}

pub fn vertical_alignment<F>(
    layering: &[Vec<String>],
    conflicts: &Conflicts,
    neighbors: F,
) -> Alignment
where
    F: Fn(&str) -> Vec<String>,
{
    let mut alignment = Alignment::default();
    let mut pos: FxHashMap<&str, usize> = FxHashMap::default();
    for layer in layering {
        for (order, v) in layer.iter().enumerate() {
            alignment.root.insert(v.clone(), v.clone());
            alignment.align.insert(v.clone(), v.clone());
            pos.insert(v.as_str(), order);
        }
    }

    for layer in layering {
        let mut prev_idx: Option<usize> = None;
        for v in layer {
            let mut ws = neighbors(v);
            if ws.is_empty() {
                continue;
            }
            ws.sort_by_key(|w| pos.get(w.as_str()).copied().unwrap_or(usize::MAX));

            let lo = (ws.len() - 1) / 2;
            let hi = ws.len() / 2;
            for w in &ws[lo..=hi] {
                let Some(&w_pos) = pos.get(w.as_str()) else {
                    continue;
                };
                let unaligned = alignment.align.get(v) == Some(v);
                if unaligned
                    && prev_idx.is_none_or(|p| p < w_pos)
                    && !has_conflict(conflicts, v, w)
                {
                    let w_root = alignment.root.get(w).cloned().unwrap_or_else(|| w.clone());
                    alignment.align.insert(w.clone(), v.clone());
                    alignment.align.insert(v.clone(), w_root.clone());
                    alignment.root.insert(v.clone(), w_root);
                    prev_idx = Some(w_pos);
                }
            }
        }
    }

    alignment
}

/// Minimum distance between the centers of neighbors `v` and `u` in one layer.
fn sep(g: &Graph<NodeLabel, EdgeLabel, GraphLabel>, v: &str, u: &str) -> f64 {
    let graph = g.graph();
    let half = |id: &str| {
        let Some(n) = g.node(id) else {
            return graph.nodesep / 2.0;
        };
        let gap = if n.dummy.is_some() {
            graph.edgesep
        } else {
            graph.nodesep
        };
        n.width / 2.0 + gap / 2.0
    };
    half(v) + half(u)
}

fn build_block_graph(
    g: &Graph<NodeLabel, EdgeLabel, GraphLabel>,
    layering: &[Vec<String>],
    root: &FxHashMap<String, String>,
) -> Graph<(), f64, ()> {
    let mut block_graph: Graph<(), f64, ()> = Graph::new(GraphOptions::default());
    for layer in layering {
        let mut prev: Option<&str> = None;
        for v in layer {
            let v_root = root.get(v).cloned().unwrap_or_else(|| v.clone());
            block_graph.ensure_node(v_root.clone());
            if let Some(u) = prev {
                let u_root = root.get(u).cloned().unwrap_or_else(|| u.to_string());
                let prev_max = block_graph
                    .edge(&u_root, &v_root, None)
                    .copied()
                    .unwrap_or(0.0);
                block_graph.set_edge_with_label(u_root, v_root, sep(g, v, u).max(prev_max));
            }
            prev = Some(v);
        }
    }
    block_graph
}

/// Post-order style walk over the block graph: a node is assigned once everything returned by
/// `next` has been visited.
fn iterate_blocks(
    block_graph: &Graph<(), f64, ()>,
    mut assign: impl FnMut(&str),
    next: impl Fn(&str) -> Vec<String>,
) {
    let mut stack: Vec<String> = block_graph.node_ids();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    while let Some(elem) = stack.pop() {
        if visited.contains(&elem) {
            assign(&elem);
            continue;
        }
        visited.insert(elem.clone());
        let successors = next(&elem);
        stack.push(elem);
        stack.extend(successors);
    }
}

pub fn horizontal_compaction(
    g: &Graph<NodeLabel, EdgeLabel, GraphLabel>,
    layering: &[Vec<String>],
    alignment: &Alignment,
) -> FxHashMap<String, f64> {
    let block_graph = build_block_graph(g, layering, &alignment.root);
    let mut xs: FxHashMap<String, f64> = FxHashMap::default();

    // Smallest coordinates allowed by the blocks on the left.
    iterate_blocks(
        &block_graph,
        |elem| {
            let x = block_graph
                .in_edges(elem, None)
                .iter()
                .map(|e| {
                    let sep = block_graph.edge_by_key(e).copied().unwrap_or(0.0);
                    xs.get(&e.v).copied().unwrap_or(0.0) + sep
                })
                .fold(0.0, f64::max);
            xs.insert(elem.to_string(), x);
        },
        |elem| {
            block_graph
                .predecessors(elem)
                .into_iter()
                .map(str::to_string)
                .collect()
        },
    );

    // Pull blocks right towards their right neighbors where there is slack.
    iterate_blocks(
        &block_graph,
        |elem| {
            let min = block_graph
                .out_edges(elem, None)
                .iter()
                .map(|e| {
                    let sep = block_graph.edge_by_key(e).copied().unwrap_or(0.0);
                    xs.get(&e.w).copied().unwrap_or(0.0) - sep
                })
                .fold(f64::INFINITY, f64::min);
            if min.is_finite() {
                let cur = xs.get(elem).copied().unwrap_or(0.0);
                xs.insert(elem.to_string(), cur.max(min));
            }
        },
        |elem| {
            block_graph
                .successors(elem)
                .into_iter()
                .map(str::to_string)
                .collect()
        },
    );

    alignment
        .align
        .keys()
        .map(|v| {
            let root = alignment.root.get(v).unwrap_or(v);
            (v.clone(), xs.get(root).copied().unwrap_or(0.0))
        })
        .collect()
}

/// Alignment with the smallest overall extent (node widths included). Ties keep the earlier one.
pub fn find_smallest_width_alignment(
    g: &Graph<NodeLabel, EdgeLabel, GraphLabel>,
    xss: &[FxHashMap<String, f64>; 4],
) -> usize {
    let mut best = 0;
    let mut best_width = f64::INFINITY;
    for (i, xs) in xss.iter().enumerate() {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (v, x) in xs {
            let half = g.node(v).map(|n| n.width / 2.0).unwrap_or(0.0);
            min = min.min(x - half);
            max = max.max(x + half);
        }
        let width = max - min;
        if width < best_width {
            best_width = width;
            best = i;
        }
    }
    best
}

/// Shifts left alignments onto the reference's minimum and right alignments onto its maximum.
pub fn align_coordinates(xss: &mut [FxHashMap<String, f64>; 4], reference: usize) {
    let (align_min, align_max) = min_max(&xss[reference]);
    for (i, xs) in xss.iter_mut().enumerate() {
        if xs.is_empty() {
            continue;
        }
        let (xs_min, xs_max) = min_max(xs);
        // Order is ul, ur, dl, dr.
        let delta = if i % 2 == 0 {
            align_min - xs_min
        } else {
            align_max - xs_max
        };
        if delta != 0.0 {
            xs.values_mut().for_each(|x| *x += delta);
        }
    }
}

fn min_max(xs: &FxHashMap<String, f64>) -> (f64, f64) {
    xs.values().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
        (lo.min(x), hi.max(x))
    })
}

pub fn balance(
    xss: &[FxHashMap<String, f64>; 4],
    align: Option<Align>,
) -> FxHashMap<String, f64> {
    let mut out: FxHashMap<String, f64> = FxHashMap::default();
    for v in xss[0].keys() {
        if let Some(align) = align {
            let x = xss[align.index()].get(v).copied().unwrap_or(0.0);
            out.insert(v.clone(), x);
            continue;
        }
        let mut vals: Vec<f64> = xss.iter().filter_map(|xs| xs.get(v).copied()).collect();
        vals.sort_by(|a, b| a.total_cmp(b));
        let x = match vals.len() {
            0 => 0.0,
            n => (vals[(n - 1) / 2] + vals[n / 2]) / 2.0,
        };
        out.insert(v.clone(), x);
    }
    out
}

pub fn position_x(g: &Graph<NodeLabel, EdgeLabel, GraphLabel>) -> FxHashMap<String, f64> {
    let layering = crate::util::build_layer_matrix(g);
    let conflicts = find_type1_conflicts(g, &layering);

    let mut xss: [FxHashMap<String, f64>; 4] = Default::default();
    for (slot, (down, right)) in [(false, false), (false, true), (true, false), (true, true)]
        .into_iter()
        .enumerate()
    {
        let mut adjusted: Vec<Vec<String>> = layering.clone();
        if down {
            adjusted.reverse();
        }
        if right {
            adjusted.iter_mut().for_each(|layer| layer.reverse());
        }

        let neighbors = |v: &str| -> Vec<String> {
            let ns = if down {
                g.successors(v)
            } else {
                g.predecessors(v)
            };
            ns.into_iter().map(str::to_string).collect()
        };
        let alignment = vertical_alignment(&adjusted, &conflicts, neighbors);
        let mut xs = horizontal_compaction(g, &adjusted, &alignment);
        if right {
            xs.values_mut().for_each(|x| *x = -*x);
        }
        xss[slot] = xs;
    }

    let reference = find_smallest_width_alignment(g, &xss);
    align_coordinates(&mut xss, reference);
    balance(&xss, g.graph().align)
}
