//! Crossing reduction.
//!
//! A DFS-based initial ordering followed by alternating barycenter sweeps (down sweeps look at
//! predecessors, up sweeps at successors). The ordering with the fewest weighted crossings wins;
//! sweeping stops after four consecutive iterations without improvement.

use crate::graphlib::Graph;
use crate::{EdgeLabel, GraphLabel, NodeLabel};
use rustc_hash::{FxHashMap, FxHashSet};

/// Layers (index = rank) in DFS discovery order, visiting roots by `(rank, insertion order)`.
pub fn init_order(g: &Graph<NodeLabel, EdgeLabel, GraphLabel>) -> Vec<Vec<String>> {
    let Some(max_rank) = crate::util::max_rank(g) else {
        return Vec::new();
    };
    let mut layers: Vec<Vec<String>> = vec![Vec::new(); (max_rank.max(0) + 1) as usize];

    let mut roots: Vec<(i32, usize, &str)> = g
        .nodes()
        .enumerate()
        .filter_map(|(i, v)| Some((g.node(v)?.rank?, i, v)))
        .collect();
    roots.sort_by_key(|(rank, i, _)| (*rank, *i));

    let mut visited: FxHashSet<&str> = FxHashSet::default();
    for (_, _, root) in roots {
        let mut stack: Vec<&str> = vec![root];
        while let Some(v) = stack.pop() {
            if !visited.insert(v) {
                continue;
            }
            if let Some(rank) = g.node(v).and_then(|n| n.rank) {
                if let Some(layer) = layers.get_mut(rank.max(0) as usize) {
                    layer.push(v.to_string());
                }
            }
            for w in g.successors(v).into_iter().rev() {
                if !visited.contains(w) {
                    stack.push(w);
                }
            }
        }
    }
    layers
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarycenterEntry {
    pub v: String,
    /// Position of `v` before sorting.
    pub i: usize,
    pub barycenter: Option<f64>,
    pub weight: f64,
}

/// Orders entries by barycenter. Entries without one keep their original slot: they are
/// reinserted whenever the output reaches their former index.
pub fn sort(entries: Vec<BarycenterEntry>, bias_right: bool) -> Vec<String> {
    let (mut sortable, mut unsortable): (Vec<BarycenterEntry>, Vec<BarycenterEntry>) =
        entries.into_iter().partition(|e| e.barycenter.is_some());
    unsortable.sort_by(|a, b| b.i.cmp(&a.i));
    sortable.sort_by(|a, b| {
        let ba = a.barycenter.unwrap_or(0.0);
        let bb = b.barycenter.unwrap_or(0.0);
        ba.total_cmp(&bb).then_with(|| {
            if bias_right {
                b.i.cmp(&a.i)
            } else {
                a.i.cmp(&b.i)
            }
        })
    });

    let mut out: Vec<String> = Vec::new();
    consume_unsortable(&mut out, &mut unsortable);
    for entry in sortable {
        out.push(entry.v);
        consume_unsortable(&mut out, &mut unsortable);
    }
    out
}

fn consume_unsortable(out: &mut Vec<String>, unsortable: &mut Vec<BarycenterEntry>) {
    while unsortable.last().is_some_and(|last| last.i <= out.len()) {
        if let Some(last) = unsortable.pop() {
            out.push(last.v);
        }
    }
}

/// Weighted crossings between every pair of adjacent layers.
pub fn cross_count(g: &Graph<NodeLabel, EdgeLabel, GraphLabel>, layering: &[Vec<String>]) -> f64 {
    layering
        .windows(2)
        .map(|pair| two_layer_cross_count(g, &pair[0], &pair[1]))
        .sum()
}

/// Accumulator tree count (Barth, Jünger, Mutzel).
fn two_layer_cross_count(
    g: &Graph<NodeLabel, EdgeLabel, GraphLabel>,
    north: &[String],
    south: &[String],
) -> f64 {
    if south.is_empty() {
        return 0.0;
    }
    let south_pos: FxHashMap<&str, usize> = south
        .iter()
        .enumerate()
        .map(|(i, v)| (v.as_str(), i))
        .collect();

    let mut south_entries: Vec<(usize, f64)> = Vec::new();
    for v in north {
        let mut entries: Vec<(usize, f64)> = g
            .out_edges(v, None)
            .into_iter()
            .filter_map(|e| {
                let pos = *south_pos.get(e.w.as_str())?;
                let weight = g.edge_by_key(&e).map(|l| l.weight).unwrap_or(0.0);
                Some((pos, weight))
            })
            .collect();
        entries.sort_by_key(|(pos, _)| *pos);
        south_entries.extend(entries);
    }

    let mut first_index: usize = 1;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<f64> = vec![0.0; tree_size];

    let mut cc = 0.0;
    for (pos, weight) in south_entries {
        let mut index = pos + first_index;
        tree[index] += weight;
        let mut weight_sum = 0.0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += weight;
        }
        cc += weight * weight_sum;
    }
    cc
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sweep {
    /// Rank by rank downwards, looking at predecessors.
    Down,
    /// Rank by rank upwards, looking at successors.
    Up,
}

pub fn order(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    let Some(max_rank) = crate::util::max_rank(g) else {
        return;
    };

    let mut best = init_order(g);
    assign_order(g, &best);
    let mut best_cc = cross_count(g, &best);

    let mut i: usize = 0;
    let mut last_best: usize = 0;
    while last_best < 4 {
        let (sweep, ranks): (Sweep, Vec<i32>) = if i % 2 == 1 {
            (Sweep::Down, (1..=max_rank).collect())
        } else {
            (Sweep::Up, (0..max_rank).rev().collect())
        };
        sweep_layers(g, sweep, &ranks, i % 4 >= 2);

        let layering = crate::util::build_layer_matrix(g);
        let cc = cross_count(g, &layering);
        if cc < best_cc {
            last_best = 0;
            best_cc = cc;
            best = layering;
        }
        i += 1;
        last_best += 1;
    }

    assign_order(g, &best);
}

fn assign_order(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>, layering: &[Vec<String>]) {
    for layer in layering {
        for (i, v) in layer.iter().enumerate() {
            if let Some(n) = g.node_mut(v) {
                n.order = Some(i);
            }
        }
    }
}

fn sweep_layers(
    g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>,
    sweep: Sweep,
    ranks: &[i32],
    bias_right: bool,
) {
    let layering = crate::util::build_layer_matrix(g);
    for &rank in ranks {
        let Some(layer) = layering.get(rank as usize) else {
            continue;
        };
        let entries: Vec<BarycenterEntry> = layer
            .iter()
            .enumerate()
            .map(|(i, v)| barycenter(g, v, i, sweep))
            .collect();
        for (i, v) in sort(entries, bias_right).iter().enumerate() {
            if let Some(n) = g.node_mut(v) {
                n.order = Some(i);
            }
        }
    }
}

fn barycenter(
    g: &Graph<NodeLabel, EdgeLabel, GraphLabel>,
    v: &str,
    i: usize,
    sweep: Sweep,
) -> BarycenterEntry {
    let edges = match sweep {
        Sweep::Down => g.in_edges(v, None),
        Sweep::Up => g.out_edges(v, None),
    };
    let mut sum = 0.0;
    let mut weight = 0.0;
    for e in &edges {
        let other = if sweep == Sweep::Down { &e.v } else { &e.w };
        let Some(order) = g.node(other).and_then(|n| n.order) else {
            continue;
        };
        let w = g.edge_by_key(e).map(|l| l.weight).unwrap_or(0.0);
        sum += w * order as f64;
        weight += w;
    }
    BarycenterEntry {
        v: v.to_string(),
        i,
        barycenter: (weight > 0.0).then(|| sum / weight),
        weight,
    }
}
