//! Rank assignment (network simplex, tight tree, longest path).
//!
//! Ranking works on an index-based, simplified view of each weakly connected component. Parallel
//! edges are merged (weights summed, largest `minlen` kept) and every component is shifted so its
//! smallest rank is `0`.

use crate::graphlib::{Graph, alg};
use crate::{EdgeLabel, GraphLabel, NodeLabel, Ranker};

mod feasible_tree;
mod network_simplex;
mod rank_graph;

pub use rank_graph::RankGraph;

pub fn rank(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    match g.graph().ranker {
        Ranker::NetworkSimplex => network_simplex(g),
        Ranker::TightTree => tight_tree(g),
        Ranker::LongestPath => longest_path(g),
    }
}

/// Ranks every node as high as its successors allow (sinks get rank `0` before normalization).
pub fn longest_path(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    per_component(g, RankGraph::longest_path);
}

/// Longest path followed by tightening into a feasible spanning tree.
pub fn tight_tree(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    per_component(g, |rg| {
        rg.longest_path();
        let _ = feasible_tree::feasible_tree(rg);
    });
}

pub fn network_simplex(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
    per_component(g, network_simplex::run);
}

/// Tree edges `(tail, head)` of a tight spanning tree for a single connected graph, after
/// adjusting ranks so every tree edge has zero slack. Ranks are written back to `g`.
pub fn feasible_tree(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) -> Vec<(String, String)> {
    let ids = g.node_ids();
    let mut rg = RankGraph::from_nodes(g, &ids);
    rg.longest_path();
    let tree = feasible_tree::feasible_tree(&mut rg);
    rg.write_back(g);
    tree.edges
        .iter()
        .map(|&e| {
            let (v, w) = rg.endpoints(e);
            (rg.id(v).to_string(), rg.id(w).to_string())
        })
        .collect()
}

/// `rank(w) - rank(v) - minlen` for the edge `v -> w`; `0` means the edge is tight.
pub fn slack(g: &Graph<NodeLabel, EdgeLabel, GraphLabel>, v: &str, w: &str) -> Option<i32> {
    let v_rank = g.node(v)?.rank?;
    let w_rank = g.node(w)?.rank?;
    let minlen = g
        .out_edges(v, Some(w))
        .iter()
        .filter_map(|e| g.edge_by_key(e))
        .map(|lbl| lbl.minlen as i32)
        .max()?;
    Some(w_rank - v_rank - minlen)
}

fn per_component(
    g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>,
    mut f: impl FnMut(&mut RankGraph),
) {
    for component in alg::components(g) {
        let mut rg = RankGraph::from_nodes(g, &component);
        f(&mut rg);
        rg.normalize();
        rg.write_back(g);
    }
}
