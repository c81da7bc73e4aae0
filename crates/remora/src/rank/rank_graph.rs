use crate::graphlib::Graph;
use crate::{EdgeLabel, GraphLabel, NodeLabel};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy)]
pub(super) struct RankEdge {
    pub(super) v: usize,
    pub(super) w: usize,
    pub(super) minlen: i32,
    pub(super) weight: f64,
}

/// Simplified, index-addressed copy of a set of nodes and the edges among them.
#[derive(Debug, Clone)]
pub struct RankGraph {
    ids: Vec<String>,
    pub(super) edges: Vec<RankEdge>,
    pub(super) out_adj: Vec<Vec<usize>>,
    pub(super) in_adj: Vec<Vec<usize>>,
    pub(super) rank: Vec<i32>,
}

impl RankGraph {
    /// Builds the view over `ids`; edges leaving the set are ignored and parallel edges merged.
    pub fn from_nodes(g: &Graph<NodeLabel, EdgeLabel, GraphLabel>, ids: &[String]) -> Self {
        let index: FxHashMap<&str, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        let mut edges: Vec<RankEdge> = Vec::new();
        let mut by_pair: FxHashMap<(usize, usize), usize> = FxHashMap::default();
        let mut out_adj: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
        let mut in_adj: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];

        for (vi, v) in ids.iter().enumerate() {
            for key in g.out_edges(v, None) {
                let Some(&wi) = index.get(key.w.as_str()) else {
                    continue;
                };
                if wi == vi {
                    continue;
                }
                let Some(lbl) = g.edge_by_key(&key) else {
                    continue;
                };
                let minlen = lbl.minlen as i32;
                if let Some(&ei) = by_pair.get(&(vi, wi)) {
                    let e = &mut edges[ei];
                    e.weight += lbl.weight;
                    e.minlen = e.minlen.max(minlen);
                    continue;
                }
                let ei = edges.len();
                edges.push(RankEdge {
                    v: vi,
                    w: wi,
                    minlen,
                    weight: lbl.weight,
                });
                by_pair.insert((vi, wi), ei);
                out_adj[vi].push(ei);
                in_adj[wi].push(ei);
            }
        }

        let rank = ids
            .iter()
            .map(|id| g.node(id).and_then(|n| n.rank).unwrap_or(0))
            .collect();

        Self {
            ids: ids.to_vec(),
            edges,
            out_adj,
            in_adj,
            rank,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn id(&self, v: usize) -> &str {
        &self.ids[v]
    }

    pub fn rank_of(&self, v: usize) -> i32 {
        self.rank[v]
    }

    pub(super) fn endpoints(&self, e: usize) -> (usize, usize) {
        (self.edges[e].v, self.edges[e].w)
    }

    pub(super) fn slack(&self, e: usize) -> i32 {
        let edge = self.edges[e];
        self.rank[edge.w] - self.rank[edge.v] - edge.minlen
    }

    /// Edge indices incident to `v`: out edges first, then in edges.
    pub(super) fn node_edges(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.out_adj[v].iter().chain(self.in_adj[v].iter()).copied()
    }

    /// Assigns `rank(v) = min(rank(w) - minlen)` over out edges, processing nodes in reverse
    /// topological order. Nodes caught in a cycle keep rank `0`.
    pub fn longest_path(&mut self) {
        let n = self.len();
        let mut indegree: Vec<usize> = self.in_adj.iter().map(Vec::len).collect();
        let mut queue: VecDeque<usize> = (0..n).filter(|&v| indegree[v] == 0).collect();
        let mut topo: Vec<usize> = Vec::with_capacity(n);
        while let Some(v) = queue.pop_front() {
            topo.push(v);
            for &e in &self.out_adj[v] {
                let w = self.edges[e].w;
                indegree[w] -= 1;
                if indegree[w] == 0 {
                    queue.push_back(w);
                }
            }
        }

        self.rank.iter_mut().for_each(|r| *r = 0);
        for &v in topo.iter().rev() {
            let best = self.out_adj[v]
                .iter()
                .map(|&e| self.rank[self.edges[e].w] - self.edges[e].minlen)
                .min();
            self.rank[v] = best.unwrap_or(0);
        }
    }

    pub fn normalize(&mut self) {
        let Some(min) = self.rank.iter().copied().min() else {
            return;
        };
        self.rank.iter_mut().for_each(|r| *r -= min);
    }

    pub fn write_back(&self, g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) {
        for (id, &rank) in self.ids.iter().zip(&self.rank) {
            if let Some(n) = g.node_mut(id) {
                n.rank = Some(rank);
            }
        }
    }
}
