//! Network simplex ranking (Gansner et al., "A Technique for Drawing Directed Graphs").
//!
//! Starting from a feasible tight tree, repeatedly swap a tree edge with a negative cut value for
//! the non-tree edge of minimum slack that reconnects the two halves, until every cut value is
//! non-negative.

use super::RankGraph;
use super::feasible_tree::{TightTree, feasible_tree};

struct Tree {
    /// Tree edge indices per node.
    adj: Vec<Vec<usize>>,
    is_tree_edge: Vec<bool>,
    parent: Vec<Option<usize>>,
    /// Edge connecting a node to its parent.
    parent_edge: Vec<Option<usize>>,
    low: Vec<i32>,
    lim: Vec<i32>,
    cut: Vec<f64>,
    /// Preorder from node `0`, rebuilt with low/lim values.
    preorder: Vec<usize>,
}

impl Tree {
    fn new(rg: &RankGraph, tight: &TightTree) -> Self {
        let n = rg.len();
        let mut tree = Self {
            adj: vec![Vec::new(); n],
            is_tree_edge: vec![false; rg.edges.len()],
            parent: vec![None; n],
            parent_edge: vec![None; n],
            low: vec![0; n],
            lim: vec![0; n],
            cut: vec![0.0; rg.edges.len()],
            preorder: Vec::with_capacity(n),
        };
        for &e in &tight.edges {
            tree.add_edge(rg, e);
        }
        tree
    }

    fn add_edge(&mut self, rg: &RankGraph, e: usize) {
        let (v, w) = rg.endpoints(e);
        self.is_tree_edge[e] = true;
        self.adj[v].push(e);
        self.adj[w].push(e);
    }

    fn remove_edge(&mut self, rg: &RankGraph, e: usize) {
        let (v, w) = rg.endpoints(e);
        self.is_tree_edge[e] = false;
        self.adj[v].retain(|&x| x != e);
        self.adj[w].retain(|&x| x != e);
    }

    /// Assigns postorder `lim` numbers and subtree `low` bounds by DFS from node `0`.
    fn init_low_lim(&mut self, rg: &RankGraph) {
        let n = rg.len();
        self.parent.iter_mut().for_each(|p| *p = None);
        self.parent_edge.iter_mut().for_each(|p| *p = None);
        self.preorder.clear();
        if n == 0 {
            return;
        }

        let mut visited = vec![false; n];
        let mut next_lim: i32 = 1;
        // (node, low, next adjacency index)
        let mut stack: Vec<(usize, i32, usize)> = vec![(0, next_lim, 0)];
        visited[0] = true;
        self.preorder.push(0);

        while let Some(top) = stack.last_mut() {
            let v = top.0;
            if let Some(&e) = self.adj[v].get(top.2) {
                top.2 += 1;
                let (a, b) = rg.endpoints(e);
                let w = if a == v { b } else { a };
                if visited[w] {
                    continue;
                }
                visited[w] = true;
                self.parent[w] = Some(v);
                self.parent_edge[w] = Some(e);
                self.preorder.push(w);
                stack.push((w, next_lim, 0));
                continue;
            }
            let (v, low, _) = *top;
            self.low[v] = low;
            self.lim[v] = next_lim;
            next_lim += 1;
            stack.pop();
        }
    }

    /// Cut values in postorder so every child edge is known before its parent edge.
    fn init_cut_values(&mut self, rg: &RankGraph) {
        self.cut.iter_mut().for_each(|c| *c = 0.0);
        for i in (1..self.preorder.len()).rev() {
            let child = self.preorder[i];
            let Some(e) = self.parent_edge[child] else {
                continue;
            };
            self.cut[e] = self.calc_cut_value(rg, child);
        }
    }

    fn calc_cut_value(&self, rg: &RankGraph, child: usize) -> f64 {
        let (Some(parent), Some(pe)) = (self.parent[child], self.parent_edge[child]) else {
            return 0.0;
        };
        let child_is_tail = rg.edges[pe].v == child;
        let mut cut_value = rg.edges[pe].weight;

        for e in rg.node_edges(child) {
            let edge = rg.edges[e];
            let is_out_edge = edge.v == child;
            let other = if is_out_edge { edge.w } else { edge.v };
            if other == parent {
                continue;
            }
            let points_to_head = is_out_edge == child_is_tail;
            cut_value += if points_to_head {
                edge.weight
            } else {
                -edge.weight
            };
            if self.is_tree_edge[e] {
                let other_cut = self.cut[e];
                cut_value += if points_to_head {
                    -other_cut
                } else {
                    other_cut
                };
            }
        }
        cut_value
    }

    fn is_descendant(&self, v: usize, root: usize) -> bool {
        self.low[root] <= self.lim[v] && self.lim[v] <= self.lim[root]
    }

    fn leave_edge(&self) -> Option<usize> {
        (0..self.cut.len()).find(|&e| self.is_tree_edge[e] && self.cut[e] < 0.0)
    }

    fn enter_edge(&self, rg: &RankGraph, leaving: usize) -> Option<usize> {
        let (v, w) = rg.endpoints(leaving);
        let (tail, flip) = if self.lim[v] > self.lim[w] {
            (w, true)
        } else {
            (v, false)
        };

        let mut best: Option<(usize, i32)> = None;
        for (e, edge) in rg.edges.iter().enumerate() {
            if flip != self.is_descendant(edge.v, tail) || flip == self.is_descendant(edge.w, tail)
            {
                continue;
            }
            let slack = rg.slack(e);
            if best.is_none_or(|(_, s)| slack < s) {
                best = Some((e, slack));
            }
        }
        best.map(|(e, _)| e)
    }

    /// Re-derives ranks top-down so every tree edge stays tight.
    fn update_ranks(&self, rg: &mut RankGraph) {
        for &v in self.preorder.iter().skip(1) {
            let (Some(parent), Some(e)) = (self.parent[v], self.parent_edge[v]) else {
                continue;
            };
            let minlen = rg.edges[e].minlen;
            rg.rank[v] = if rg.edges[e].v == v {
                rg.rank[parent] - minlen
            } else {
                rg.rank[parent] + minlen
            };
        }
    }
}

pub(super) fn run(rg: &mut RankGraph) {
    rg.longest_path();
    if rg.len() < 2 {
        return;
    }
    let tight = feasible_tree(rg);
    let mut tree = Tree::new(rg, &tight);
    tree.init_low_lim(rg);
    tree.init_cut_values(rg);

    // Degenerate float weights must not spin forever.
    let max_iterations = rg.edges.len().saturating_mul(rg.len()).max(64);
    for _ in 0..max_iterations {
        let Some(leaving) = tree.leave_edge() else {
            break;
        };
        let Some(entering) = tree.enter_edge(rg, leaving) else {
            break;
        };
        tree.remove_edge(rg, leaving);
        tree.add_edge(rg, entering);
        tree.init_low_lim(rg);
        tree.init_cut_values(rg);
        tree.update_ranks(rg);
    }
}
