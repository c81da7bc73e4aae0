use super::RankGraph;

/// Spanning tree whose edges are all tight.
#[derive(Debug, Clone, Default)]
pub(super) struct TightTree {
    pub(super) edges: Vec<usize>,
    pub(super) in_tree: Vec<bool>,
}

/// Grows a tight tree from node `0`, shifting the tree's ranks towards the closest non-tree
/// node whenever no tight edge leaves it. Expects a connected graph.
pub(super) fn feasible_tree(rg: &mut RankGraph) -> TightTree {
    let n = rg.len();
    let mut tree = TightTree {
        edges: Vec::new(),
        in_tree: vec![false; n],
    };
    if n == 0 {
        return tree;
    }
    tree.in_tree[0] = true;
    let mut members: Vec<usize> = vec![0];

    while grow_tight(rg, &mut tree, &mut members) < n {
        let Some((e, slack)) = min_slack_edge(rg, &tree) else {
            break;
        };
        let delta = if tree.in_tree[rg.edges[e].v] {
            slack
        } else {
            -slack
        };
        for &v in &members {
            rg.rank[v] += delta;
        }
    }

    tree
}

fn grow_tight(rg: &RankGraph, tree: &mut TightTree, members: &mut Vec<usize>) -> usize {
    let mut stack: Vec<usize> = members.clone();
    while let Some(v) = stack.pop() {
        for e in rg.node_edges(v) {
            let (tail, head) = rg.endpoints(e);
            let w = if tail == v { head } else { tail };
            if tree.in_tree[w] || rg.slack(e) != 0 {
                continue;
            }
            tree.in_tree[w] = true;
            tree.edges.push(e);
            members.push(w);
            stack.push(w);
        }
    }
    members.len()
}

fn min_slack_edge(rg: &RankGraph, tree: &TightTree) -> Option<(usize, i32)> {
    let mut best: Option<(usize, i32)> = None;
    for (e, edge) in rg.edges.iter().enumerate() {
        if tree.in_tree[edge.v] == tree.in_tree[edge.w] {
            continue;
        }
        let slack = rg.slack(e);
        if best.is_none_or(|(_, s)| slack < s) {
            best = Some((e, slack));
        }
    }
    best
}
