use remora::graphlib::{Graph, GraphOptions};
use remora::{EdgeLabel, GraphLabel, NodeLabel, Ranker, rank};

fn new_graph(ranker: Ranker) -> Graph<NodeLabel, EdgeLabel, GraphLabel> {
    let mut g: Graph<NodeLabel, EdgeLabel, GraphLabel> =
        Graph::new(GraphOptions { multigraph: true });
    g.set_graph(GraphLabel {
        ranker,
        ..Default::default()
    });
    g.set_default_edge_label(EdgeLabel::default);
    g
}

fn ranks(g: &Graph<NodeLabel, EdgeLabel, GraphLabel>, ids: &[&str]) -> Vec<i32> {
    ids.iter()
        .map(|id| g.node(id).unwrap().rank.unwrap())
        .collect()
}

/// `a -> b -> c` plus a short branch `a -> d`.
fn branchy(ranker: Ranker) -> Graph<NodeLabel, EdgeLabel, GraphLabel> {
    let mut g = new_graph(ranker);
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "d");
    g
}

#[test]
fn longest_path_pushes_sinks_to_the_bottom() {
    let mut g = branchy(Ranker::LongestPath);
    rank::rank(&mut g);
    assert_eq!(ranks(&g, &["a", "b", "c", "d"]), vec![0, 1, 2, 2]);
}

#[test]
fn network_simplex_shortens_edges() {
    let mut g = branchy(Ranker::NetworkSimplex);
    rank::rank(&mut g);
    assert_eq!(ranks(&g, &["a", "b", "c", "d"]), vec![0, 1, 2, 1]);
}

#[test]
fn tight_tree_shortens_edges() {
    let mut g = branchy(Ranker::TightTree);
    rank::rank(&mut g);
    assert_eq!(ranks(&g, &["a", "b", "c", "d"]), vec![0, 1, 2, 1]);
}

#[test]
fn rank_respects_minlen() {
    let mut g = new_graph(Ranker::NetworkSimplex);
    g.set_edge_with_label(
        "a",
        "b",
        EdgeLabel {
            minlen: 3,
            ..Default::default()
        },
    );
    g.set_edge("b", "c");

    rank::rank(&mut g);
    assert_eq!(ranks(&g, &["a", "b", "c"]), vec![0, 3, 4]);
    assert_eq!(rank::slack(&g, "a", "b"), Some(0));
}

#[test]
fn rank_starts_every_component_at_zero() {
    let mut g = new_graph(Ranker::NetworkSimplex);
    g.set_path(&["a", "b", "c"]);
    g.set_edge("x", "y");
    g.ensure_node("z");

    rank::rank(&mut g);
    assert_eq!(ranks(&g, &["a", "b", "c", "x", "y", "z"]), vec![0, 1, 2, 0, 1, 0]);
}

#[test]
fn network_simplex_prefers_short_heavy_edges() {
    let mut g = new_graph(Ranker::NetworkSimplex);
    g.set_path(&["a", "b", "c", "d"]);
    g.set_edge_with_label(
        "e",
        "d",
        EdgeLabel {
            weight: 10.0,
            ..Default::default()
        },
    );

    rank::rank(&mut g);
    let e = g.node("e").unwrap().rank.unwrap();
    let d = g.node("d").unwrap().rank.unwrap();
    assert_eq!(d - e, 1);
}

#[test]
fn feasible_tree_edges_are_tight() {
    let mut g = new_graph(Ranker::NetworkSimplex);
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "d");
    g.set_edge("d", "c");

    let tree = rank::feasible_tree(&mut g);
    assert_eq!(tree.len(), 3);
    for (v, w) in tree {
        assert_eq!(rank::slack(&g, &v, &w), Some(0), "{v} -> {w}");
    }
}
