use remora::graphlib::{Graph, GraphOptions};
use remora::order::{self, BarycenterEntry};
use remora::util::build_layer_matrix;
use remora::{EdgeLabel, GraphLabel, NodeLabel};

fn ranked(nodes: &[(&str, i32)]) -> Graph<NodeLabel, EdgeLabel, GraphLabel> {
    let mut g: Graph<NodeLabel, EdgeLabel, GraphLabel> = Graph::new(GraphOptions::default());
    g.set_graph(GraphLabel::default());
    for (id, rank) in nodes {
        g.set_node(
            *id,
            NodeLabel {
                rank: Some(*rank),
                ..Default::default()
            },
        );
    }
    g
}

fn entry(v: &str, i: usize, barycenter: Option<f64>) -> BarycenterEntry {
    BarycenterEntry {
        v: v.to_string(),
        i,
        barycenter,
        weight: if barycenter.is_some() { 1.0 } else { 0.0 },
    }
}

fn layers(raw: &[&[&str]]) -> Vec<Vec<String>> {
    raw.iter()
        .map(|l| l.iter().map(|s| s.to_string()).collect())
        .collect()
}

#[test]
fn init_order_follows_dfs_from_lowest_rank() {
    let mut g = ranked(&[("a", 0), ("b", 0), ("c", 1), ("d", 1)]);
    g.set_edge("a", "d");
    g.set_edge("b", "c");

    assert_eq!(order::init_order(&g), layers(&[&["a", "b"], &["d", "c"]]));
}

#[test]
fn sort_orders_by_barycenter_and_keeps_unsortable_slots() {
    let entries = vec![
        entry("a", 0, Some(2.0)),
        entry("b", 1, None),
        entry("c", 2, Some(1.0)),
    ];
    assert_eq!(order::sort(entries, false), vec!["c", "b", "a"]);
}

#[test]
fn sort_breaks_ties_by_bias() {
    let entries = || vec![entry("a", 0, Some(1.0)), entry("b", 1, Some(1.0))];
    assert_eq!(order::sort(entries(), false), vec!["a", "b"]);
    assert_eq!(order::sort(entries(), true), vec!["b", "a"]);
}

#[test]
fn cross_count_weighs_crossings() {
    let mut g = ranked(&[("a", 0), ("b", 0), ("c", 1), ("d", 1)]);
    g.set_edge_with_label(
        "a",
        "d",
        EdgeLabel {
            weight: 2.0,
            ..Default::default()
        },
    );
    g.set_edge_with_label(
        "b",
        "c",
        EdgeLabel {
            weight: 3.0,
            ..Default::default()
        },
    );

    assert_eq!(order::cross_count(&g, &layers(&[&["a", "b"], &["c", "d"]])), 6.0);
    assert_eq!(order::cross_count(&g, &layers(&[&["a", "b"], &["d", "c"]])), 0.0);
}

#[test]
fn order_removes_avoidable_crossings() {
    let mut g = ranked(&[("a", 0), ("b", 0), ("c", 1), ("d", 1)]);
    g.set_edge("a", "c");
    g.set_edge("a", "d");
    g.set_edge("b", "c");

    let initial = order::init_order(&g);
    assert_eq!(order::cross_count(&g, &initial), 1.0);

    order::order(&mut g);
    let layering = build_layer_matrix(&g);
    assert_eq!(order::cross_count(&g, &layering), 0.0);
    for layer in &layering {
        for (i, v) in layer.iter().enumerate() {
            assert_eq!(g.node(v).unwrap().order, Some(i));
        }
    }
}
