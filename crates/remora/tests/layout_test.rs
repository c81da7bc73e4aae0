use remora::graphlib::{Graph, GraphOptions};
use remora::{EdgeLabel, GraphLabel, NodeLabel, RankDir, layout};
use std::collections::BTreeMap;

fn new_graph() -> Graph<NodeLabel, EdgeLabel, GraphLabel> {
    let mut g: Graph<NodeLabel, EdgeLabel, GraphLabel> =
        Graph::new(GraphOptions { multigraph: true });
    g.set_graph(GraphLabel::default());
    g.set_default_edge_label(EdgeLabel::default);
    g
}

fn sized(width: f64, height: f64) -> NodeLabel {
    NodeLabel {
        width,
        height,
        ..Default::default()
    }
}

fn coords(g: &Graph<NodeLabel, EdgeLabel, GraphLabel>) -> BTreeMap<String, (f64, f64)> {
    let mut out = BTreeMap::new();
    for id in g.nodes() {
        let n = g.node(id).unwrap();
        out.insert(id.to_string(), (n.x.unwrap(), n.y.unwrap()));
    }
    out
}

#[test]
fn layout_can_layout_a_single_node() {
    let mut g = new_graph();
    g.set_node("a", sized(50.0, 100.0));

    layout(&mut g);
    assert_eq!(coords(&g), [("a".to_string(), (25.0, 50.0))].into());
    assert_eq!(g.graph().width, 50.0);
    assert_eq!(g.graph().height, 100.0);
}

#[test]
fn layout_can_layout_two_nodes_on_the_same_rank() {
    let mut g = new_graph();
    g.graph_mut().nodesep = 200.0;
    g.set_node("a", sized(50.0, 100.0));
    g.set_node("b", sized(75.0, 200.0));

    layout(&mut g);
    assert_eq!(
        coords(&g),
        [
            ("a".to_string(), (25.0, 100.0)),
            ("b".to_string(), (50.0 + 200.0 + 75.0 / 2.0, 100.0)),
        ]
        .into()
    );
}

#[test]
fn layout_can_layout_two_nodes_connected_by_an_edge() {
    let mut g = new_graph();
    g.graph_mut().ranksep = 300.0;
    g.set_node("a", sized(50.0, 100.0));
    g.set_node("b", sized(75.0, 200.0));
    g.set_edge("a", "b");

    layout(&mut g);
    assert_eq!(
        coords(&g),
        [
            ("a".to_string(), (75.0 / 2.0, 50.0)),
            ("b".to_string(), (75.0 / 2.0, 100.0 + 300.0 + 200.0 / 2.0)),
        ]
        .into()
    );

    let points = &g.edge("a", "b", None).unwrap().points;
    assert_eq!(points.len(), 2);
    assert_eq!((points[0].x, points[0].y), (37.5, 100.0));
    assert_eq!((points[1].x, points[1].y), (37.5, 400.0));
    assert_eq!(g.graph().height, 600.0);
}

#[test]
fn layout_can_layout_left_to_right() {
    let mut g = new_graph();
    g.graph_mut().ranksep = 300.0;
    g.graph_mut().rankdir = RankDir::LR;
    g.set_node("a", sized(50.0, 100.0));
    g.set_node("b", sized(75.0, 200.0));
    g.set_edge("a", "b");

    layout(&mut g);
    assert_eq!(
        coords(&g),
        [
            ("a".to_string(), (25.0, 100.0)),
            ("b".to_string(), (50.0 + 300.0 + 75.0 / 2.0, 100.0)),
        ]
        .into()
    );
}

#[test]
fn layout_bottom_to_top_puts_sources_below_sinks() {
    let mut g = new_graph();
    g.graph_mut().rankdir = RankDir::BT;
    g.set_node("a", sized(40.0, 40.0));
    g.set_node("b", sized(40.0, 40.0));
    g.set_edge("a", "b");

    layout(&mut g);
    let a = g.node("a").unwrap();
    let b = g.node("b").unwrap();
    assert!(a.y.unwrap() > b.y.unwrap());
    assert_eq!(b.y, Some(20.0));
}

#[test]
fn layout_adds_bend_points_for_long_edges() {
    let mut g = new_graph();
    for id in ["a", "b", "c"] {
        g.set_node(id, sized(30.0, 30.0));
    }
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "c");

    layout(&mut g);
    assert_eq!(g.node_count(), 3);
    assert_eq!(g.edge("a", "c", None).unwrap().points.len(), 3);
    assert_eq!(g.edge("a", "b", None).unwrap().points.len(), 2);
}

#[test]
fn layout_keeps_cyclic_edges_in_their_original_direction() {
    let mut g = new_graph();
    g.set_node("a", sized(20.0, 20.0));
    g.set_node("b", sized(20.0, 20.0));
    g.set_edge("a", "b");
    g.set_edge("b", "a");

    layout(&mut g);
    assert!(g.has_edge("a", "b", None));
    assert!(g.has_edge("b", "a", None));

    let a_y = g.node("a").unwrap().y.unwrap();
    let b_y = g.node("b").unwrap().y.unwrap();
    assert!(a_y < b_y);

    let back = &g.edge("b", "a", None).unwrap().points;
    assert!(back.first().unwrap().y > back.last().unwrap().y);
}

#[test]
fn layout_routes_self_loops_to_the_right_of_the_node() {
    let mut g = new_graph();
    g.set_node("a", sized(100.0, 100.0));
    g.set_edge("a", "a");

    layout(&mut g);
    let a = g.node("a").unwrap();
    let points = &g.edge("a", "a", None).unwrap().points;
    assert_eq!(points.len(), 7);
    assert!(points.iter().all(|p| p.x >= a.x.unwrap()));
    assert_eq!(g.graph().width, 135.0);
}

#[test]
fn layout_applies_margins() {
    let mut g = new_graph();
    g.graph_mut().marginx = 10.0;
    g.graph_mut().marginy = 20.0;
    g.set_node("a", sized(50.0, 100.0));

    layout(&mut g);
    assert_eq!(coords(&g), [("a".to_string(), (35.0, 70.0))].into());
    assert_eq!(g.graph().width, 70.0);
    assert_eq!(g.graph().height, 140.0);
}

#[test]
fn layout_of_an_empty_graph_is_empty() {
    let mut g = new_graph();
    layout(&mut g);
    assert_eq!(g.graph().width, 0.0);
    assert_eq!(g.graph().height, 0.0);
}

#[test]
fn layout_is_deterministic() {
    let build = || {
        let mut g = new_graph();
        for id in ["a", "b", "c", "d", "e", "f"] {
            g.set_node(id, sized(40.0, 20.0));
        }
        g.set_path(&["a", "b", "d", "f"]);
        g.set_path(&["a", "c", "e", "f"]);
        g.set_edge("c", "d");
        g.set_edge("b", "e");
        g
    };
    let mut first = build();
    let mut second = build();
    layout(&mut first);
    layout(&mut second);
    assert_eq!(coords(&first), coords(&second));
}

#[test]
fn layout_leaves_no_overlap_within_a_rank() {
    let mut g = new_graph();
    g.set_node("root", sized(40.0, 20.0));
    for (i, w) in [30.0, 80.0, 50.0, 20.0].into_iter().enumerate() {
        let id = format!("c{i}");
        g.set_node(id.clone(), sized(w, 20.0));
        g.set_edge("root", id);
    }

    layout(&mut g);
    let mut row: Vec<(f64, f64)> = (0..4)
        .map(|i| {
            let n = g.node(&format!("c{i}")).unwrap();
            (n.x.unwrap(), n.width)
        })
        .collect();
    row.sort_by(|a, b| a.0.total_cmp(&b.0));
    for pair in row.windows(2) {
        let gap = (pair[1].0 - pair[1].1 / 2.0) - (pair[0].0 + pair[0].1 / 2.0);
        assert!(gap >= 50.0 - 1e-9, "gap {gap}");
    }
}
