use crate::geom::point;
use crate::model::*;

fn leaf(id: &str, node_type: NodeType) -> DagNode {
    DagNode::from(Node::new(id, node_type))
}

fn loop_group(selected: Option<&str>) -> Group {
    let iterations = GraphSpec::new(
        Vec::new(),
        Vec::new(),
        vec![
            Group::new(
                "it0",
                GraphSpec::new(vec![leaf("step", NodeType::Execution)], Vec::new(), Vec::new()),
            ),
            Group::new(
                "it1",
                GraphSpec::new(
                    vec![leaf("s1", NodeType::Execution), leaf("s2", NodeType::Execution)],
                    Vec::new(),
                    Vec::new(),
                ),
            ),
        ],
    );
    Group {
        treat_as_loop: true,
        selected_loop_id: selected.map(str::to_string),
        ..Group::new("loop", iterations)
    }
}

#[test]
fn collapsed_group_generates_an_execution_control_node() {
    let mut group = Group {
        has_control_node: true,
        expanded: false,
        state: NodeState::Running,
        ..Group::new("g", GraphSpec::default())
    };
    let control = group.generate_control_node().unwrap();
    assert_eq!(control.id(), "g");
    assert_eq!(control.node().node_type, NodeType::Execution);
    assert_eq!(control.node().state, NodeState::Running);
    assert!(control.as_custom().is_none());
}

#[test]
fn control_node_keeps_its_position_across_regeneration() {
    let mut group = Group {
        has_control_node: true,
        ..Group::new("g", GraphSpec::default())
    };
    group.generate_control_node();
    if let Some(control) = group.control_node.as_mut() {
        control.node_mut().x = 12.0;
        control.node_mut().y = 16.0;
    }
    let control = group.generate_control_node().unwrap();
    assert_eq!(control.node().position(), point(12.0, 16.0));
}

#[test]
fn groups_without_control_node_generate_none() {
    let mut group = Group::new("g", GraphSpec::default());
    assert!(group.generate_control_node().is_none());
}

#[test]
fn custom_control_node_takes_the_group_id() {
    let mut group = Group {
        custom_control_node: Some(CustomNode::new(
            Node::new("other", NodeType::Execution),
            "tpl",
            50.0,
            20.0,
        )),
        hide_control_node_on_expand: true,
        ..Group::new("g", GraphSpec::default())
    };
    let control = group.generate_control_node().unwrap();
    assert_eq!(control.id(), "g");
    assert!(control.as_custom().is_some());
}

#[test]
fn loop_selection_falls_back_to_the_last_iteration() {
    let mut group = loop_group(Some("it0"));
    assert_eq!(group.resolve_loop_selection(), Some("it0"));
    assert_eq!(group.cached_selection.as_deref(), Some("it0"));

    let mut group = loop_group(Some("missing"));
    assert_eq!(group.resolve_loop_selection(), Some("it1"));

    let mut group = loop_group(None);
    assert_eq!(group.resolve_loop_selection(), Some("it1"));

    let mut plain = Group::new("g", GraphSpec::default());
    assert_eq!(plain.resolve_loop_selection(), None);
}

#[test]
fn node_map_indexes_nodes_groups_and_outgoing_edges() {
    let spec = GraphSpec::new(
        vec![leaf("a", NodeType::Execution), leaf("b", NodeType::Artifact)],
        vec![Edge::new("a", "b"), Edge::new("g", "a"), Edge::new("a", "g")],
        vec![Group::new("g", GraphSpec::default())],
    );
    let map = &spec.node_map;
    assert_eq!(map.len(), 3);
    assert_eq!(map.nodes["a"].edges, vec![0, 2]);
    assert_eq!(map.groups["g"].edges, vec![1]);
    assert!(map.nodes["b"].edges.is_empty());
    assert!(matches!(spec.resolve("g"), Some(NodeKind::Group(_))));
    assert!(matches!(spec.resolve("b"), Some(NodeKind::Leaf(_))));
    assert!(spec.resolve("zzz").is_none());
}

#[test]
fn lookups_survive_a_stale_node_map() {
    let mut spec = GraphSpec::new(
        vec![leaf("a", NodeType::Execution), leaf("b", NodeType::Execution)],
        Vec::new(),
        Vec::new(),
    );
    spec.nodes.remove(0);
    assert_eq!(spec.node("b").map(DagNode::id), Some("b"));
    assert!(spec.node("a").is_none());
    spec.rebuild_node_map();
    assert_eq!(spec.node_map.nodes["b"].index, 0);
}

#[test]
fn paths_resolve_through_nested_groups() {
    let inner = GraphSpec::new(vec![leaf("art", NodeType::Artifact)], Vec::new(), Vec::new());
    let middle = GraphSpec::new(Vec::new(), Vec::new(), vec![Group::new("inner", inner)]);
    let spec = GraphSpec::new(Vec::new(), Vec::new(), vec![Group::new("outer", middle)]);

    let path = vec!["outer".to_string(), "inner".to_string()];
    let found = spec.resolve_path(&path, "art").unwrap();
    assert_eq!(found.id(), "art");
    assert!(spec.resolve_path(&["outer".to_string()], "inner").unwrap().as_group().is_some());
    assert!(spec.resolve_path(&["nope".to_string()], "art").is_none());

    let good = ArtifactRef {
        id: "art".to_string(),
        path: path.clone(),
    };
    assert!(spec.resolve_artifact_ref(&good).unwrap().as_node().is_some());
    let stale = ArtifactRef {
        id: "deleted".to_string(),
        path,
    };
    assert!(spec.resolve_artifact_ref(&stale).is_none());
}

#[test]
fn step_count_counts_executions_and_opted_in_custom_nodes() {
    let mut custom = CustomNode::new(Node::new("c", NodeType::Execution), "tpl", 10.0, 10.0);
    custom.include_in_step_count = true;
    let hidden = CustomNode::new(Node::new("h", NodeType::Execution), "tpl", 10.0, 10.0);

    let nested = GraphSpec::new(vec![leaf("n", NodeType::Execution)], Vec::new(), Vec::new());
    let spec = GraphSpec::new(
        vec![
            leaf("e", NodeType::Execution),
            leaf("a", NodeType::Artifact),
            DagNode::Custom(custom),
            DagNode::Custom(hidden),
        ],
        Vec::new(),
        vec![Group::new("g", nested), loop_group(Some("it0"))],
    );
    assert_eq!(spec.step_count(), 2 + 1 + 1);

    let spec = GraphSpec::new(Vec::new(), Vec::new(), vec![loop_group(None)]);
    assert_eq!(spec.step_count(), 2);
}

#[test]
fn level_mut_walks_the_group_path() {
    let inner = GraphSpec::new(vec![leaf("x", NodeType::Execution)], Vec::new(), Vec::new());
    let mut spec = GraphSpec::new(Vec::new(), Vec::new(), vec![Group::new("g", inner)]);
    let level = spec.level_mut(&["g".to_string()]).unwrap();
    assert!(level.node("x").is_some());
    assert!(spec.level_mut(&["missing".to_string()]).is_none());
}

#[test]
fn graph_spec_serializes_with_camel_case_fields() {
    let mut node = Node::new("a", NodeType::Artifact);
    node.css_transform = "translate(1px, 2px)".to_string();
    let spec = GraphSpec::new(vec![DagNode::from(node)], vec![Edge::new("a", "a")], Vec::new());
    let value = serde_json::to_value(&spec).unwrap();
    assert_eq!(value["nodes"][0]["type"], "artifact");
    assert_eq!(value["nodes"][0]["cssTransform"], "translate(1px, 2px)");
    assert_eq!(value["edges"][0]["from"], "a");

    let back: GraphSpec = serde_json::from_value(value).unwrap();
    assert_eq!(back.nodes, spec.nodes);
}
