use crate::error::Error;
use crate::model::{DagNode, NodeState, NodeType};
use crate::skeleton::*;
use serde_json::json;

fn table(value: serde_json::Value) -> StateTable {
    serde_json::from_value(value).unwrap()
}

fn shared_child_skeleton() -> Vec<DagNodeSkeleton> {
    vec![
        DagNodeSkeleton::execution("a").with_next(vec![DagNodeSkeleton::artifact("b")]),
        DagNodeSkeleton::execution("c").with_next(vec![DagNodeSkeleton::artifact("b")]),
    ]
}

#[test]
fn shared_children_are_built_once() {
    let spec = build_graph(&shared_child_skeleton(), &StateTable::new()).unwrap();
    assert_eq!(spec.nodes.len(), 3);
    assert_eq!(spec.edges.len(), 2);

    assert!(spec.edges_from("b").is_empty());
    let from_a = spec.edges_from("a");
    assert_eq!(from_a.len(), 1);
    assert!(from_a[0].connects("a", "b"));

    let inbound = spec.edges.iter().filter(|e| e.to == "b").count();
    assert_eq!(inbound, 2);
    assert_eq!(spec.node("b").unwrap().node().node_type, NodeType::Artifact);
}

#[test]
fn edges_keep_breadth_first_discovery_order() {
    let skeleton = vec![
        DagNodeSkeleton::execution("a").with_next(vec![
            DagNodeSkeleton::execution("b").with_next(vec![DagNodeSkeleton::execution("d")]),
        ]),
        DagNodeSkeleton::execution("c").with_next(vec![DagNodeSkeleton::execution("d")]),
    ];
    let spec = build_graph(&skeleton, &StateTable::new()).unwrap();
    let order: Vec<(&str, &str)> = spec
        .edges
        .iter()
        .map(|e| (e.from.as_str(), e.to.as_str()))
        .collect();
    assert_eq!(order, vec![("a", "b"), ("c", "d"), ("b", "d")]);
    let ids: Vec<&str> = spec.nodes.iter().map(DagNode::id).collect();
    assert_eq!(ids, vec!["a", "c", "b", "d"]);
}

#[test]
fn fresh_entities_are_unpositioned() {
    let spec = build_graph(&shared_child_skeleton(), &StateTable::new()).unwrap();
    for node in &spec.nodes {
        assert_eq!((node.node().x, node.node().y), (-1.0, -1.0));
    }
}

#[test]
fn metadata_populates_nodes() {
    let meta = table(json!({
        "a": {
            "state": "running",
            "displayName": "Train",
            "modifiers": ["bold"],
            "artifactRefs": [{"id": "x", "path": ["g"]}],
            "conditionalQuery": "epoch > 1"
        },
        "b": {"templateRef": "chip", "width": 120, "height": 30, "includeInStepCount": true}
    }));
    let spec = build_graph(&shared_child_skeleton(), &meta).unwrap();

    let a = spec.node("a").unwrap().node();
    assert_eq!(a.state, NodeState::Running);
    assert_eq!(a.display_name, "Train");
    assert!(a.modifiers.contains("bold"));
    assert_eq!(a.artifact_refs[0].path, vec!["g".to_string()]);
    assert!(a.has_conditional_query());

    let DagNode::Custom(b) = spec.node("b").unwrap() else {
        panic!("expected a custom node");
    };
    assert_eq!(b.template_ref, "chip");
    assert_eq!((b.node.width, b.node.height), (120.0, 30.0));
    assert!(b.include_in_step_count);

    assert_eq!(spec.node("c").unwrap().node().display_name, "c");
}

#[test]
fn unknown_metadata_keys_are_rejected() {
    let meta = table(json!({"a": {"colour": "red"}}));
    let err = build_graph(&shared_child_skeleton(), &meta).unwrap_err();
    assert!(matches!(err, Error::InvalidMeta { id, .. } if id == "a"));
}

#[test]
fn custom_nodes_need_explicit_dimensions() {
    let meta = table(json!({"a": {"templateRef": "chip"}}));
    let err = build_graph(&shared_child_skeleton(), &meta).unwrap_err();
    assert!(matches!(err, Error::InvalidMeta { .. }));
}

#[test]
fn groups_recurse_with_nested_metadata() {
    let skeleton = vec![DagNodeSkeleton::group(
        "g",
        vec![DagNodeSkeleton::execution("x").with_next(vec![DagNodeSkeleton::artifact("y")])],
    )];
    let meta = table(json!({
        "g": {
            "expanded": true,
            "hasControlNode": true,
            "groupMeta": {"x": {"state": "failed"}}
        }
    }));
    let spec = build_graph(&skeleton, &meta).unwrap();
    let g = spec.group("g").unwrap();
    assert!(g.expanded);
    assert!(g.has_control_node);
    assert_eq!(g.dag.nodes.len(), 2);
    assert_eq!(g.dag.edges.len(), 1);
    assert_eq!(g.dag.node("x").unwrap().node().state, NodeState::Failed);
    assert!(g.dag.node_map.contains("y"));
}

#[test]
fn groups_without_definition_fail() {
    let skeleton = vec![DagNodeSkeleton {
        definition: None,
        ..DagNodeSkeleton::group("g", Vec::new())
    }];
    let err = build_graph(&skeleton, &StateTable::new()).unwrap_err();
    assert!(matches!(err, Error::MissingDefinition { id } if id == "g"));
}

#[test]
fn loop_groups_must_not_declare_edges() {
    let skeleton = vec![DagNodeSkeleton::group(
        "loop",
        vec![DagNodeSkeleton::execution("i0").with_next(vec![DagNodeSkeleton::execution("i1")])],
    )];
    let meta = table(json!({"loop": {"treatAsLoop": true}}));
    let err = build_graph(&skeleton, &meta).unwrap_err();
    assert!(matches!(err, Error::LoopGroupHasEdges { id, edges: 1 } if id == "loop"));

    let unconnected = vec![DagNodeSkeleton::group(
        "loop",
        vec![DagNodeSkeleton::execution("i0"), DagNodeSkeleton::execution("i1")],
    )];
    let spec = build_graph(&unconnected, &meta).unwrap();
    assert_eq!(spec.groups[0].cached_selection.as_deref(), Some("i1"));
}

#[test]
fn custom_control_nodes_require_hide_on_expand() {
    let skeleton = vec![DagNodeSkeleton::group("g", vec![DagNodeSkeleton::execution("x")])];
    let custom = json!({"templateRef": "summary", "width": 100, "height": 40});

    let meta = table(json!({"g": {"customControlNode": custom.clone()}}));
    let err = build_graph(&skeleton, &meta).unwrap_err();
    assert!(matches!(err, Error::CustomControlNodeRequiresHide { id } if id == "g"));

    let meta = table(json!({
        "g": {"customControlNode": custom, "hideControlNodeOnExpand": true}
    }));
    let spec = build_graph(&skeleton, &meta).unwrap();
    let control = spec.groups[0].custom_control_node.as_ref().unwrap();
    assert_eq!(control.template_ref, "summary");
}

#[test]
fn skeletons_deserialize_with_edge_decorations() {
    let skeleton: Vec<DagNodeSkeleton> = serde_json::from_value(json!([
        {
            "id": "a",
            "type": "execution",
            "next": [
                {"id": "b", "type": "artifact", "edgeLabel": "writes", "edgeOpts": {"minlen": 2}}
            ]
        }
    ]))
    .unwrap();
    let spec = build_graph(&skeleton, &StateTable::new()).unwrap();
    let edge = &spec.edges[0];
    assert_eq!(edge.label.as_deref(), Some("writes"));
    assert_eq!(edge.minlen, Some(2));
}
