use crate::config::DagDimensions;
use crate::geom::size;
use crate::model::{CustomNode, DagNode, GraphSpec, Group, Node, NodeState, NodeType};
use crate::sizing::*;

fn dims() -> DagDimensions {
    DagDimensions::default()
}

#[test]
fn stateless_nodes_reserve_no_icon_space() {
    let node = Node::new("a", NodeType::Execution);
    assert_eq!(leaf_size(&node, false, &dims()), size(240.0, 48.0));
}

#[test]
fn state_and_conditional_badges_widen_the_node() {
    let running = Node::new("a", NodeType::Execution).with_state(NodeState::Running);
    assert_eq!(leaf_size(&running, false, &dims()).width, 240.0 + 44.0);

    let conditional_running = Node {
        conditional_query: Some("x > 1".to_string()),
        ..running.clone()
    };
    assert_eq!(
        leaf_size(&conditional_running, false, &dims()).width,
        240.0 + 44.0 + 66.0
    );

    let conditional_only = Node {
        conditional_query: Some("x > 1".to_string()),
        ..Node::new("b", NodeType::Execution)
    };
    assert_eq!(leaf_size(&conditional_only, false, &dims()).width, 240.0 + 28.0);

    let blank_query = Node {
        conditional_query: Some("  ".to_string()),
        ..Node::new("c", NodeType::Execution)
    };
    assert_eq!(leaf_size(&blank_query, false, &dims()).width, 240.0);
}

#[test]
fn collapsed_artifacts_become_squares() {
    let artifact = Node::new("a", NodeType::Artifact).with_state(NodeState::Completed);
    assert_eq!(leaf_size(&artifact, true, &dims()), size(40.0, 40.0));
    assert_eq!(leaf_size(&artifact, false, &dims()).width, 284.0);

    let execution = Node::new("e", NodeType::Execution);
    assert_eq!(leaf_size(&execution, true, &dims()).width, 240.0);
}

#[test]
fn custom_nodes_keep_their_size() {
    let mut node = DagNode::Custom(CustomNode::new(
        Node::new("c", NodeType::Execution).with_state(NodeState::Failed),
        "tpl",
        100.0,
        30.0,
    ));
    apply_node_size(&mut node, true, &dims());
    assert_eq!(node.node().dims(), size(100.0, 30.0));
}

#[test]
fn collapsed_groups_are_padded() {
    let group = Group::new("g", GraphSpec::default());
    assert_eq!(group_size(&group, &dims()), size(256.0, 64.0));

    let custom = Group {
        custom_control_node: Some(CustomNode::new(
            Node::new("g", NodeType::Execution),
            "tpl",
            80.0,
            20.0,
        )),
        ..Group::new("g", GraphSpec::default())
    };
    assert_eq!(group_size(&custom, &dims()), size(96.0, 36.0));
}

#[test]
fn expanded_groups_fit_their_content() {
    let mut group = Group {
        expanded: true,
        expanded_dims: size(500.0, 300.0),
        pad_y: 80.0,
        ..Group::new("g", GraphSpec::default())
    };
    apply_group_size(&mut group, &dims());
    assert_eq!(group.dims(), size(500.0, 380.0));

    group.expanded_dims = size(10.0, 10.0);
    group.pad_y = 0.0;
    apply_group_size(&mut group, &dims());
    assert_eq!(group.dims(), size(256.0, 64.0));
}
