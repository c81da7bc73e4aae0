//! Box sizes for nodes and groups.

use crate::config::DagDimensions;
use crate::geom::{Dimension, size};
use crate::model::{DagNode, Group, Node, NodeState, NodeType};

/// Width reserved for icons next to the text area.
pub fn icon_reservation(state: NodeState, has_conditional: bool, dims: &DagDimensions) -> f64 {
    let state_icon = if state.has_state() { dims.icon_space } else { 0.0 };
    let conditional = match (has_conditional, state.has_state()) {
        (false, _) => 0.0,
        (true, true) => dims.icon_space * 1.5,
        (true, false) => dims.conditional_icon_space,
    };
    state_icon + conditional
}

/// The generic box: the fixed text area plus whatever icon slots the state and conditional
/// badge need.
pub fn base_size(state: NodeState, has_conditional: bool, dims: &DagDimensions) -> Dimension {
    size(
        dims.node_width + icon_reservation(state, has_conditional, dims),
        dims.node_height,
    )
}

pub fn leaf_size(node: &Node, collapse_artifacts: bool, dims: &DagDimensions) -> Dimension {
    if collapse_artifacts && node.node_type == NodeType::Artifact {
        return size(dims.condensed_icon_width, dims.condensed_icon_width);
    }
    base_size(node.state, node.has_conditional_query(), dims)
}

/// Custom nodes keep the size their caller supplied.
pub fn node_size(node: &DagNode, collapse_artifacts: bool, dims: &DagDimensions) -> Dimension {
    match node {
        DagNode::Custom(custom) => size(custom.node.width, custom.node.height),
        DagNode::Leaf(leaf) => leaf_size(leaf, collapse_artifacts, dims),
    }
}

/// Group box. Expanded groups grow to fit their laid out content plus `pad_y`.
pub fn group_size(group: &Group, dims: &DagDimensions) -> Dimension {
    let base = match &group.custom_control_node {
        Some(custom) => size(custom.node.width, custom.node.height),
        None => base_size(group.state, group.has_conditional_query(), dims),
    };
    let mut width = base.width + dims.group_padding * dims.group_pad_multiplier_x;
    let mut height = base.height + dims.group_padding * dims.group_pad_multiplier_y;
    if group.expanded {
        width = width.max(group.expanded_dims.width);
        height = height.max(group.expanded_dims.height + group.pad_y);
    }
    size(width, height)
}

pub fn apply_node_size(node: &mut DagNode, collapse_artifacts: bool, dims: &DagDimensions) {
    let dims = node_size(node, collapse_artifacts, dims);
    let node = node.node_mut();
    node.width = dims.width;
    node.height = dims.height;
}

pub fn apply_group_size(group: &mut Group, dims: &DagDimensions) {
    let dims = group_size(group, dims);
    group.width = dims.width;
    group.height = dims.height;
}
