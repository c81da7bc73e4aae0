use crate::geom::{Dimension, Point, point, size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Position sentinel for entities that have not been through a layout pass yet.
pub const UNSET: f64 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Artifact,
    #[default]
    Execution,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum NodeState {
    #[default]
    NoState,
    Pending,
    Running,
    Completed,
    Failed,
    Skipped,
    Cancelled,
    Cancelling,
    Paused,
    Queued,
    Warning,
    Cached,
    Timeout,
    Unknown,
    NotTriggered,
}

impl NodeState {
    pub const ALL: [NodeState; 15] = [
        NodeState::NoState,
        NodeState::Pending,
        NodeState::Running,
        NodeState::Completed,
        NodeState::Failed,
        NodeState::Skipped,
        NodeState::Cancelled,
        NodeState::Cancelling,
        NodeState::Paused,
        NodeState::Queued,
        NodeState::Warning,
        NodeState::Cached,
        NodeState::Timeout,
        NodeState::Unknown,
        NodeState::NotTriggered,
    ];

    /// `false` only for [`NodeState::NoState`]; such nodes reserve no state icon.
    pub fn has_state(self) -> bool {
        self != NodeState::NoState
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeState::NoState => "noState",
            NodeState::Pending => "pending",
            NodeState::Running => "running",
            NodeState::Completed => "completed",
            NodeState::Failed => "failed",
            NodeState::Skipped => "skipped",
            NodeState::Cancelled => "cancelled",
            NodeState::Cancelling => "cancelling",
            NodeState::Paused => "paused",
            NodeState::Queued => "queued",
            NodeState::Warning => "warning",
            NodeState::Cached => "cached",
            NodeState::Timeout => "timeout",
            NodeState::Unknown => "unknown",
            NodeState::NotTriggered => "notTriggered",
        }
    }
}

/// Cross-reference to a node elsewhere in the tree. `path` lists the ancestor group ids,
/// outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ArtifactRef {
    pub id: String,
    #[serde(default)]
    pub path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub state: NodeState,
    /// Top-left corner in the coordinate space of the enclosing level.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub css_transform: String,
    pub display_name: String,
    pub description: String,
    pub icon: Option<String>,
    pub callout: Option<String>,
    pub tooltips: Vec<String>,
    pub modifiers: BTreeSet<String>,
    pub artifact_refs: Vec<ArtifactRef>,
    pub conditional_query: Option<String>,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            id: String::new(),
            node_type: NodeType::Execution,
            state: NodeState::NoState,
            x: UNSET,
            y: UNSET,
            width: 0.0,
            height: 0.0,
            css_transform: String::new(),
            display_name: String::new(),
            description: String::new(),
            icon: None,
            callout: None,
            tooltips: Vec::new(),
            modifiers: BTreeSet::new(),
            artifact_refs: Vec::new(),
            conditional_query: None,
        }
    }
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            node_type,
            ..Default::default()
        }
    }

    pub fn with_state(mut self, state: NodeState) -> Self {
        self.state = state;
        self
    }

    pub fn position(&self) -> Point {
        point(self.x, self.y)
    }

    pub fn dims(&self) -> Dimension {
        size(self.width, self.height)
    }

    pub fn has_conditional_query(&self) -> bool {
        self.conditional_query
            .as_deref()
            .is_some_and(|q| !q.trim().is_empty())
    }
}

/// A node rendered from an external template. Its size is supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomNode {
    #[serde(flatten)]
    pub node: Node,
    pub template_ref: String,
    #[serde(default)]
    pub include_in_step_count: bool,
    #[serde(default)]
    pub hide_edge_markers: bool,
    #[serde(default)]
    pub minimap_template_ref: Option<String>,
}

impl CustomNode {
    pub fn new(node: Node, template_ref: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            node: Node {
                width,
                height,
                ..node
            },
            template_ref: template_ref.into(),
            include_in_step_count: false,
            hide_edge_markers: false,
            minimap_template_ref: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DagNode {
    Custom(CustomNode),
    Leaf(Node),
}

impl DagNode {
    pub fn node(&self) -> &Node {
        match self {
            DagNode::Leaf(n) => n,
            DagNode::Custom(c) => &c.node,
        }
    }

    pub fn node_mut(&mut self) -> &mut Node {
        match self {
            DagNode::Leaf(n) => n,
            DagNode::Custom(c) => &mut c.node,
        }
    }

    pub fn id(&self) -> &str {
        &self.node().id
    }

    pub fn as_custom(&self) -> Option<&CustomNode> {
        match self {
            DagNode::Custom(c) => Some(c),
            DagNode::Leaf(_) => None,
        }
    }
}

impl From<Node> for DagNode {
    fn from(node: Node) -> Self {
        DagNode::Leaf(node)
    }
}

impl From<CustomNode> for DagNode {
    fn from(node: CustomNode) -> Self {
        DagNode::Custom(node)
    }
}
