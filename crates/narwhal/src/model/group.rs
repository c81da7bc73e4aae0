use super::node::{CustomNode, DagNode, Node, NodeState, NodeType, UNSET};
use super::spec::GraphSpec;
use crate::geom::{Dimension, Point, point, size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A collapsible sub-DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Group {
    pub id: String,
    pub state: NodeState,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub css_transform: String,
    pub display_name: String,
    pub description: String,
    pub icon: Option<String>,
    pub tooltips: Vec<String>,
    pub modifiers: BTreeSet<String>,
    pub conditional_query: Option<String>,
    #[serde(flatten)]
    pub dag: GraphSpec,
    pub expanded: bool,
    pub has_control_node: bool,
    pub custom_control_node: Option<CustomNode>,
    pub hide_control_node_on_expand: bool,
    pub treat_as_loop: bool,
    pub selected_loop_id: Option<String>,
    /// Size of the laid out sub-DAG, excluding the control node band.
    pub expanded_dims: Dimension,
    /// Vertical space reserved above the sub-DAG while expanded.
    pub pad_y: f64,
    #[serde(rename = "_cachedSelection")]
    pub cached_selection: Option<String>,
    /// Stand-in node; positioned inside the group while expanded.
    #[serde(skip)]
    pub control_node: Option<DagNode>,
}

impl Default for Group {
    fn default() -> Self {
        Self {
            id: String::new(),
            state: NodeState::NoState,
            x: UNSET,
            y: UNSET,
            width: 0.0,
            height: 0.0,
            css_transform: String::new(),
            display_name: String::new(),
            description: String::new(),
            icon: None,
            tooltips: Vec::new(),
            modifiers: BTreeSet::new(),
            conditional_query: None,
            dag: GraphSpec::default(),
            expanded: false,
            has_control_node: false,
            custom_control_node: None,
            hide_control_node_on_expand: false,
            treat_as_loop: false,
            selected_loop_id: None,
            expanded_dims: size(0.0, 0.0),
            pad_y: 0.0,
            cached_selection: None,
            control_node: None,
        }
    }
}

impl Group {
    pub fn new(id: impl Into<String>, dag: GraphSpec) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            dag,
            ..Default::default()
        }
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

    /// Whether a stand-in node represents this group at all.
    pub fn uses_control_node(&self) -> bool {
        self.has_control_node || self.custom_control_node.is_some()
    }

    /// Whether the control node is drawn inside the expanded group.
    pub fn shows_control_node_expanded(&self) -> bool {
        self.expanded && self.uses_control_node() && !self.hide_control_node_on_expand
    }

    /// Returns the stand-in node, deriving it on first use.
    ///
    /// A custom control node is used as given; otherwise an execution node mirroring the
    /// group's state and display metadata is synthesized. Either way it carries the group's id so
    /// edges addressed to the group resolve to it.
    pub fn generate_control_node(&mut self) -> Option<&DagNode> {
        if !self.uses_control_node() {
            self.control_node = None;
            return None;
        }
        let mut fresh = match &self.custom_control_node {
            Some(custom) => {
                let mut custom = custom.clone();
                custom.node.id.clone_from(&self.id);
                DagNode::Custom(custom)
            }
            None => DagNode::Leaf(Node {
                state: self.state,
                display_name: self.display_name.clone(),
                description: self.description.clone(),
                icon: self.icon.clone(),
                tooltips: self.tooltips.clone(),
                conditional_query: self.conditional_query.clone(),
                ..Node::new(self.id.clone(), NodeType::Execution)
            }),
        };
        if let Some(old) = self.control_node.as_ref().map(DagNode::node) {
            let node = fresh.node_mut();
            node.x = old.x;
            node.y = old.y;
            node.css_transform.clone_from(&old.css_transform);
        }
        self.control_node = Some(fresh);
        self.control_node.as_ref()
    }

    /// Ids of the iterations of a loop group, nodes first.
    pub fn iteration_ids(&self) -> Vec<&str> {
        self.dag
            .nodes
            .iter()
            .map(DagNode::id)
            .chain(self.dag.groups.iter().map(|g| g.id.as_str()))
            .collect()
    }

    /// Picks the iteration to display without touching the cache.
    pub fn selected_iteration(&self) -> Option<&str> {
        if !self.treat_as_loop {
            return None;
        }
        let ids = self.iteration_ids();
        if let Some(selected) = self.selected_loop_id.as_deref() {
            if let Some(found) = ids.iter().find(|id| **id == selected) {
                return Some(*found);
            }
        }
        ids.last().copied()
    }

    /// Resolves `selected_loop_id` among the iterations and stores the result in
    /// `cached_selection`. An unknown id falls back to the last iteration.
    pub fn resolve_loop_selection(&mut self) -> Option<&str> {
        if !self.treat_as_loop {
            self.cached_selection = None;
            return None;
        }
        if let Some(selected) = self.selected_loop_id.as_deref() {
            if !self.iteration_ids().contains(&selected) {
                tracing::warn!(
                    group = %self.id,
                    selected,
                    "selected loop iteration not found; falling back to the last iteration"
                );
            }
        }
        self.cached_selection = self.selected_iteration().map(str::to_string);
        self.cached_selection.as_deref()
    }
}
