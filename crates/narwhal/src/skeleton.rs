//! Builds the entity model from a declarative skeleton plus per-id metadata.

use crate::error::{Error, Result};
use crate::model::{
    ArtifactRef, CustomNode, DagNode, Edge, EdgeOpts, GraphSpec, Group, Node, NodeState, NodeType,
};
use rustc_hash::FxHashSet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkeletonType {
    Execution,
    Artifact,
    Group,
}

/// One entry of a skeleton forest. `next` lists forward edges, `definition` the content of a
/// group. `edge_label` and `edge_opts` decorate the edge pointing at this entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DagNodeSkeleton {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SkeletonType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next: Vec<DagNodeSkeleton>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<Vec<DagNodeSkeleton>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_opts: Option<EdgeOpts>,
}

impl DagNodeSkeleton {
    fn leaf(id: impl Into<String>, kind: SkeletonType) -> Self {
        Self {
            id: id.into(),
            kind,
            next: Vec::new(),
            definition: None,
            edge_label: None,
            edge_opts: None,
        }
    }

    pub fn execution(id: impl Into<String>) -> Self {
        Self::leaf(id, SkeletonType::Execution)
    }

    pub fn artifact(id: impl Into<String>) -> Self {
        Self::leaf(id, SkeletonType::Artifact)
    }

    pub fn group(id: impl Into<String>, definition: Vec<DagNodeSkeleton>) -> Self {
        Self {
            definition: Some(definition),
            ..Self::leaf(id, SkeletonType::Group)
        }
    }

    pub fn with_next(mut self, next: Vec<DagNodeSkeleton>) -> Self {
        self.next = next;
        self
    }

    pub fn with_edge_label(mut self, label: impl Into<String>) -> Self {
        self.edge_label = Some(label.into());
        self
    }
}

/// Per-id metadata. Group entries nest their children's table under `groupMeta`.
pub type StateTable = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct NodeMeta {
    pub state: NodeState,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub callout: Option<String>,
    pub tooltips: Vec<String>,
    pub modifiers: BTreeSet<String>,
    pub artifact_refs: Vec<ArtifactRef>,
    pub conditional_query: Option<String>,
    pub template_ref: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub include_in_step_count: bool,
    pub hide_edge_markers: bool,
    pub minimap_template_ref: Option<String>,
}

impl NodeMeta {
    fn into_node(self, id: &str, node_type: NodeType) -> Result<DagNode> {
        let node = Node {
            state: self.state,
            display_name: self.display_name.unwrap_or_else(|| id.to_string()),
            description: self.description.unwrap_or_default(),
            icon: self.icon,
            callout: self.callout,
            tooltips: self.tooltips,
            modifiers: self.modifiers,
            artifact_refs: self.artifact_refs,
            conditional_query: self.conditional_query,
            ..Node::new(id, node_type)
        };
        let Some(template_ref) = self.template_ref else {
            return Ok(DagNode::Leaf(node));
        };
        let (Some(width), Some(height)) = (self.width, self.height) else {
            return Err(Error::InvalidMeta {
                id: id.to_string(),
                message: "custom nodes need an explicit width and height".to_string(),
            });
        };
        let mut custom = CustomNode::new(node, template_ref, width, height);
        custom.include_in_step_count = self.include_in_step_count;
        custom.hide_edge_markers = self.hide_edge_markers;
        custom.minimap_template_ref = self.minimap_template_ref;
        Ok(DagNode::Custom(custom))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct GroupMeta {
    pub state: NodeState,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub tooltips: Vec<String>,
    pub modifiers: BTreeSet<String>,
    pub conditional_query: Option<String>,
    pub expanded: bool,
    pub has_control_node: bool,
    pub custom_control_node: Option<NodeMeta>,
    pub hide_control_node_on_expand: bool,
    pub treat_as_loop: bool,
    pub selected_loop_id: Option<String>,
    pub group_meta: StateTable,
}

fn parse_meta<T: DeserializeOwned + Default>(id: &str, meta: &StateTable) -> Result<T> {
    let Some(value) = meta.get(id) else {
        return Ok(T::default());
    };
    serde_json::from_value(value.clone()).map_err(|err| Error::InvalidMeta {
        id: id.to_string(),
        message: err.to_string(),
    })
}

/// Builds one level from a skeleton forest.
///
/// Entries are visited breadth first. An id seen before is reused and only contributes new
/// outgoing edges, so several parents can share one child. Edges are kept in discovery order.
pub fn build_graph(skeleton: &[DagNodeSkeleton], meta: &StateTable) -> Result<GraphSpec> {
    let mut nodes: Vec<DagNode> = Vec::new();
    let mut groups: Vec<Group> = Vec::new();
    let mut edges: Vec<Edge> = Vec::new();
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut connected: FxHashSet<(&str, &str)> = FxHashSet::default();
    let mut queue: VecDeque<&DagNodeSkeleton> = skeleton.iter().collect();

    while let Some(entry) = queue.pop_front() {
        if seen.insert(entry.id.as_str()) {
            match entry.kind {
                SkeletonType::Group => groups.push(build_group(entry, meta)?),
                SkeletonType::Execution | SkeletonType::Artifact => {
                    let node_type = if entry.kind == SkeletonType::Artifact {
                        NodeType::Artifact
                    } else {
                        NodeType::Execution
                    };
                    let node_meta: NodeMeta = parse_meta(&entry.id, meta)?;
                    nodes.push(node_meta.into_node(&entry.id, node_type)?);
                }
            }
        } else {
            tracing::trace!(id = %entry.id, "reusing entity declared earlier");
        }

        for child in &entry.next {
            if connected.insert((entry.id.as_str(), child.id.as_str())) {
                edges.push(edge_to(&entry.id, child));
            }
            queue.push_back(child);
        }
    }

    Ok(GraphSpec::new(nodes, edges, groups))
}

fn edge_to(from: &str, child: &DagNodeSkeleton) -> Edge {
    let mut edge = Edge::new(from, child.id.clone());
    edge.label.clone_from(&child.edge_label);
    if let Some(opts) = &child.edge_opts {
        opts.apply(&mut edge);
    }
    edge
}

fn build_group(entry: &DagNodeSkeleton, meta: &StateTable) -> Result<Group> {
    let Some(definition) = entry.definition.as_deref() else {
        return Err(Error::MissingDefinition {
            id: entry.id.clone(),
        });
    };
    let group_meta: GroupMeta = parse_meta(&entry.id, meta)?;
    let dag = build_graph(definition, &group_meta.group_meta)?;

    if group_meta.treat_as_loop && !dag.edges.is_empty() {
        return Err(Error::LoopGroupHasEdges {
            id: entry.id.clone(),
            edges: dag.edges.len(),
        });
    }

    let custom_control_node = match group_meta.custom_control_node {
        Some(custom_meta) => {
            if !group_meta.hide_control_node_on_expand {
                return Err(Error::CustomControlNodeRequiresHide {
                    id: entry.id.clone(),
                });
            }
            match custom_meta.into_node(&entry.id, NodeType::Execution)? {
                DagNode::Custom(custom) => Some(custom),
                DagNode::Leaf(_) => {
                    return Err(Error::InvalidMeta {
                        id: entry.id.clone(),
                        message: "customControlNode needs a templateRef".to_string(),
                    });
                }
            }
        }
        None => None,
    };

    let mut group = Group {
        state: group_meta.state,
        display_name: group_meta
            .display_name
            .unwrap_or_else(|| entry.id.clone()),
        description: group_meta.description.unwrap_or_default(),
        icon: group_meta.icon,
        tooltips: group_meta.tooltips,
        modifiers: group_meta.modifiers,
        conditional_query: group_meta.conditional_query,
        expanded: group_meta.expanded,
        has_control_node: group_meta.has_control_node,
        custom_control_node,
        hide_control_node_on_expand: group_meta.hide_control_node_on_expand,
        treat_as_loop: group_meta.treat_as_loop,
        selected_loop_id: group_meta.selected_loop_id,
        ..Group::new(entry.id.clone(), dag)
    };
    group.resolve_loop_selection();
    Ok(group)
}
