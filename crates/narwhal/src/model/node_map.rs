//! Id index over one level of a [`GraphSpec`](super::GraphSpec).

use super::edge::Edge;
use super::group::Group;
use super::node::{CustomNode, DagNode, Node};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// Resolved entity at one level, dispatched by kind.
#[derive(Debug, Clone, Copy)]
pub enum NodeKind<'a> {
    Leaf(&'a Node),
    Custom(&'a CustomNode),
    Group(&'a Group),
}

impl<'a> NodeKind<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            NodeKind::Leaf(n) => &n.id,
            NodeKind::Custom(c) => &c.node.id,
            NodeKind::Group(g) => &g.id,
        }
    }

    pub fn from_dag_node(node: &'a DagNode) -> Self {
        match node {
            DagNode::Leaf(n) => NodeKind::Leaf(n),
            DagNode::Custom(c) => NodeKind::Custom(c),
        }
    }

    /// The plain node behind a leaf or custom node.
    pub fn as_node(&self) -> Option<&'a Node> {
        match self {
            NodeKind::Leaf(n) => Some(n),
            NodeKind::Custom(c) => Some(&c.node),
            NodeKind::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&'a Group> {
        match self {
            NodeKind::Group(g) => Some(g),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEntry {
    /// Position in `nodes` or `groups`.
    pub index: usize,
    /// Indices into `edges` of the edges leaving this entity, in edge-list order.
    pub edges: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMap {
    pub nodes: IndexMap<String, MapEntry, FxBuildHasher>,
    pub groups: IndexMap<String, MapEntry, FxBuildHasher>,
}

impl NodeMap {
    pub fn build(nodes: &[DagNode], edges: &[Edge], groups: &[Group]) -> Self {
        let mut map = NodeMap::default();
        for (index, node) in nodes.iter().enumerate() {
            if map.nodes.contains_key(node.id()) {
                tracing::warn!(id = node.id(), "duplicate node id; keeping the first");
                continue;
            }
            map.nodes.insert(
                node.id().to_string(),
                MapEntry {
                    index,
                    edges: Vec::new(),
                },
            );
        }
        for (index, group) in groups.iter().enumerate() {
            if map.groups.contains_key(&group.id) || map.nodes.contains_key(&group.id) {
                tracing::warn!(id = %group.id, "group id collides with a sibling; keeping the first");
                continue;
            }
            map.groups.insert(
                group.id.clone(),
                MapEntry {
                    index,
                    edges: Vec::new(),
                },
            );
        }
        for (i, edge) in edges.iter().enumerate() {
            if let Some(entry) = map.nodes.get_mut(&edge.from) {
                entry.edges.push(i);
            } else if let Some(entry) = map.groups.get_mut(&edge.from) {
                entry.edges.push(i);
            }
        }
        map
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id) || self.groups.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len() + self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.groups.is_empty()
    }

    pub fn entry(&self, id: &str) -> Option<&MapEntry> {
        self.nodes.get(id).or_else(|| self.groups.get(id))
    }

    /// Edges leaving `id`; empty for unknown ids.
    pub fn edges_from<'e>(&self, id: &str, edges: &'e [Edge]) -> Vec<&'e Edge> {
        self.entry(id)
            .map(|entry| entry.edges.iter().filter_map(|&i| edges.get(i)).collect())
            .unwrap_or_default()
    }
}
