use super::edge::Edge;
use super::group::Group;
use super::node::{ArtifactRef, DagNode, NodeType};
use super::node_map::{NodeKind, NodeMap};
use serde::{Deserialize, Serialize};

/// One level of nesting: the root DAG or the inside of a group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphSpec {
    pub nodes: Vec<DagNode>,
    pub edges: Vec<Edge>,
    pub groups: Vec<Group>,
    #[serde(skip)]
    pub node_map: NodeMap,
}

impl GraphSpec {
    pub fn new(nodes: Vec<DagNode>, edges: Vec<Edge>, groups: Vec<Group>) -> Self {
        let node_map = NodeMap::build(&nodes, &edges, &groups);
        Self {
            nodes,
            edges,
            groups,
            node_map,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.groups.is_empty()
    }

    pub fn rebuild_node_map(&mut self) {
        self.node_map = NodeMap::build(&self.nodes, &self.edges, &self.groups);
    }

    fn node_index(&self, id: &str) -> Option<usize> {
        match self.node_map.nodes.get(id) {
            Some(entry) if self.nodes.get(entry.index).is_some_and(|n| n.id() == id) => {
                Some(entry.index)
            }
            _ => self.nodes.iter().position(|n| n.id() == id),
        }
    }

    fn group_index(&self, id: &str) -> Option<usize> {
        match self.node_map.groups.get(id) {
            Some(entry) if self.groups.get(entry.index).is_some_and(|g| g.id == id) => {
                Some(entry.index)
            }
            _ => self.groups.iter().position(|g| g.id == id),
        }
    }

    pub fn node(&self, id: &str) -> Option<&DagNode> {
        self.node_index(id).and_then(|i| self.nodes.get(i))
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut DagNode> {
        let i = self.node_index(id)?;
        self.nodes.get_mut(i)
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.group_index(id).and_then(|i| self.groups.get(i))
    }

    pub fn group_mut(&mut self, id: &str) -> Option<&mut Group> {
        let i = self.group_index(id)?;
        self.groups.get_mut(i)
    }

    /// Resolves `id` among the nodes and groups of this level.
    pub fn resolve(&self, id: &str) -> Option<NodeKind<'_>> {
        if let Some(node) = self.node(id) {
            return Some(NodeKind::from_dag_node(node));
        }
        self.group(id).map(NodeKind::Group)
    }

    pub fn edges_from(&self, id: &str) -> Vec<&Edge> {
        if self.node_map.contains(id) {
            return self.node_map.edges_from(id, &self.edges);
        }
        self.edges.iter().filter(|e| e.from == id).collect()
    }

    /// The level inside the groups named by `path`, outermost first.
    pub fn level_mut(&mut self, path: &[String]) -> Option<&mut GraphSpec> {
        let mut level = self;
        for group_id in path {
            level = &mut level.group_mut(group_id)?.dag;
        }
        Some(level)
    }

    /// Descends through the groups named by `path` (outermost first) and resolves `id` there.
    pub fn resolve_path(&self, path: &[String], id: &str) -> Option<NodeKind<'_>> {
        let mut level = self;
        for group_id in path {
            let Some(group) = level.group(group_id) else {
                tracing::debug!(group = %group_id, id, "selection path no longer resolves");
                return None;
            };
            level = &group.dag;
        }
        let found = level.resolve(id);
        if found.is_none() {
            tracing::debug!(?path, id, "entity not found at the end of the path");
        }
        found
    }

    pub fn resolve_artifact_ref(&self, artifact_ref: &ArtifactRef) -> Option<NodeKind<'_>> {
        let found = self.resolve_path(&artifact_ref.path, &artifact_ref.id);
        if found.is_none() {
            tracing::warn!(
                id = %artifact_ref.id,
                path = ?artifact_ref.path,
                "artifact reference points to a missing entity"
            );
        }
        found
    }

    /// Number of steps: execution nodes plus custom nodes that opt in, recursing into groups.
    /// Loop groups only count their displayed iteration.
    pub fn step_count(&self) -> usize {
        let own = self
            .nodes
            .iter()
            .filter(|n| match n {
                DagNode::Leaf(node) => node.node_type == NodeType::Execution,
                DagNode::Custom(custom) => custom.include_in_step_count,
            })
            .count();
        let nested: usize = self
            .groups
            .iter()
            .map(|group| {
                if !group.treat_as_loop {
                    return group.dag.step_count();
                }
                let Some(selected) = group.selected_iteration() else {
                    return 0;
                };
                match group.dag.resolve(selected) {
                    Some(NodeKind::Group(g)) => g.dag.step_count(),
                    Some(NodeKind::Leaf(n)) => usize::from(n.node_type == NodeType::Execution),
                    Some(NodeKind::Custom(c)) => usize::from(c.include_in_step_count),
                    None => 0,
                }
            })
            .sum();
        own + nested
    }

    /// Visits every group in this level and below, parents before children.
    pub fn for_each_group(&self, f: &mut dyn FnMut(&Group)) {
        for group in &self.groups {
            f(group);
            group.dag.for_each_group(f);
        }
    }
}
