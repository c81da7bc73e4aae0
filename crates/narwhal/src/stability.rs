//! Decides whether a data update is an incremental edit or a reset, and carries positions
//! across full object replacement.

use crate::model::{DagNode, Edge, GraphSpec, Group, Node};
use rustc_hash::FxHashMap;

/// Entities that a layout pass positions.
pub trait Positioned {
    /// `true` once a layout pass has positioned this entity.
    fn is_dagre_initialized(&self) -> bool;
}

impl Positioned for Node {
    fn is_dagre_initialized(&self) -> bool {
        self.x > -1.0 && self.y > -1.0
    }
}

impl Positioned for DagNode {
    fn is_dagre_initialized(&self) -> bool {
        self.node().is_dagre_initialized()
    }
}

impl Positioned for Group {
    fn is_dagre_initialized(&self) -> bool {
        self.x > -1.0 && self.y > -1.0
    }
}

impl Positioned for Edge {
    fn is_dagre_initialized(&self) -> bool {
        !self.points.is_empty()
    }
}

/// A non-empty collection whose every element is already positioned.
pub fn all_initialized<T: Positioned>(items: &[T]) -> bool {
    !items.is_empty() && items.iter().all(Positioned::is_dagre_initialized)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// Everything incoming is already positioned; nothing to redo.
    AlreadyPositioned,
    /// An edit of the previous data; positions were carried over.
    Crud,
    /// A new dataset; needs a full layout and minimap refresh.
    Reset,
}

impl UpdateKind {
    pub fn is_dirty(self) -> bool {
        self == UpdateKind::Reset
    }
}

/// Copies layout results from `previous` onto entities of `next` with matching ids, recursing
/// into matching groups. Edges match by endpoints. Returns how many positioned entities matched.
pub fn copy_layout_from(previous: &GraphSpec, next: &mut GraphSpec) -> usize {
    let mut matched = 0;

    let old_nodes: FxHashMap<&str, &Node> =
        previous.nodes.iter().map(|n| (n.id(), n.node())).collect();
    for node in next.nodes.iter_mut() {
        let Some(old) = old_nodes.get(node.id()) else {
            continue;
        };
        if !old.is_dagre_initialized() {
            continue;
        }
        let node = node.node_mut();
        node.x = old.x;
        node.y = old.y;
        node.css_transform.clone_from(&old.css_transform);
        matched += 1;
    }

    let old_groups: FxHashMap<&str, &Group> =
        previous.groups.iter().map(|g| (g.id.as_str(), g)).collect();
    for group in next.groups.iter_mut() {
        let Some(old) = old_groups.get(group.id.as_str()) else {
            continue;
        };
        matched += copy_layout_from(&old.dag, &mut group.dag);
        if !old.is_dagre_initialized() {
            continue;
        }
        group.x = old.x;
        group.y = old.y;
        group.width = old.width;
        group.height = old.height;
        group.pad_y = old.pad_y;
        group.expanded_dims = old.expanded_dims;
        group.cached_selection.clone_from(&old.cached_selection);
        group.css_transform.clone_from(&old.css_transform);
        matched += 1;
    }

    let old_edges: FxHashMap<(&str, &str), &Edge> = previous
        .edges
        .iter()
        .map(|e| ((e.from.as_str(), e.to.as_str()), e))
        .collect();
    for edge in next.edges.iter_mut() {
        let Some(old) = old_edges.get(&(edge.from.as_str(), edge.to.as_str())) else {
            continue;
        };
        if !old.is_dagre_initialized() {
            continue;
        }
        edge.points.clone_from(&old.points);
        edge.label_position = old.label_position;
        matched += 1;
    }

    matched
}

/// Tracks the dirty flags of one widget across data updates.
#[derive(Debug, Clone, Default)]
pub struct UpdateTracker {
    pub optimize_for_orm: bool,
    graph_dirty: bool,
    minimap_dirty: bool,
}

impl UpdateTracker {
    pub fn new(optimize_for_orm: bool) -> Self {
        Self {
            optimize_for_orm,
            ..Default::default()
        }
    }

    pub fn is_graph_dirty(&self) -> bool {
        self.graph_dirty
    }

    pub fn is_minimap_dirty(&self) -> bool {
        self.minimap_dirty
    }

    /// A single collection was reassigned. Marks the graph dirty unless every element is
    /// already positioned.
    pub fn observe<T: Positioned>(&mut self, items: &[T]) -> bool {
        if all_initialized(items) {
            return false;
        }
        self.mark_dirty();
        true
    }

    /// Classifies a full replacement of the data. In ORM mode positions are first carried
    /// over from `previous`.
    pub fn apply(&mut self, previous: Option<&GraphSpec>, incoming: &mut GraphSpec) -> UpdateKind {
        let populated = [
            (!incoming.nodes.is_empty(), all_initialized(&incoming.nodes)),
            (!incoming.groups.is_empty(), all_initialized(&incoming.groups)),
            (!incoming.edges.is_empty(), all_initialized(&incoming.edges)),
        ];
        let any_populated = populated.iter().any(|(present, _)| *present);
        let positioned = populated
            .iter()
            .all(|(present, initialized)| !present || *initialized);
        if any_populated && positioned {
            tracing::debug!("incoming data already positioned");
            return UpdateKind::AlreadyPositioned;
        }

        if self.optimize_for_orm {
            if let Some(previous) = previous {
                let matched = copy_layout_from(previous, incoming);
                if matched > 0 {
                    tracing::debug!(matched, "treating update as an incremental edit");
                    return UpdateKind::Crud;
                }
            }
        }

        self.mark_dirty();
        UpdateKind::Reset
    }

    pub fn mark_dirty(&mut self) {
        self.graph_dirty = true;
        self.minimap_dirty = true;
    }

    /// Called by the owner after a layout pass consumed the dirty state.
    pub fn mark_laid_out(&mut self) {
        self.graph_dirty = false;
    }

    pub fn mark_minimap_rendered(&mut self) {
        self.minimap_dirty = false;
    }
}
