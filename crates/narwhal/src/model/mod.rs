//! Entity model: nodes, groups, edges and the per-level id index.

mod edge;
mod group;
mod node;
mod node_map;
mod spec;

pub use edge::{Edge, EdgeOpts, MarkerStyle, SnapPoint};
pub use group::Group;
pub use node::{ArtifactRef, CustomNode, DagNode, Node, NodeState, NodeType, UNSET};
pub use node_map::{MapEntry, NodeKind, NodeMap};
pub use spec::GraphSpec;
