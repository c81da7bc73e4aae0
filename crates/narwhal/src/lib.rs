#![forbid(unsafe_code)]

//! Layout and geometry engine for nested, collapsible DAG widgets.
//!
//! Build a [`GraphSpec`] from a skeleton ([`skeleton::build_graph`]) or by hand, then hand it
//! to [`DagLayout::layout`] to populate positions, sizes and edge points at every expanded
//! level. Rendering is left to the caller.

pub mod config;
pub mod error;
pub mod geom;
pub mod layout;
pub mod model;
pub mod path;
pub mod scheduler;
pub mod sizing;
pub mod skeleton;
pub mod snap;
pub mod stability;
pub mod state;

pub use config::{DagConfig, DagDimensions, Direction, EdgeStyle, LayoutOptions, Theme};
pub use error::{Error, Result};
pub use layout::{DagLayout, LayoutReport, LayoutTrigger};
pub use model::{
    CustomNode, DagNode, Edge, GraphSpec, Group, Node, NodeKind, NodeMap, NodeState, NodeType,
};
pub use skeleton::{DagNodeSkeleton, StateTable, build_graph};
pub use stability::{UpdateKind, UpdateTracker};
pub use state::WidgetState;

#[cfg(test)]
mod tests;
