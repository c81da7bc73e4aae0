#![forbid(unsafe_code)]

//! Layered graph layout.
//!
//! A Sugiyama-style pipeline in the tradition of Graphviz `dot` and dagre: cycle removal,
//! network-simplex ranking, barycenter crossing reduction, and Brandes-Köpf coordinate
//! assignment. Input nodes carry sizes, output nodes carry center coordinates, and every edge
//! receives a polyline clipped to its endpoint boxes.

pub use remora_graphlib as graphlib;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod acyclic;
pub mod coordinate_system;
pub mod model;
pub mod normalize;
pub mod order;
pub mod position;
pub mod rank;
pub mod self_edges;
pub mod util;

mod pipeline;

pub use model::{
    Align, Dummy, EdgeLabel, GraphLabel, NodeLabel, Point, RankDir, Ranker, SelfEdge,
};
pub use pipeline::layout;
