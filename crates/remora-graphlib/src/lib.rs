#![forbid(unsafe_code)]

//! Directed graph container used by `remora`.
//!
//! Modeled on `@dagrejs/graphlib`, trimmed to what a layered layout needs: directed graphs,
//! optional multigraph edge names, and insertion-ordered iteration.

pub mod graph;

pub use graph::{EdgeKey, Graph, GraphOptions, alg};
