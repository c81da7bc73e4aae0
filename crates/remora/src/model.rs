//! Label types carried by the layout graph.
//!
//! Callers fill in node sizes and edge constraints; the pipeline writes back node centers, edge
//! polylines, and the overall graph size.

use crate::graphlib::EdgeKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl RankDir {
    pub fn is_horizontal(self) -> bool {
        matches!(self, RankDir::LR | RankDir::RL)
    }
}

/// Fixes the horizontal coordinate to one of the four BK alignments instead of balancing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    UL,
    UR,
    DL,
    DR,
}

impl Align {
    pub(crate) fn index(self) -> usize {
        match self {
            Align::UL => 0,
            Align::UR => 1,
            Align::DL => 2,
            Align::DR => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ranker {
    #[default]
    NetworkSimplex,
    TightTree,
    LongestPath,
}

#[derive(Debug, Clone)]
pub struct GraphLabel {
    pub rankdir: RankDir,
    pub align: Option<Align>,
    pub ranker: Ranker,
    pub nodesep: f64,
    pub ranksep: f64,
    pub edgesep: f64,
    pub marginx: f64,
    pub marginy: f64,
    /// First dummy node of every chain created by `normalize::run`.
    pub dummy_chains: Vec<String>,
    /// Written by the layout: overall size including margins.
    pub width: f64,
    pub height: f64,
}

impl Default for GraphLabel {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            align: None,
            ranker: Ranker::NetworkSimplex,
            nodesep: 50.0,
            ranksep: 50.0,
            edgesep: 20.0,
            marginx: 0.0,
            marginy: 0.0,
            dummy_chains: Vec::new(),
            width: 0.0,
            height: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dummy {
    /// Intermediate node of a long edge.
    Edge,
    /// Placeholder for a self loop during positioning.
    SelfEdge,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    /// Center of the node once laid out.
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rank: Option<i32>,
    pub order: Option<usize>,
    pub dummy: Option<Dummy>,
    pub edge_label: Option<EdgeLabel>,
    pub edge_obj: Option<EdgeKey>,
    pub self_edges: Vec<SelfEdge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub minlen: usize,
    pub weight: f64,
    pub reversed: bool,
    pub forward_name: Option<String>,
    pub points: Vec<Point>,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            minlen: 1,
            weight: 1.0,
            reversed: false,
            forward_name: None,
            points: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelfEdge {
    pub edge_obj: EdgeKey,
    pub label: EdgeLabel,
}
