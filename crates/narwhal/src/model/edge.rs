use crate::geom::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerStyle {
    #[default]
    None,
    Arrow,
    Circle,
    Diamond,
}

/// Border anchor used by snapped edges. Percentages run from 0 to 100 along the box, offsets
/// are added in pixels afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapPoint {
    pub horizontal_percent: f64,
    pub vertical_percent: f64,
    pub horizontal_offset: f64,
    pub vertical_offset: f64,
}

impl SnapPoint {
    pub const fn at(horizontal_percent: f64, vertical_percent: f64) -> Self {
        Self {
            horizontal_percent,
            vertical_percent,
            horizontal_offset: 0.0,
            vertical_offset: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    pub start_marker: Option<MarkerStyle>,
    pub end_marker: Option<MarkerStyle>,
    pub color: Option<String>,
    pub weight: Option<f64>,
    pub minlen: Option<usize>,
    pub points: Vec<Point>,
    pub start_snap: Option<SnapPoint>,
    pub end_snap: Option<SnapPoint>,
    pub label_position: Option<Point>,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn connects(&self, from: &str, to: &str) -> bool {
        self.from == from && self.to == to
    }

    pub fn has_label(&self) -> bool {
        self.label.as_deref().is_some_and(|l| !l.is_empty())
    }
}

/// Caller-supplied edge overrides carried by a skeleton entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EdgeOpts {
    pub label: Option<String>,
    pub start_marker: Option<MarkerStyle>,
    pub end_marker: Option<MarkerStyle>,
    pub color: Option<String>,
    pub weight: Option<f64>,
    pub minlen: Option<usize>,
    pub start_snap: Option<SnapPoint>,
    pub end_snap: Option<SnapPoint>,
}

impl EdgeOpts {
    pub fn apply(&self, edge: &mut Edge) {
        if self.label.is_some() {
            edge.label.clone_from(&self.label);
        }
        if self.start_marker.is_some() {
            edge.start_marker = self.start_marker;
        }
        if self.end_marker.is_some() {
            edge.end_marker = self.end_marker;
        }
        if self.color.is_some() {
            edge.color.clone_from(&self.color);
        }
        if self.weight.is_some() {
            edge.weight = self.weight;
        }
        if self.minlen.is_some() {
            edge.minlen = self.minlen;
        }
        if self.start_snap.is_some() {
            edge.start_snap = self.start_snap;
        }
        if self.end_snap.is_some() {
            edge.end_snap = self.end_snap;
        }
    }
}
