//! Widget configuration.
//!
//! [`DagConfig`] is a raw JSON document with dotted-path access and deep merging; typed views
//! ([`LayoutOptions`], [`DagDimensions`], [`Theme`]) are deserialized from it on demand.

use crate::error::{Error, Result};
use crate::geom::Margins;
use crate::model::{MarkerStyle, NodeState};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct DagConfig(Value);

impl Default for DagConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl DagConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.get(dotted_path)?.as_bool()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64()
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur
                .entry(seg)
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }

    fn section<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T> {
        let Some(value) = self.get(path) else {
            return Ok(T::default());
        };
        serde_json::from_value(value.clone()).map_err(|err| Error::Config {
            path: path.to_string(),
            message: err.to_string(),
        })
    }

    pub fn layout_options(&self) -> Result<LayoutOptions> {
        self.section("layout")
    }

    pub fn dimensions(&self) -> Result<DagDimensions> {
        self.section("dimensions")
    }

    /// The theme, with its state color table checked for completeness.
    pub fn theme(&self) -> Result<Theme> {
        let theme: Theme = self.section("theme")?;
        theme.validate()?;
        Ok(theme)
    }

    pub fn optimize_for_orm(&self) -> bool {
        self.get_bool("optimizeForOrm").unwrap_or(false)
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "TB")]
    TopToBottom,
    #[serde(rename = "BT")]
    BottomToTop,
    #[serde(rename = "LR")]
    LeftToRight,
    #[serde(rename = "RL")]
    RightToLeft,
}

impl Direction {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::LeftToRight | Direction::RightToLeft)
    }

    pub(crate) fn rank_dir(self) -> remora::RankDir {
        match self {
            Direction::TopToBottom => remora::RankDir::TB,
            Direction::BottomToTop => remora::RankDir::BT,
            Direction::LeftToRight => remora::RankDir::LR,
            Direction::RightToLeft => remora::RankDir::RL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    #[serde(rename = "UL")]
    UpLeft,
    #[serde(rename = "UR")]
    UpRight,
    #[serde(rename = "DL")]
    DownLeft,
    #[serde(rename = "DR")]
    DownRight,
}

impl Alignment {
    pub(crate) fn align(self) -> remora::Align {
        match self {
            Alignment::UpLeft => remora::Align::UL,
            Alignment::UpRight => remora::Align::UR,
            Alignment::DownLeft => remora::Align::DL,
            Alignment::DownRight => remora::Align::DR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankerKind {
    #[default]
    NetworkSimplex,
    TightTree,
    LongestPath,
}

impl RankerKind {
    pub(crate) fn ranker(self) -> remora::Ranker {
        match self {
            RankerKind::NetworkSimplex => remora::Ranker::NetworkSimplex,
            RankerKind::TightTree => remora::Ranker::TightTree,
            RankerKind::LongestPath => remora::Ranker::LongestPath,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    pub direction: Direction,
    pub align: Option<Alignment>,
    pub ranker: RankerKind,
    pub node_sep: f64,
    pub rank_sep: f64,
    pub edge_sep: f64,
    /// Reserve no header slack above sub-DAGs that render neither a control node nor a loop
    /// selector.
    pub no_empty_space_alloc: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: Direction::TopToBottom,
            align: None,
            ranker: RankerKind::NetworkSimplex,
            node_sep: 50.0,
            rank_sep: 50.0,
            edge_sep: 20.0,
            no_empty_space_alloc: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DagDimensions {
    pub node_width: f64,
    pub node_height: f64,
    /// Width reserved for the state icon.
    pub icon_space: f64,
    /// Width reserved for the conditional badge when no state icon is shown.
    pub conditional_icon_space: f64,
    /// Side of the square a collapsed artifact shrinks to.
    pub condensed_icon_width: f64,
    pub margin: Margins,
    pub group_padding: f64,
    pub group_pad_multiplier_x: f64,
    pub group_pad_multiplier_y: f64,
    /// Gap above and below a control node drawn inside its expanded group.
    pub control_node_gap: f64,
    pub loop_affordance_height: f64,
    /// Header slack above sub-DAGs without a control node or loop selector.
    pub group_header_height: f64,
    pub resnap_tolerance: f64,
    pub reversed_edge_control_distance: f64,
}

impl Default for DagDimensions {
    fn default() -> Self {
        Self {
            node_width: 240.0,
            node_height: 48.0,
            icon_space: 44.0,
            conditional_icon_space: 28.0,
            condensed_icon_width: 40.0,
            margin: Margins::uniform(24.0),
            group_padding: 8.0,
            group_pad_multiplier_x: 2.0,
            group_pad_multiplier_y: 2.0,
            control_node_gap: 16.0,
            loop_affordance_height: 40.0,
            group_header_height: 24.0,
            resnap_tolerance: 2.0,
            reversed_edge_control_distance: 200.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeStyle {
    #[default]
    ProviderSpline,
    Snapped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    pub edge_style: EdgeStyle,
    pub state_colors: BTreeMap<NodeState, String>,
    pub start_marker: MarkerStyle,
    pub end_marker: MarkerStyle,
    pub edge_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        let state_colors = NodeState::ALL
            .iter()
            .map(|state| {
                let color = match state {
                    NodeState::Completed | NodeState::Cached => "#1e8e3e",
                    NodeState::Failed | NodeState::Timeout => "#d93025",
                    NodeState::Running | NodeState::Cancelling => "#1a73e8",
                    NodeState::Warning => "#f9ab00",
                    NodeState::Pending | NodeState::Queued | NodeState::Paused => "#80868b",
                    _ => "#5f6368",
                };
                (*state, color.to_string())
            })
            .collect();
        Self {
            edge_style: EdgeStyle::ProviderSpline,
            state_colors,
            start_marker: MarkerStyle::None,
            end_marker: MarkerStyle::Arrow,
            edge_color: "#80868b".to_string(),
        }
    }
}

impl Theme {
    /// Every [`NodeState`] must have a color.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = NodeState::ALL
            .iter()
            .filter(|state| !self.state_colors.contains_key(*state))
            .map(|state| state.as_str())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(Error::IncompleteStateColors {
            missing: missing.join(", "),
        })
    }

    pub fn state_color(&self, state: NodeState) -> Option<&str> {
        self.state_colors.get(&state).map(String::as_str)
    }
}
