//! Per-level layout orchestration.
//!
//! Every level (the root DAG and the inside of each expanded group) is laid out on its own:
//! expanded groups are laid out first so their footprint is known, then all visible nodes and
//! groups of the level are sized, handed to the layered layout provider, and translated so the
//! top-left extent sits on the configured margin.

use crate::config::{DagConfig, DagDimensions, EdgeStyle, LayoutOptions};
use crate::error::Result;
use crate::geom::{Dimension, Extent, Point, Rect, point, size};
use crate::model::{Edge, GraphSpec, Group};
use crate::path::{MidpointCache, curve_basis_path};
use crate::scheduler::Debouncer;
use crate::sizing::{apply_group_size, apply_node_size};
use crate::snap::{SnapTargets, curve_controls, snap_edge, snapped_path};
use remora::graphlib::{Graph, GraphOptions};
use rustc_hash::FxHashMap;
use std::time::Instant;

/// Vertical slack reserved above a sub-DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraPadding {
    None,
    ControlNode,
    Loop,
}

impl ExtraPadding {
    pub fn for_group(group: &Group) -> Self {
        if group.shows_control_node_expanded() {
            ExtraPadding::ControlNode
        } else if group.treat_as_loop {
            ExtraPadding::Loop
        } else {
            ExtraPadding::None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutTrigger {
    DataChanged,
    Resized,
    OptionsChanged,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutReport {
    pub width: f64,
    pub height: f64,
    /// Edge endpoints that did not resolve and were laid out as placeholder boxes.
    pub placeholders: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DagLayout {
    pub options: LayoutOptions,
    pub dims: DagDimensions,
    pub edge_style: EdgeStyle,
    pub collapse_artifacts: bool,
    midpoints: MidpointCache,
    scheduler: Debouncer<LayoutTrigger>,
}

fn css_translate(x: f64, y: f64) -> String {
    format!("translate({x}px, {y}px)")
}

fn is_visible(only: Option<&str>, id: &str) -> bool {
    only.is_none_or(|selected| selected == id)
}

impl DagLayout {
    pub fn new(options: LayoutOptions, dims: DagDimensions, edge_style: EdgeStyle) -> Self {
        Self {
            options,
            dims,
            edge_style,
            ..Default::default()
        }
    }

    pub fn from_config(config: &DagConfig) -> Result<Self> {
        let theme = config.theme()?;
        Ok(Self::new(
            config.layout_options()?,
            config.dimensions()?,
            theme.edge_style,
        ))
    }

    pub fn midpoint_cache(&self) -> &MidpointCache {
        &self.midpoints
    }

    /// Lays out `spec` in place, recursing into expanded groups.
    pub fn layout(&mut self, spec: &mut GraphSpec) -> LayoutReport {
        let mut placeholders = Vec::new();
        let dims = self.layout_level(spec, None, 0.0, 0, &mut placeholders);
        LayoutReport {
            width: dims.width,
            height: dims.height,
            placeholders,
        }
    }

    /// Lays out a copy and leaves `spec` untouched.
    pub fn layout_cloned(&mut self, spec: &GraphSpec) -> (GraphSpec, LayoutReport) {
        let mut copy = spec.clone();
        let report = self.layout(&mut copy);
        (copy, report)
    }

    /// Expands or collapses the group `id` found under `path` and re-lays out the tree, since
    /// every enclosing level changes footprint. Returns `None` if the group does not resolve.
    pub fn set_group_expanded(
        &mut self,
        spec: &mut GraphSpec,
        path: &[String],
        id: &str,
        expanded: bool,
    ) -> Option<LayoutReport> {
        let group = spec.level_mut(path)?.group_mut(id)?;
        if group.expanded == expanded {
            return None;
        }
        group.expanded = expanded;
        Some(self.layout(spec))
    }

    pub fn schedule(&mut self, now: Instant, trigger: LayoutTrigger) -> bool {
        self.scheduler.schedule(now, trigger)
    }

    pub fn has_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Runs the pending layout once its debounce window has elapsed.
    pub fn run_due(
        &mut self,
        now: Instant,
        spec: &mut GraphSpec,
    ) -> Option<(LayoutTrigger, LayoutReport)> {
        let trigger = self.scheduler.poll(now)?;
        Some((trigger, self.layout(spec)))
    }

    /// Runs the pending layout immediately.
    pub fn flush(&mut self, spec: &mut GraphSpec) -> Option<(LayoutTrigger, LayoutReport)> {
        let trigger = self.scheduler.flush()?;
        Some((trigger, self.layout(spec)))
    }

    pub fn cancel_pending(&mut self) -> bool {
        self.scheduler.cancel()
    }

    /// Path data for an already laid out edge in the active edge style.
    pub fn edge_path(&self, edge: &Edge) -> Option<String> {
        match (self.edge_style, edge.points.as_slice()) {
            (_, []) => None,
            (EdgeStyle::Snapped, [start, end]) => Some(snapped_path(
                *start,
                *end,
                self.options.direction,
                self.dims.reversed_edge_control_distance,
            )),
            (_, points) => Some(curve_basis_path(points)),
        }
    }

    fn extra_pad_y(&self, group: &Group) -> f64 {
        match ExtraPadding::for_group(group) {
            ExtraPadding::ControlNode => {
                let control_height = group
                    .control_node
                    .as_ref()
                    .map(|n| n.node().height)
                    .unwrap_or(self.dims.node_height);
                control_height + 2.0 * self.dims.control_node_gap
            }
            ExtraPadding::Loop => self.dims.loop_affordance_height,
            ExtraPadding::None if self.options.no_empty_space_alloc => 0.0,
            ExtraPadding::None => self.dims.group_header_height,
        }
    }

    fn prepare_group(&mut self, group: &mut Group, depth: usize, placeholders: &mut Vec<String>) {
        group.resolve_loop_selection();
        group.generate_control_node();
        let collapse_artifacts = self.collapse_artifacts;
        if let Some(control) = group.control_node.as_mut() {
            apply_node_size(control, collapse_artifacts, &self.dims);
        }

        if group.expanded {
            group.pad_y = self.extra_pad_y(group);
            let selection = group.cached_selection.clone();
            let only = if group.treat_as_loop {
                selection.as_deref()
            } else {
                None
            };
            group.expanded_dims =
                self.layout_level(&mut group.dag, only, group.pad_y, depth + 1, placeholders);
        } else {
            group.pad_y = 0.0;
        }
        apply_group_size(group, &self.dims);

        if group.shows_control_node_expanded() {
            let gap = self.dims.control_node_gap;
            let width = group.width;
            if let Some(control) = group.control_node.as_mut() {
                let node = control.node_mut();
                node.x = (width - node.width) / 2.0;
                node.y = gap;
                node.css_transform = css_translate(node.x, node.y);
            }
        }
    }

    fn layout_level(
        &mut self,
        spec: &mut GraphSpec,
        only: Option<&str>,
        top_offset: f64,
        depth: usize,
        placeholders: &mut Vec<String>,
    ) -> Dimension {
        spec.rebuild_node_map();

        for group in spec.groups.iter_mut() {
            if is_visible(only, &group.id) {
                self.prepare_group(group, depth, placeholders);
            }
        }
        for node in spec.nodes.iter_mut() {
            if is_visible(only, node.id()) {
                apply_node_size(node, self.collapse_artifacts, &self.dims);
            }
        }

        let visible = spec
            .nodes
            .iter()
            .map(|n| n.id())
            .chain(spec.groups.iter().map(|g| g.id.as_str()))
            .filter(|id| is_visible(only, id))
            .count();
        if visible == 0 {
            tracing::debug!(depth, "empty level; skipping layout");
            return size(0.0, 0.0);
        }

        let mut g: Graph<remora::NodeLabel, remora::EdgeLabel, remora::GraphLabel> =
            Graph::new(GraphOptions { multigraph: true });
        g.set_graph(remora::GraphLabel {
            rankdir: self.options.direction.rank_dir(),
            align: self.options.align.map(|a| a.align()),
            ranker: self.options.ranker.ranker(),
            nodesep: self.options.node_sep,
            ranksep: self.options.rank_sep,
            edgesep: self.options.edge_sep,
            marginx: 0.0,
            marginy: 0.0,
            ..Default::default()
        });

        for node in &spec.nodes {
            if !is_visible(only, node.id()) {
                continue;
            }
            let n = node.node();
            g.set_node(
                n.id.clone(),
                remora::NodeLabel {
                    width: n.width,
                    height: n.height,
                    ..Default::default()
                },
            );
        }
        for group in &spec.groups {
            if !is_visible(only, &group.id) {
                continue;
            }
            g.set_node(
                group.id.clone(),
                remora::NodeLabel {
                    width: group.width,
                    height: group.height,
                    ..Default::default()
                },
            );
        }

        // Loop iterations are never connected, so a filtered level has no edges to route.
        let route_edges = only.is_none();
        if route_edges {
            for (idx, edge) in spec.edges.iter().enumerate() {
                for endpoint in [&edge.from, &edge.to] {
                    if g.has_node(endpoint) {
                        continue;
                    }
                    tracing::error!(
                        from = %edge.from,
                        to = %edge.to,
                        missing = %endpoint,
                        "edge endpoint does not resolve; laying out a placeholder"
                    );
                    g.set_node(
                        endpoint.clone(),
                        remora::NodeLabel {
                            width: self.dims.node_width,
                            height: self.dims.node_height,
                            ..Default::default()
                        },
                    );
                    placeholders.push(endpoint.clone());
                }
                g.set_edge_named(
                    edge.from.clone(),
                    edge.to.clone(),
                    Some(format!("edge-{idx}")),
                    Some(remora::EdgeLabel {
                        minlen: edge.minlen.unwrap_or(1),
                        weight: edge.weight.unwrap_or(1.0),
                        ..Default::default()
                    }),
                );
            }
        }

        remora::layout(&mut g);

        let mut extent = Extent::default();
        let mut centers: FxHashMap<&str, (Point, Dimension)> = FxHashMap::default();
        for id in g.nodes() {
            let Some(n) = g.node(id) else {
                continue;
            };
            let center = point(n.x.unwrap_or(0.0), n.y.unwrap_or(0.0));
            let dims = size(n.width, n.height);
            extent.add_centered(center, dims);
            centers.insert(id, (center, dims));
        }
        for e in g.edges() {
            let Some(label) = g.edge_by_key(e) else {
                continue;
            };
            for p in &label.points {
                extent.add_point(point(p.x, p.y));
            }
        }

        let margin = self.dims.margin;
        let dx = margin.left - extent.min_x;
        let dy = margin.top + top_offset - extent.min_y;
        let top_left = |id: &str| -> Option<Rect> {
            let (center, dims) = centers.get(id)?;
            Some(Rect::new(
                point(center.x - dims.width / 2.0 + dx, center.y - dims.height / 2.0 + dy),
                *dims,
            ))
        };

        for node in spec.nodes.iter_mut() {
            let Some(rect) = top_left(node.id()) else {
                continue;
            };
            let n = node.node_mut();
            n.x = rect.origin.x;
            n.y = rect.origin.y;
            n.css_transform = css_translate(n.x, n.y);
        }
        for group in spec.groups.iter_mut() {
            let Some(rect) = top_left(&group.id) else {
                continue;
            };
            group.x = rect.origin.x;
            group.y = rect.origin.y;
            group.css_transform = css_translate(group.x, group.y);
        }

        if route_edges {
            let controls: FxHashMap<&str, Rect> = spec
                .groups
                .iter()
                .filter(|group| group.shows_control_node_expanded())
                .filter_map(|group| {
                    let control = group.control_node.as_ref()?.node();
                    Some((
                        group.id.as_str(),
                        Rect::new(
                            point(group.x + control.x, group.y + control.y),
                            size(control.width, control.height),
                        ),
                    ))
                })
                .collect();

            for (idx, edge) in spec.edges.iter_mut().enumerate() {
                let name = format!("edge-{idx}");
                let routed = g
                    .edge(&edge.from, &edge.to, Some(name.as_str()))
                    .map(|label| {
                        label
                            .points
                            .iter()
                            .map(|p| point(p.x + dx, p.y + dy))
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default();

                edge.points = match (self.edge_style, top_left(&edge.from), top_left(&edge.to)) {
                    (EdgeStyle::Snapped, Some(from), Some(to)) => {
                        let targets = SnapTargets {
                            from,
                            to,
                            to_control: controls.get(edge.to.as_str()).copied(),
                        };
                        snap_edge(edge, &targets, self.options.direction, &self.dims).to_vec()
                    }
                    _ => routed,
                };

                edge.label_position = if edge.has_label() && !edge.points.is_empty() {
                    let curve = match self.edge_style {
                        EdgeStyle::Snapped => curve_controls(
                            &edge.points,
                            self.options.direction,
                            self.dims.reversed_edge_control_distance,
                        ),
                        EdgeStyle::ProviderSpline => edge.points.clone(),
                    };
                    self.midpoints.midpoint(&curve)
                } else {
                    None
                };
            }
        }

        let width = extent.width() + margin.horizontal();
        let height = extent.height() + margin.vertical();
        tracing::debug!(
            depth,
            nodes = spec.nodes.len(),
            groups = spec.groups.len(),
            edges = spec.edges.len(),
            width,
            height,
            "laid out level"
        );
        size(width, height)
    }
}
