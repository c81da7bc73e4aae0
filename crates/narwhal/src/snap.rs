//! Anchor-based edge endpoints for the snapped edge style.

use crate::config::{DagDimensions, Direction};
use crate::geom::{Point, Rect, point};
use crate::model::{Edge, SnapPoint};
use crate::path::bezier_path;

/// Default anchors for an edge leaving a source box and entering a destination box.
pub fn default_anchors(direction: Direction) -> (SnapPoint, SnapPoint) {
    match direction {
        Direction::TopToBottom => (SnapPoint::at(50.0, 100.0), SnapPoint::at(50.0, 0.0)),
        Direction::BottomToTop => (SnapPoint::at(50.0, 0.0), SnapPoint::at(50.0, 100.0)),
        Direction::LeftToRight => (SnapPoint::at(100.0, 50.0), SnapPoint::at(0.0, 50.0)),
        Direction::RightToLeft => (SnapPoint::at(0.0, 50.0), SnapPoint::at(100.0, 50.0)),
    }
}

/// Point on (or offset from) `rect` described by `snap`.
pub fn anchor_point(rect: &Rect, snap: &SnapPoint) -> Point {
    point(
        rect.origin.x + rect.size.width * snap.horizontal_percent / 100.0 + snap.horizontal_offset,
        rect.origin.y + rect.size.height * snap.vertical_percent / 100.0 + snap.vertical_offset,
    )
}

/// Moves an anchor that lands on the top border of an expanded group onto the top-center of
/// the group's control node. `control` is in the same coordinate space as `group`.
pub fn resnap_to_control(anchor: Point, group: &Rect, control: &Rect, tolerance: f64) -> Point {
    let on_top_border = (anchor.y - group.origin.y).abs() <= tolerance
        && anchor.x >= group.origin.x - tolerance
        && anchor.x <= group.max_x() + tolerance;
    if on_top_border {
        point(control.center().x, control.origin.y)
    } else {
        anchor
    }
}

/// Endpoint boxes of a snapped edge. `to_control` is the control node box of an expanded
/// destination group, if it draws one.
#[derive(Debug, Clone, Copy)]
pub struct SnapTargets {
    pub from: Rect,
    pub to: Rect,
    pub to_control: Option<Rect>,
}

/// Start and end anchors for `edge`.
pub fn snap_edge(
    edge: &Edge,
    targets: &SnapTargets,
    direction: Direction,
    dims: &DagDimensions,
) -> [Point; 2] {
    let (default_start, default_end) = default_anchors(direction);
    let start = anchor_point(&targets.from, &edge.start_snap.unwrap_or(default_start));
    let mut end = anchor_point(&targets.to, &edge.end_snap.unwrap_or(default_end));
    if let Some(control) = &targets.to_control {
        end = resnap_to_control(end, &targets.to, control, dims.resnap_tolerance);
    }
    [start, end]
}

/// Whether the edge runs against the layout axis.
pub fn is_reversed(start: Point, end: Point, direction: Direction) -> bool {
    match direction {
        Direction::TopToBottom => end.y < start.y,
        Direction::BottomToTop => end.y > start.y,
        Direction::LeftToRight => end.x < start.x,
        Direction::RightToLeft => end.x > start.x,
    }
}

/// Cubic control points between two anchors.
///
/// Forward edges bend at the midpoint of the layout axis. Reversed edges push both control
/// points out along the flow by at least `reversed_distance`.
pub fn control_points(
    start: Point,
    end: Point,
    direction: Direction,
    reversed_distance: f64,
) -> (Point, Point) {
    if is_reversed(start, end, direction) {
        let d = if direction.is_horizontal() {
            reversed_distance.max((end.x - start.x).abs() / 2.0)
        } else {
            reversed_distance.max((end.y - start.y).abs() / 2.0)
        };
        return match direction {
            Direction::TopToBottom => (point(start.x, start.y + d), point(end.x, end.y - d)),
            Direction::BottomToTop => (point(start.x, start.y - d), point(end.x, end.y + d)),
            Direction::LeftToRight => (point(start.x + d, start.y), point(end.x - d, end.y)),
            Direction::RightToLeft => (point(start.x - d, start.y), point(end.x + d, end.y)),
        };
    }
    if direction.is_horizontal() {
        let mid = (start.x + end.x) / 2.0;
        (point(mid, start.y), point(mid, end.y))
    } else {
        let mid = (start.y + end.y) / 2.0;
        (point(start.x, mid), point(end.x, mid))
    }
}

/// Full cubic control polygon `[start, c1, c2, end]` for a snapped edge.
pub fn curve_controls(points: &[Point], direction: Direction, reversed_distance: f64) -> Vec<Point> {
    match points {
        [start, end] => {
            let (c1, c2) = control_points(*start, *end, direction, reversed_distance);
            vec![*start, c1, c2, *end]
        }
        _ => points.to_vec(),
    }
}

/// Path data for a snapped edge.
pub fn snapped_path(start: Point, end: Point, direction: Direction, reversed_distance: f64) -> String {
    let (c1, c2) = control_points(start, end, direction, reversed_distance);
    bezier_path(start, c1, c2, end)
}
