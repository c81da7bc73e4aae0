use crate::config::{DagDimensions, Direction};
use crate::geom::{Rect, point, size};
use crate::model::{Edge, SnapPoint};
use crate::snap::*;

fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(point(x, y), size(w, h))
}

fn targets(from: Rect, to: Rect) -> SnapTargets {
    SnapTargets {
        from,
        to,
        to_control: None,
    }
}

#[test]
fn top_to_bottom_attaches_bottom_center_to_top_center() {
    let a = rect(0.0, 100.0, 100.0, 40.0);
    let b = rect(0.0, 300.0, 100.0, 40.0);
    let [start, end] = snap_edge(
        &Edge::new("a", "b"),
        &targets(a, b),
        Direction::TopToBottom,
        &DagDimensions::default(),
    );
    assert_eq!(start, point(50.0, 140.0));
    assert_eq!(end, point(50.0, 300.0));
}

#[test]
fn bottom_to_top_swaps_the_borders() {
    let a = rect(0.0, 300.0, 100.0, 40.0);
    let b = rect(0.0, 100.0, 100.0, 40.0);
    let [start, end] = snap_edge(
        &Edge::new("a", "b"),
        &targets(a, b),
        Direction::BottomToTop,
        &DagDimensions::default(),
    );
    assert_eq!(start, point(50.0, 300.0));
    assert_eq!(end, point(50.0, 140.0));
}

#[test]
fn horizontal_layouts_use_side_centers() {
    let (start, end) = default_anchors(Direction::LeftToRight);
    assert_eq!((start, end), (SnapPoint::at(100.0, 50.0), SnapPoint::at(0.0, 50.0)));
    let (start, end) = default_anchors(Direction::RightToLeft);
    assert_eq!((start, end), (SnapPoint::at(0.0, 50.0), SnapPoint::at(100.0, 50.0)));
}

#[test]
fn per_edge_snap_points_override_defaults() {
    let edge = Edge {
        start_snap: Some(SnapPoint {
            horizontal_percent: 0.0,
            vertical_percent: 50.0,
            horizontal_offset: -5.0,
            vertical_offset: 2.0,
        }),
        ..Edge::new("a", "b")
    };
    let a = rect(10.0, 10.0, 100.0, 40.0);
    let b = rect(10.0, 200.0, 100.0, 40.0);
    let [start, end] = snap_edge(
        &edge,
        &targets(a, b),
        Direction::TopToBottom,
        &DagDimensions::default(),
    );
    assert_eq!(start, point(5.0, 32.0));
    assert_eq!(end, point(60.0, 200.0));
}

#[test]
fn anchors_on_a_group_top_border_resnap_to_its_control_node() {
    let group = rect(0.0, 0.0, 400.0, 300.0);
    let control = rect(80.0, 16.0, 240.0, 48.0);
    assert_eq!(
        resnap_to_control(point(200.0, 0.0), &group, &control, 2.0),
        point(200.0, 16.0)
    );
    assert_eq!(
        resnap_to_control(point(150.0, 1.5), &group, &control, 2.0),
        point(200.0, 16.0)
    );
    assert_eq!(
        resnap_to_control(point(200.0, 10.0), &group, &control, 2.0),
        point(200.0, 10.0)
    );
    assert_eq!(
        resnap_to_control(point(0.0, 150.0), &group, &control, 2.0),
        point(0.0, 150.0)
    );
}

#[test]
fn forward_edges_bend_at_the_axis_midpoint() {
    let (c1, c2) = control_points(point(0.0, 0.0), point(100.0, 100.0), Direction::TopToBottom, 200.0);
    assert_eq!((c1, c2), (point(0.0, 50.0), point(100.0, 50.0)));

    let (c1, c2) = control_points(point(0.0, 0.0), point(100.0, 60.0), Direction::LeftToRight, 200.0);
    assert_eq!((c1, c2), (point(50.0, 0.0), point(50.0, 60.0)));
}

#[test]
fn reversed_edges_push_control_points_outward() {
    let start = point(0.0, 300.0);
    let end = point(40.0, 100.0);
    assert!(is_reversed(start, end, Direction::TopToBottom));
    assert!(!is_reversed(start, end, Direction::BottomToTop));

    let (c1, c2) = control_points(start, end, Direction::TopToBottom, 200.0);
    assert_eq!((c1, c2), (point(0.0, 500.0), point(40.0, -100.0)));

    let (c1, c2) = control_points(point(500.0, 0.0), point(0.0, 0.0), Direction::LeftToRight, 200.0);
    assert_eq!((c1, c2), (point(750.0, 0.0), point(-250.0, 0.0)));
}

#[test]
fn snapped_path_is_a_single_cubic() {
    let d = snapped_path(point(0.0, 0.0), point(0.0, 100.0), Direction::TopToBottom, 200.0);
    assert_eq!(d, "M0,0C0,50,0,50,0,100");
    assert_eq!(
        curve_controls(&[point(0.0, 0.0), point(0.0, 100.0)], Direction::TopToBottom, 200.0).len(),
        4
    );
}
