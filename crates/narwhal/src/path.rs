//! SVG path data and label placement along edge curves.

use crate::geom::{Point, point};
use rustc_hash::FxHashMap;
use std::fmt::Write as _;

/// Number of segments a curve is split into when measuring it.
pub const CURVE_SEGMENTS: usize = 100;

fn fmt_into(out: &mut String, v: f64) {
    if !v.is_finite() || v.abs() < 0.0005 {
        out.push('0');
        return;
    }
    let rounded = (v * 1000.0).round() / 1000.0;
    let _ = write!(out, "{rounded}");
}

fn emit_pair(out: &mut String, cmd: char, x: f64, y: f64) {
    out.push(cmd);
    fmt_into(out, x);
    out.push(',');
    fmt_into(out, y);
}

fn emit_cubic(out: &mut String, c1: Point, c2: Point, end: Point) {
    out.push('C');
    for (i, p) in [c1, c2, end].into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        fmt_into(out, p.x);
        out.push(',');
        fmt_into(out, p.y);
    }
}

/// Uniform cubic B-spline through `points`, clamped at both ends.
pub fn curve_basis_path(points: &[Point]) -> String {
    let mut out = String::with_capacity(points.len().saturating_mul(48));
    let Some(first) = points.first() else {
        return out;
    };
    emit_pair(&mut out, 'M', first.x, first.y);
    if points.len() == 1 {
        return out;
    }

    let segment = |out: &mut String, p0: Point, p1: Point, p: Point| {
        emit_cubic(
            out,
            point((2.0 * p0.x + p1.x) / 3.0, (2.0 * p0.y + p1.y) / 3.0),
            point((p0.x + 2.0 * p1.x) / 3.0, (p0.y + 2.0 * p1.y) / 3.0),
            point((p0.x + 4.0 * p1.x + p.x) / 6.0, (p0.y + 4.0 * p1.y + p.y) / 6.0),
        );
    };

    let mut p0 = points[0];
    let mut p1 = points[1];
    if points.len() == 2 {
        emit_pair(&mut out, 'L', p1.x, p1.y);
        return out;
    }
    emit_pair(
        &mut out,
        'L',
        (5.0 * p0.x + p1.x) / 6.0,
        (5.0 * p0.y + p1.y) / 6.0,
    );
    for &p in &points[2..] {
        segment(&mut out, p0, p1, p);
        p0 = p1;
        p1 = p;
    }
    segment(&mut out, p0, p1, p1);
    emit_pair(&mut out, 'L', p1.x, p1.y);
    out
}

/// A single cubic segment.
pub fn bezier_path(start: Point, c1: Point, c2: Point, end: Point) -> String {
    let mut out = String::with_capacity(64);
    emit_pair(&mut out, 'M', start.x, start.y);
    emit_cubic(&mut out, c1, c2, end);
    out
}

/// Evaluates the Bezier curve with the given control points at `t` (De Casteljau).
pub fn de_casteljau(controls: &[Point], t: f64) -> Option<Point> {
    let mut work: Vec<Point> = controls.to_vec();
    if work.is_empty() {
        return None;
    }
    for level in (1..work.len()).rev() {
        for i in 0..level {
            work[i] = work[i].lerp(work[i + 1], t);
        }
    }
    Some(work[0])
}

/// `segments + 1` points at evenly spaced parameters.
pub fn sample_curve(controls: &[Point], segments: usize) -> Vec<Point> {
    let segments = segments.max(1);
    (0..=segments)
        .filter_map(|i| de_casteljau(controls, i as f64 / segments as f64))
        .collect()
}

/// The point at half the arc length of the curve.
pub fn arc_midpoint(controls: &[Point]) -> Option<Point> {
    match controls {
        [] => return None,
        [only] => return Some(*only),
        _ => {}
    }
    let samples = sample_curve(controls, CURVE_SEGMENTS);
    let lengths: Vec<f64> = samples
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).length())
        .collect();
    let total: f64 = lengths.iter().sum();
    if total <= 0.0 {
        return samples.first().copied();
    }

    let half = total / 2.0;
    let mut walked = 0.0;
    for (i, len) in lengths.iter().enumerate() {
        if walked + len >= half {
            let t = if *len > 0.0 { (half - walked) / len } else { 0.0 };
            return Some(samples[i].lerp(samples[i + 1], t));
        }
        walked += len;
    }
    samples.last().copied()
}

/// Label midpoints keyed by the literal control point list.
#[derive(Debug, Clone, Default)]
pub struct MidpointCache {
    entries: FxHashMap<String, Option<Point>>,
}

impl MidpointCache {
    pub fn key(controls: &[Point]) -> String {
        let mut out = String::with_capacity(controls.len() * 16);
        for (i, p) in controls.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{},{}", p.x, p.y);
        }
        out
    }

    pub fn midpoint(&mut self, controls: &[Point]) -> Option<Point> {
        let key = Self::key(controls);
        if let Some(hit) = self.entries.get(&key) {
            return *hit;
        }
        let mid = arc_midpoint(controls);
        self.entries.insert(key, mid);
        mid
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
