//! Geometry primitives shared by sizing, layout and edge routing.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;

/// Width/height of a node or group box.
pub type Dimension = Size;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn size(width: f64, height: f64) -> Dimension {
    euclid::size2(width, height)
}

/// Replaces `NaN` and infinities with `fallback`.
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Division that yields `0.0` instead of `NaN`/`inf` for a zero or non-finite divisor.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    finite_or(numerator / denominator, 0.0)
}

/// Clamps `value` into `[min, max]`. Both bounds are required and must be ordered.
pub fn clamp(value: f64, min: f64, max: f64) -> Result<f64> {
    if min.is_nan() || max.is_nan() || min > max {
        return Err(Error::InvalidClampRange { min, max });
    }
    Ok(finite_or(value, min).clamp(min, max))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarginSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl MarginSide {
    pub fn parse(side: &str) -> Result<Self> {
        match side.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "right" => Ok(Self::Right),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            _ => Err(Error::InvalidMarginSide {
                side: side.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn get(&self, side: MarginSide) -> f64 {
        match side {
            MarginSide::Top => self.top,
            MarginSide::Right => self.right,
            MarginSide::Bottom => self.bottom,
            MarginSide::Left => self.left,
        }
    }

    /// Looks a side up by name (`"top"`, `"left"`, ...).
    pub fn side(&self, name: &str) -> Result<f64> {
        Ok(self.get(MarginSide::parse(name)?))
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Bounding box accumulator over points and boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for Extent {
    fn default() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }
}

impl Extent {
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn add_point(&mut self, p: Point) {
        if !p.x.is_finite() || !p.y.is_finite() {
            return;
        }
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Adds a box given by its center and size.
    pub fn add_centered(&mut self, center: Point, dims: Dimension) {
        let hw = dims.width / 2.0;
        let hh = dims.height / 2.0;
        self.add_point(point(center.x - hw, center.y - hh));
        self.add_point(point(center.x + hw, center.y + hh));
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max_x - self.min_x }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max_y - self.min_y }
    }
}
