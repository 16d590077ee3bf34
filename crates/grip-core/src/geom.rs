//! Scene-space geometry: points, axis-aligned bounds, and the device↔scene
//! coordinate transform.
//!
//! `CanvasTransform` is the single source of truth for coordinate conversion.
//! `to_scene` and `to_device` are exact inverses, so hit testing and rendering
//! agree on where things are regardless of pan, zoom, or device pixel ratio.

use serde::{Deserialize, Serialize};

/// Smallest zoom the transform accepts. Keeps `1/zoom` finite.
const MIN_ZOOM: f32 = 0.01;

/// A point in scene (or device) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise offset.
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Vector from `other` to `self`.
    pub fn delta_from(self, other: Point) -> Point {
        Point {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build bounds from two opposite corners in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Containment with the hit box inflated by `tolerance` on every side.
    pub fn contains_with_tolerance(&self, p: Point, tolerance: f32) -> bool {
        p.x >= self.x - tolerance
            && p.x <= self.x + self.width + tolerance
            && p.y >= self.y - tolerance
            && p.y <= self.y + self.height + tolerance
    }

    /// AABB overlap test.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    pub fn origin(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    /// The same box shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Bounds {
        Bounds {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Minimal box covering `self` and `other`.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Bounds {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

/// Minimal axis-aligned box containing every input.
///
/// Returns `None` for an empty slice — a zero-size box is a valid result and
/// must not be conflated with "nothing to union".
pub fn union_bounds(list: &[Bounds]) -> Option<Bounds> {
    let (first, rest) = list.split_first()?;
    Some(rest.iter().fold(*first, |acc, b| acc.union(b)))
}

/// Maps device (CSS pixel × dpr) coordinates to scene coordinates and back.
///
/// `to_scene(d) = (d / dpr - pan) / zoom`; `to_device` is its inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    pub pan: Point,
    pub zoom: f32,
    pub dpr: f32,
}

impl CanvasTransform {
    /// Zoom and dpr are clamped to a positive floor so conversion never
    /// divides by zero.
    pub fn new(pan: Point, zoom: f32, dpr: f32) -> Self {
        Self {
            pan,
            zoom: zoom.max(MIN_ZOOM),
            dpr: dpr.max(MIN_ZOOM),
        }
    }

    pub fn to_scene(&self, device: Point) -> Point {
        Point {
            x: (device.x / self.dpr - self.pan.x) / self.zoom,
            y: (device.y / self.dpr - self.pan.y) / self.zoom,
        }
    }

    pub fn to_device(&self, scene: Point) -> Point {
        Point {
            x: (scene.x * self.zoom + self.pan.x) * self.dpr,
            y: (scene.y * self.zoom + self.pan.y) * self.dpr,
        }
    }

    /// Pan by a delta given in device pixels.
    pub fn pan_by_device(&mut self, dx: f32, dy: f32) {
        self.pan.x += dx / self.dpr;
        self.pan.y += dy / self.dpr;
    }
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self {
            pan: Point::ZERO,
            zoom: 1.0,
            dpr: 1.0,
        }
    }
}
