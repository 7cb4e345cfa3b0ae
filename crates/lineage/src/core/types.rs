//! Core type definitions shared by every stage
//!
//! Model-space geometry (points, segments, rectangles, extents), the
//! character sets used by the text preview, and small enums describing
//! viewport gestures and export options.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in model space (or screen space, where noted)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point halfway between `self` and `other`
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// A straight line segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x
    }

    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }

    pub fn length(&self) -> f64 {
        let d = self.end - self.start;
        (d.x * d.x + d.y * d.y).sqrt()
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment test
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Open-interval intersection: rectangles that only touch do not overlap
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Overall canvas size of a layout
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extents {
    pub width: f64,
    pub height: f64,
}

/// Character set for text preview output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CharacterSet {
    /// Pure ASCII characters only: + - |
    Ascii,
    /// Unicode box-drawing characters: ┌ ┐ └ ┘ ─ │
    #[default]
    Unicode,
}

impl CharacterSet {
    /// Returns true if this character set uses only ASCII
    pub fn is_ascii(&self) -> bool {
        matches!(self, CharacterSet::Ascii)
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacterSet::Ascii => write!(f, "ascii"),
            CharacterSet::Unicode => write!(f, "unicode"),
        }
    }
}

/// Direction of a discrete pan step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PanDirection {
    /// Parse a direction name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(PanDirection::Up),
            "down" => Some(PanDirection::Down),
            "left" => Some(PanDirection::Left),
            "right" => Some(PanDirection::Right),
            _ => None,
        }
    }

    /// Unit offset applied to the pan translation.
    ///
    /// Panning "up" reveals what lies above, so the content moves down.
    pub fn unit(&self) -> Point {
        match self {
            PanDirection::Up => Point::new(0.0, 1.0),
            PanDirection::Down => Point::new(0.0, -1.0),
            PanDirection::Left => Point::new(1.0, 0.0),
            PanDirection::Right => Point::new(-1.0, 0.0),
        }
    }
}

impl fmt::Display for PanDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanDirection::Up => write!(f, "up"),
            PanDirection::Down => write!(f, "down"),
            PanDirection::Left => write!(f, "left"),
            PanDirection::Right => write!(f, "right"),
        }
    }
}

/// Coordinate space used when exporting a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportSpace {
    /// Un-zoomed model coordinates; the full tree regardless of viewport
    #[default]
    Model,
    /// Geometry wrapped in the current viewport transform
    Viewport,
}

impl fmt::Display for ExportSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportSpace::Model => write!(f, "model"),
            ExportSpace::Viewport => write!(f, "viewport"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 200.0, 100.0);
        let b = Rect::new(200.0, 0.0, 200.0, 100.0);
        assert!(!a.intersects(&b));
        let c = Rect::new(199.0, 99.0, 10.0, 10.0);
        assert!(a.intersects(&c));
    }

    #[test]
    fn test_rect_contains_edges() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(Point::new(10.0, 30.0)));
        assert!(!r.contains(Point::new(9.9, 15.0)));
        assert_eq!(r.center(), Point::new(20.0, 20.0));
    }

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert_eq!(b - a, Point::new(3.0, 4.0));
        assert_eq!(a + b, Point::new(5.0, 8.0));
        assert_eq!(a.midpoint(b), Point::new(2.5, 4.0));
        assert_eq!(Segment::new(a, b).length(), 5.0);
    }

    #[test]
    fn test_pan_direction_parsing() {
        assert_eq!(PanDirection::from_str("UP"), Some(PanDirection::Up));
        assert_eq!(PanDirection::from_str("left"), Some(PanDirection::Left));
        assert_eq!(PanDirection::from_str("sideways"), None);
        assert_eq!(PanDirection::Up.unit(), Point::new(0.0, 1.0));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(CharacterSet::Ascii.to_string(), "ascii");
        assert_eq!(CharacterSet::default().to_string(), "unicode");
        assert_eq!(ExportSpace::default().to_string(), "model");
        assert_eq!(PanDirection::Right.to_string(), "right");
    }
}
