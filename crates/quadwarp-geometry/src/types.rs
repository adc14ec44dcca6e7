use serde::{Deserialize, Serialize};

use crate::{error::GeometryError, linalg};

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2d {
    /// x coordinate.
    pub x: f64,
    /// y coordinate.
    pub y: f64,
}

impl Point2d {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point2d {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point2d {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Four corners in path traversal order.
///
/// Correspondence between two quads is positional: corner `i` of one quad
/// matches corner `i` of the other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad(pub [Point2d; 4]);

impl Quad {
    /// Create a quad from four corners.
    pub const fn new(corners: [Point2d; 4]) -> Self {
        Self(corners)
    }

    /// Build a quad from the control points of a path.
    ///
    /// The first four points are used in the order given; extra points are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InsufficientCorners`] if fewer than four points are given.
    ///
    /// # Example
    ///
    /// ```
    /// use quadwarp_geometry::{Point2d, Quad};
    ///
    /// let path = [
    ///     Point2d::new(0.0, 0.0),
    ///     Point2d::new(4.0, 0.0),
    ///     Point2d::new(4.0, 3.0),
    ///     Point2d::new(0.0, 3.0),
    ///     Point2d::new(0.0, 0.0),
    /// ];
    /// let quad = Quad::from_control_points(&path).unwrap();
    /// assert_eq!(quad, Quad::rectangle(4.0, 3.0));
    /// ```
    pub fn from_control_points(points: &[Point2d]) -> Result<Self, GeometryError> {
        match points {
            [a, b, c, d, ..] => Ok(Self([*a, *b, *c, *d])),
            _ => Err(GeometryError::InsufficientCorners(points.len())),
        }
    }

    /// Axis-aligned rectangle (0,0)-(w,0)-(w,h)-(0,h).
    pub const fn rectangle(width: f64, height: f64) -> Self {
        Self([
            Point2d::new(0.0, 0.0),
            Point2d::new(width, 0.0),
            Point2d::new(width, height),
            Point2d::new(0.0, height),
        ])
    }

    /// The corners in traversal order.
    pub fn corners(&self) -> &[Point2d; 4] {
        &self.0
    }

    /// The same quad shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self(self.0.map(|p| Point2d::new(p.x + dx, p.y + dy)))
    }

    /// The same quad with every coordinate passed through `f`.
    pub fn map_coords(&self, f: impl Fn(f64) -> f64) -> Self {
        Self(self.0.map(|p| Point2d::new(f(p.x), f(p.y))))
    }

    /// Returns true if every corner is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(Point2d::is_finite)
    }

    /// Largest side of the axis-aligned box around the corners.
    pub fn extent(&self) -> f64 {
        let (mut x_min, mut y_min) = (f64::INFINITY, f64::INFINITY);
        let (mut x_max, mut y_max) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.0 {
            x_min = x_min.min(p.x);
            x_max = x_max.max(p.x);
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
        }
        (x_max - x_min).max(y_max - y_min)
    }

    /// Returns true if any three corners are collinear within `rel_tol`.
    ///
    /// Coincident corners count as collinear. The tolerance is relative to the
    /// squared extent of the quad so the test does not depend on its scale.
    pub fn has_collinear_corners(&self, rel_tol: f64) -> bool {
        let extent = self.extent();
        if extent <= 0.0 {
            return true;
        }
        let threshold = rel_tol * extent * extent;
        const TRIPLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
        TRIPLES.iter().any(|&[i, j, k]| {
            linalg::orient2d(&self.0[i], &self.0[j], &self.0[k]).abs() <= threshold
        })
    }
}

impl From<[Point2d; 4]> for Quad {
    fn from(corners: [Point2d; 4]) -> Self {
        Self(corners)
    }
}

impl From<[[f64; 2]; 4]> for Quad {
    fn from(corners: [[f64; 2]; 4]) -> Self {
        Self(corners.map(Point2d::from))
    }
}
