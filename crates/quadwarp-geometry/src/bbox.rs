use serde::{Deserialize, Serialize};

use crate::{
    error::GeometryError,
    types::{Point2d, Quad},
};

/// Axis-aligned extent of a quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Smallest x coordinate.
    pub x_min: f64,
    /// Smallest y coordinate.
    pub y_min: f64,
    /// Largest x coordinate.
    pub x_max: f64,
    /// Largest y coordinate.
    pub y_max: f64,
}

impl BoundingBox {
    /// Compute the bounding box of the quad corners.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidDimensions`] if a corner is not finite.
    pub fn from_quad(quad: &Quad) -> Result<Self, GeometryError> {
        if !quad.is_finite() {
            return Err(GeometryError::InvalidDimensions(
                "quad has non-finite corners".to_string(),
            ));
        }

        let first = quad.corners()[0];
        let bbox = quad.corners()[1..].iter().fold(
            BoundingBox {
                x_min: first.x,
                y_min: first.y,
                x_max: first.x,
                y_max: first.y,
            },
            |b, p| BoundingBox {
                x_min: b.x_min.min(p.x),
                y_min: b.y_min.min(p.y),
                x_max: b.x_max.max(p.x),
                y_max: b.y_max.max(p.y),
            },
        );

        Ok(bbox)
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point2d {
        Point2d::new(self.x_min, self.y_min)
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Destination raster size in whole pixels.
    ///
    /// The extents are truncated towards zero, not rounded: a box 10.9 units
    /// wide yields a 10 pixel wide raster. A zero result is returned as is and
    /// rejected later by the resampler.
    pub fn dest_size(&self) -> (usize, usize) {
        // float to int casts saturate, so huge extents stay huge and are refused downstream
        (self.width().trunc() as usize, self.height().trunc() as usize)
    }
}
