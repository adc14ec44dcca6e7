#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Bounding boxes of quadrilaterals.
pub mod bbox;

/// Error types for the geometry module.
pub mod error;

/// Projective transforms from four point correspondences.
pub mod homography;

/// Small dense linear algebra helpers.
pub mod linalg;

/// Scale between native raster pixels and display units.
pub mod scale;

/// Points and quadrilaterals.
pub mod types;

pub use crate::bbox::BoundingBox;
pub use crate::error::GeometryError;
pub use crate::homography::{solve, HomographyCoefficients};
pub use crate::scale::{native_scale, source_corners};
pub use crate::types::{Point2d, Quad};
