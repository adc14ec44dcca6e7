#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]
#![deny(missing_docs)]

#[doc(inline)]
pub use quadwarp_image as image;

#[doc(inline)]
pub use quadwarp_geometry as geometry;

#[doc(inline)]
pub use quadwarp_imgproc as imgproc;

/// Caller-facing error type.
pub mod error;

/// From a raster and a target quadrilateral to a placed, warped raster.
pub mod pipeline;

/// Conversion between document units and viewport units.
pub mod units;

pub use crate::error::PerspectiveError;
pub use crate::pipeline::{warp_into_quad, Placement, PerspectiveOutput, PerspectiveRequest};
pub use crate::units::{FnUnits, IdentityUnits, UniformScale, UnitConverter};
