#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// transparency normalization module.
pub mod alpha;

/// utilities for interpolation.
pub mod interpolation;

/// module containing parallization utilities.
pub mod parallel;

/// image geometric transformations module.
pub mod warp;
