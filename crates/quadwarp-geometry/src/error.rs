/// An error type for the geometry module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The point correspondences do not determine a unique projective transform.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// A size or extent is zero, negative or not finite.
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Fewer than four corners were supplied.
    #[error("A quadrilateral needs 4 corners, got {0}")]
    InsufficientCorners(usize),
}
