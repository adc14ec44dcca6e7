use quadwarp_geometry::GeometryError;
use quadwarp_image::ImageError;

/// An error raised while warping a raster into a quadrilateral.
///
/// Dimension problems from any stage surface as
/// [`PerspectiveError::InvalidDimensions`], whether they were detected on the
/// display size, the bounding box or the destination raster.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PerspectiveError {
    /// The corner correspondence does not determine a projective transform.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// A display or destination size is zero, negative, non-finite or too large.
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// The target path has fewer than four control points.
    #[error("A quadrilateral needs 4 corners, got {0}")]
    InsufficientCorners(usize),

    /// The source raster violates a raster contract.
    #[error(transparent)]
    Image(ImageError),
}

impl From<GeometryError> for PerspectiveError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::DegenerateGeometry(msg) => PerspectiveError::DegenerateGeometry(msg),
            GeometryError::InvalidDimensions(msg) => PerspectiveError::InvalidDimensions(msg),
            GeometryError::InsufficientCorners(n) => PerspectiveError::InsufficientCorners(n),
        }
    }
}

impl From<ImageError> for PerspectiveError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::InvalidDimensions(..) | ImageError::DimensionsTooLarge(..) => {
                PerspectiveError::InvalidDimensions(err.to_string())
            }
            other => PerspectiveError::Image(other),
        }
    }
}
