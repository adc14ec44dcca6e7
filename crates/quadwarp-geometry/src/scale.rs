use crate::{error::GeometryError, types::Quad};

fn check_extent(name: &str, value: f64) -> Result<(), GeometryError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(GeometryError::InvalidDimensions(format!(
            "{name} must be positive and finite, got {value}"
        )));
    }
    Ok(())
}

/// Ratio between the native pixel width of a raster and its display width.
///
/// # Arguments
///
/// * `native_width` - Width of the decoded raster in pixels.
/// * `display_width` - Width the image is placed at, in viewport units.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidDimensions`] if either width is zero,
/// negative or not finite.
///
/// # Example
///
/// ```
/// use quadwarp_geometry::native_scale;
///
/// // a 1000 px wide image shown 250 units wide
/// assert_eq!(native_scale(1000.0, 250.0).unwrap(), 4.0);
/// ```
pub fn native_scale(native_width: f64, display_width: f64) -> Result<f64, GeometryError> {
    check_extent("native width", native_width)?;
    check_extent("display width", display_width)?;
    Ok(native_width / display_width)
}

/// Corners of the source raster at native pixel scale.
///
/// Builds (0,0)-(w·s,0)-(w·s,h·s)-(0,h·s) from the display size and the
/// [`native_scale`] factor, so the homography addresses native pixels no
/// matter what size the image was placed at.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidDimensions`] if a display side or the
/// scale is zero, negative or not finite.
pub fn source_corners(
    display_width: f64,
    display_height: f64,
    scale: f64,
) -> Result<Quad, GeometryError> {
    check_extent("display width", display_width)?;
    check_extent("display height", display_height)?;
    check_extent("scale", scale)?;
    Ok(Quad::rectangle(display_width * scale, display_height * scale))
}
