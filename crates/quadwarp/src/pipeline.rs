use std::time::Instant;

use quadwarp_geometry::{native_scale, solve, source_corners, BoundingBox, Point2d, Quad};
use quadwarp_image::{ImageSize, RasterImage};
use quadwarp_imgproc::warp::{warp, WarpOptions};

use crate::{error::PerspectiveError, units::UnitConverter};

/// Everything needed to warp one raster into one quadrilateral.
///
/// Sizes and corners are in document units; they are converted to the
/// viewport through the [`UnitConverter`] passed to [`warp_into_quad`].
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveRequest {
    /// The decoded source raster.
    pub source: RasterImage,
    /// Width the source is displayed at.
    pub display_width: f64,
    /// Height the source is displayed at.
    pub display_height: f64,
    /// Corners the source rectangle is mapped onto, matching the source
    /// corners (0,0), (w,0), (w,h), (0,h) in that order.
    pub target: Quad,
}

impl PerspectiveRequest {
    /// Create a request for a quadrilateral given by its corners.
    pub fn new(source: RasterImage, display_width: f64, display_height: f64, target: Quad) -> Self {
        Self {
            source,
            display_width,
            display_height,
            target,
        }
    }

    /// Create a request whose target is the first four control points of a path.
    ///
    /// # Errors
    ///
    /// Returns [`PerspectiveError::InsufficientCorners`] if the path has fewer
    /// than four points.
    pub fn from_control_points(
        source: RasterImage,
        display_width: f64,
        display_height: f64,
        points: &[Point2d],
    ) -> Result<Self, PerspectiveError> {
        let target = Quad::from_control_points(points)?;
        Ok(Self::new(source, display_width, display_height, target))
    }
}

/// Rectangle the warped raster occupies, in document units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// The warped raster together with where it belongs.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveOutput {
    /// The warped raster: alpha-carrying, or a palette image with a transparent index.
    pub image: RasterImage,
    /// Top-left corner of the target bounding box in viewport units.
    pub origin: Point2d,
    /// Size of `image` in pixels.
    pub size: ImageSize,
    /// The same rectangle converted back to document units.
    pub placement: Placement,
}

/// Warp a raster so that its corners land on a target quadrilateral.
///
/// The destination raster covers the bounding box of the target corners in
/// viewport units, one pixel per unit, with its extent truncated to whole
/// pixels. Pixels of the box outside the quadrilateral are transparent.
///
/// # Errors
///
/// * [`PerspectiveError::InvalidDimensions`] if the display size is not
///   positive and finite, a target corner is not finite, or the bounding box
///   is less than one pixel in either direction.
/// * [`PerspectiveError::DegenerateGeometry`] if the target corners do not
///   determine a projective map.
///
/// # Example
///
/// ```
/// use quadwarp::{warp_into_quad, IdentityUnits, PerspectiveRequest};
/// use quadwarp::geometry::Quad;
/// use quadwarp::image::{Image, ImageSize, RasterImage};
/// use quadwarp::imgproc::warp::WarpOptions;
///
/// let source = RasterImage::Rgb(Image::from_size_val([2, 2].into(), 100u8).unwrap());
/// let target = Quad::from([[10.0, 10.0], [14.0, 10.0], [14.0, 14.0], [10.0, 14.0]]);
/// let request = PerspectiveRequest::new(source, 2.0, 2.0, target);
///
/// let output = warp_into_quad(&request, &IdentityUnits, &WarpOptions::default()).unwrap();
/// assert_eq!(output.size, ImageSize { width: 4, height: 4 });
/// assert_eq!(output.placement.x, 10.0);
/// ```
pub fn warp_into_quad(
    request: &PerspectiveRequest,
    units: &impl UnitConverter,
    options: &WarpOptions,
) -> Result<PerspectiveOutput, PerspectiveError> {
    let start = Instant::now();

    let display_width = units.to_viewport(request.display_width);
    let display_height = units.to_viewport(request.display_height);
    let target = request.target.map_coords(|v| units.to_viewport(v));

    let bbox = BoundingBox::from_quad(&target)?;
    let scale = native_scale(request.source.width() as f64, display_width)?;
    let source = source_corners(display_width, display_height, scale)?;
    let local_target = target.translated(-bbox.x_min, -bbox.y_min);

    let coeffs = solve(&source, &local_target)?;

    let (width, height) = bbox.dest_size();
    let size = ImageSize { width, height };
    log::debug!(
        "target box {:?} at scale {scale} gives a {size} destination",
        bbox.origin()
    );

    let image = warp(&request.source, coeffs.as_array(), size, options)?;

    let origin = bbox.origin();
    let placement = Placement {
        x: units.from_viewport(origin.x),
        y: units.from_viewport(origin.y),
        width: units.from_viewport(width as f64),
        height: units.from_viewport(height as f64),
    };
    log::trace!("warp into quad took {:?}", start.elapsed());

    Ok(PerspectiveOutput {
        image,
        origin,
        size,
        placement,
    })
}
