use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::perspective::{warp_perspective, warp_perspective_fill};
use crate::{
    alpha::{ensure_alpha, AlphaRaster},
    interpolation::InterpolationMode,
    parallel::ExecutionStrategy,
};
use quadwarp_image::{Image, ImageError, ImageSize, IndexedImage, PixelFormat, RasterImage};

/// Largest destination, in pixels, accepted by default (2^28).
pub const DEFAULT_MAX_PIXELS: usize = 1 << 28;

/// Tunables of the perspective resampler.
///
/// Every field has a default, so a partial JSON object such as
/// `{"interpolation": "bilinear"}` deserializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpOptions {
    /// Kernel used to sample the source.
    pub interpolation: InterpolationMode,
    /// How destination rows are scheduled.
    pub strategy: ExecutionStrategy,
    /// Upper bound on `width * height` of the destination.
    pub max_pixels: usize,
}

impl Default for WarpOptions {
    fn default() -> Self {
        Self {
            interpolation: InterpolationMode::default(),
            strategy: ExecutionStrategy::default(),
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

/// Channels of the layout a raster is resampled in.
fn output_channels(source: &RasterImage) -> usize {
    match source.format() {
        PixelFormat::Gray | PixelFormat::GrayAlpha => 2,
        PixelFormat::Indexed if source.has_transparency() => 1,
        PixelFormat::Rgb | PixelFormat::Rgba | PixelFormat::Indexed => 4,
    }
}

fn check_dst_size(
    dst_size: ImageSize,
    channels: usize,
    max_pixels: usize,
) -> Result<(), ImageError> {
    let ImageSize { width, height } = dst_size;
    if dst_size.is_empty() {
        return Err(ImageError::InvalidDimensions(width, height));
    }
    match dst_size.checked_pixels() {
        Some(pixels) if pixels <= max_pixels => {}
        _ => return Err(ImageError::DimensionsTooLarge(width, height)),
    }
    dst_size
        .checked_len(channels, 1)
        .map(|_| ())
        .ok_or(ImageError::DimensionsTooLarge(width, height))
}

fn warp_typed<const C: usize>(
    src: &Image<u8, C>,
    coeffs: &[f64; 8],
    dst_size: ImageSize,
    options: &WarpOptions,
) -> Result<Image<u8, C>, ImageError> {
    let mut dst = Image::from_size_val(dst_size, 0)?;
    warp_perspective(src, &mut dst, coeffs, options)?;
    Ok(dst)
}

/// Resample the index plane of a keyed palette image.
///
/// Indices are not blended: the kernel is always nearest, and pixels outside
/// the source get the transparent index.
fn warp_keyed(
    src: &IndexedImage,
    key: u8,
    coeffs: &[f64; 8],
    dst_size: ImageSize,
    options: &WarpOptions,
) -> Result<IndexedImage, ImageError> {
    if options.interpolation != InterpolationMode::Nearest {
        log::debug!(
            "palette with transparent index {key} is resampled with nearest instead of {:?}",
            options.interpolation
        );
    }
    let mut indices = Image::from_size_val(dst_size, key)?;
    warp_perspective_fill(
        src.indices(),
        &mut indices,
        coeffs,
        InterpolationMode::Nearest,
        options.strategy,
        [key],
    )?;
    IndexedImage::new(indices, src.palette().to_vec(), Some(key))
}

/// Resample a raster into a destination grid through a perspective map.
///
/// The coefficients map destination coordinates to source coordinates. The
/// source is first normalized to carry alpha (see
/// [`ensure_alpha`](crate::alpha::ensure_alpha)), so the result is
/// [`RasterImage::GrayAlpha`] or [`RasterImage::Rgba`]; pixels that fall
/// outside the source are fully transparent.
///
/// A palette image with a transparent index stays [`RasterImage::Indexed`]
/// with the same palette. Its indices are resampled with nearest whatever
/// `options.interpolation` says, and pixels outside the source get the
/// transparent index.
///
/// # Errors
///
/// * [`ImageError::InvalidDimensions`] if the source or destination is empty.
/// * [`ImageError::DimensionsTooLarge`] if the destination exceeds
///   `options.max_pixels` or its buffer would not fit in memory.
pub fn warp(
    source: &RasterImage,
    coeffs: &[f64; 8],
    dst_size: ImageSize,
    options: &WarpOptions,
) -> Result<RasterImage, ImageError> {
    let src_size = source.size();
    if src_size.is_empty() {
        return Err(ImageError::InvalidDimensions(src_size.width, src_size.height));
    }

    check_dst_size(dst_size, output_channels(source), options.max_pixels)?;

    log::debug!(
        "warping {:?} raster of {} into {} with {:?}",
        source.format(),
        src_size,
        dst_size,
        options.interpolation
    );

    let start = Instant::now();
    let normalized = ensure_alpha(source)?;
    log::trace!("alpha normalization took {:?}", start.elapsed());

    let start = Instant::now();
    let warped = match normalized {
        AlphaRaster::GrayAlpha(src) => {
            RasterImage::GrayAlpha(warp_typed(&*src, coeffs, dst_size, options)?)
        }
        AlphaRaster::Rgba(src) => RasterImage::Rgba(warp_typed(&*src, coeffs, dst_size, options)?),
        AlphaRaster::Keyed { image, key } => {
            RasterImage::Indexed(warp_keyed(image, key, coeffs, dst_size, options)?)
        }
    };
    log::trace!("resampling {} took {:?}", dst_size, start.elapsed());

    Ok(warped)
}
