//! Conversion of rasters without an alpha channel into alpha-carrying ones.
//!
//! The resampler writes transparent pixels wherever the destination falls
//! outside the source footprint, so it only operates on rasters that can
//! express transparency. Normalization runs once per raster, before any
//! pixel is resampled.

use std::borrow::Cow;

use quadwarp_image::{Image, ImageError, IndexedImage, RasterImage};

/// Alpha value written for opaque pixels.
const OPAQUE: u8 = 255;

/// A raster able to express transparency, borrowed when the source already
/// is one.
#[derive(Debug)]
pub enum AlphaRaster<'a> {
    /// Luminance and alpha.
    GrayAlpha(Cow<'a, Image<u8, 2>>),
    /// Color and alpha.
    Rgba(Cow<'a, Image<u8, 4>>),
    /// Palette image whose transparent index stands in for alpha.
    Keyed {
        /// The untouched source.
        image: &'a IndexedImage,
        /// Index of the transparent palette entry.
        key: u8,
    },
}

/// Append a fully opaque alpha channel to every pixel.
///
/// `D` must be `C + 1`.
fn with_opaque_alpha<const C: usize, const D: usize>(
    src: &Image<u8, C>,
) -> Result<Image<u8, D>, ImageError> {
    let mut data = Vec::with_capacity(src.as_slice().len() / C.max(1) * D);
    for pixel in src.as_slice().chunks_exact(C) {
        data.extend_from_slice(pixel);
        data.push(OPAQUE);
    }
    Image::new(src.size(), data)
}

/// Expand a palette image without a transparent index to opaque RGBA.
fn expand_palette(src: &IndexedImage) -> Result<Image<u8, 4>, ImageError> {
    let palette = src.palette();
    let mut data = Vec::with_capacity(src.indices().as_slice().len() * 4);
    for &index in src.indices().as_slice() {
        let [r, g, b] = *palette
            .get(usize::from(index))
            .ok_or(ImageError::InvalidPaletteIndex(index, palette.len()))?;
        data.extend_from_slice(&[r, g, b, OPAQUE]);
    }
    Image::new(src.size(), data)
}

/// View a raster as one carrying transparency, converting only when needed.
///
/// * `Gray` becomes `GrayAlpha` and `Rgb` becomes `Rgba`, fully opaque.
/// * `Indexed` with a transparent index is kept as is: the key already
///   expresses transparency.
/// * `Indexed` without one is expanded through its palette to opaque `Rgba`.
/// * `GrayAlpha` and `Rgba` are borrowed unchanged.
///
/// # Errors
///
/// Fails if a palette index has no palette entry or the converted buffer
/// cannot be built.
///
/// # Example
///
/// ```
/// use quadwarp_image::{Image, RasterImage};
/// use quadwarp_imgproc::alpha::{ensure_alpha, AlphaRaster};
///
/// let rgb = RasterImage::Rgb(Image::from_size_val([2, 2].into(), 9u8).unwrap());
///
/// let AlphaRaster::Rgba(rgba) = ensure_alpha(&rgb).unwrap() else {
///     panic!("rgb normalizes to rgba");
/// };
/// assert_eq!(&rgba.as_slice()[..4], &[9, 9, 9, 255]);
/// ```
pub fn ensure_alpha(image: &RasterImage) -> Result<AlphaRaster<'_>, ImageError> {
    let normalized = match image {
        RasterImage::GrayAlpha(img) => AlphaRaster::GrayAlpha(Cow::Borrowed(img)),
        RasterImage::Rgba(img) => AlphaRaster::Rgba(Cow::Borrowed(img)),
        RasterImage::Gray(img) => AlphaRaster::GrayAlpha(Cow::Owned(with_opaque_alpha(img)?)),
        RasterImage::Rgb(img) => AlphaRaster::Rgba(Cow::Owned(with_opaque_alpha(img)?)),
        RasterImage::Indexed(img) => match img.transparent() {
            Some(key) => AlphaRaster::Keyed { image: img, key },
            None => AlphaRaster::Rgba(Cow::Owned(expand_palette(img)?)),
        },
    };

    if !image.has_transparency() {
        log::debug!(
            "normalized {:?} raster of {} to carry alpha",
            image.format(),
            image.size()
        );
    }

    Ok(normalized)
}
