use crate::{error::ImageError, image::Image, ImageSize};

/// Pixel layout of a decoded raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Single luminance channel.
    Gray,
    /// Luminance followed by alpha.
    GrayAlpha,
    /// Red, green and blue.
    Rgb,
    /// Red, green, blue and alpha.
    Rgba,
    /// One palette index per pixel.
    Indexed,
}

impl PixelFormat {
    /// Number of samples stored per pixel.
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::Gray | PixelFormat::Indexed => 1,
            PixelFormat::GrayAlpha => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }

    /// Returns true if the layout stores an explicit alpha channel.
    pub fn has_alpha(&self) -> bool {
        matches!(self, PixelFormat::GrayAlpha | PixelFormat::Rgba)
    }
}

/// A palette image: one byte per pixel indexing into a table of RGB colors.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedImage {
    indices: Image<u8, 1>,
    palette: Vec<[u8; 3]>,
    transparent: Option<u8>,
}

impl IndexedImage {
    /// Create a palette image.
    ///
    /// # Errors
    ///
    /// Every index, and the transparent index if given, must address an entry
    /// of `palette`.
    pub fn new(
        indices: Image<u8, 1>,
        palette: Vec<[u8; 3]>,
        transparent: Option<u8>,
    ) -> Result<Self, ImageError> {
        let len = palette.len();
        if let Some(&bad) = indices
            .as_slice()
            .iter()
            .chain(transparent.iter())
            .find(|&&i| usize::from(i) >= len)
        {
            return Err(ImageError::InvalidPaletteIndex(bad, len));
        }

        Ok(Self {
            indices,
            palette,
            transparent,
        })
    }

    /// The index plane.
    pub fn indices(&self) -> &Image<u8, 1> {
        &self.indices
    }

    /// The color table.
    pub fn palette(&self) -> &[[u8; 3]] {
        &self.palette
    }

    /// Palette index rendered fully transparent, if any.
    pub fn transparent(&self) -> Option<u8> {
        self.transparent
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.indices.size()
    }
}

/// A decoded raster together with its pixel format.
///
/// This is the typed snapshot a caller hands over after decoding an image
/// file, and what the resampler hands back.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterImage {
    /// 8-bit luminance.
    Gray(Image<u8, 1>),
    /// 8-bit luminance with alpha.
    GrayAlpha(Image<u8, 2>),
    /// 8-bit RGB.
    Rgb(Image<u8, 3>),
    /// 8-bit RGBA.
    Rgba(Image<u8, 4>),
    /// 8-bit palette image.
    Indexed(IndexedImage),
}

impl RasterImage {
    /// The pixel layout of the raster.
    pub fn format(&self) -> PixelFormat {
        match self {
            RasterImage::Gray(_) => PixelFormat::Gray,
            RasterImage::GrayAlpha(_) => PixelFormat::GrayAlpha,
            RasterImage::Rgb(_) => PixelFormat::Rgb,
            RasterImage::Rgba(_) => PixelFormat::Rgba,
            RasterImage::Indexed(_) => PixelFormat::Indexed,
        }
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            RasterImage::Gray(img) => img.size(),
            RasterImage::GrayAlpha(img) => img.size(),
            RasterImage::Rgb(img) => img.size(),
            RasterImage::Rgba(img) => img.size(),
            RasterImage::Indexed(img) => img.size(),
        }
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size().width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size().height
    }

    /// Returns true if some pixels may be transparent.
    ///
    /// Palette images count as transparent only when a transparent index is set.
    pub fn has_transparency(&self) -> bool {
        match self {
            RasterImage::Indexed(img) => img.transparent().is_some(),
            other => other.format().has_alpha(),
        }
    }

    /// Raw interleaved samples; palette images return their index plane.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RasterImage::Gray(img) => img.as_slice(),
            RasterImage::GrayAlpha(img) => img.as_slice(),
            RasterImage::Rgb(img) => img.as_slice(),
            RasterImage::Rgba(img) => img.as_slice(),
            RasterImage::Indexed(img) => img.indices().as_slice(),
        }
    }
}

impl From<Image<u8, 1>> for RasterImage {
    fn from(image: Image<u8, 1>) -> Self {
        RasterImage::Gray(image)
    }
}

impl From<Image<u8, 2>> for RasterImage {
    fn from(image: Image<u8, 2>) -> Self {
        RasterImage::GrayAlpha(image)
    }
}

impl From<Image<u8, 3>> for RasterImage {
    fn from(image: Image<u8, 3>) -> Self {
        RasterImage::Rgb(image)
    }
}

impl From<Image<u8, 4>> for RasterImage {
    fn from(image: Image<u8, 4>) -> Self {
        RasterImage::Rgba(image)
    }
}

impl From<IndexedImage> for RasterImage {
    fn from(image: IndexedImage) -> Self {
        RasterImage::Indexed(image)
    }
}
