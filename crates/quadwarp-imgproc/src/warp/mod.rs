//! Perspective resampling of rasters into a destination grid.
//!
//! Every destination pixel is pulled from the source through a projective
//! map expressed as eight coefficients `[a, b, c, d, e, f, g, h]`:
//!
//! ```text
//! u = (a·x + b·y + c) / (g·x + h·y + 1)
//! v = (d·x + e·y + f) / (g·x + h·y + 1)
//! ```
//!
//! where `(x, y)` is a destination coordinate and `(u, v)` the matching
//! source coordinate.
//!
//! # Examples
//!
//! Upscaling a 2x2 raster by two:
//!
//! ```
//! use quadwarp_image::{Image, ImageSize, RasterImage};
//! use quadwarp_imgproc::warp::{warp, WarpOptions};
//!
//! let src = RasterImage::Gray(Image::new([2, 2].into(), vec![0, 50, 100, 150]).unwrap());
//! let coeffs = [0.5, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0];
//!
//! let dst = warp(&src, &coeffs, ImageSize { width: 4, height: 4 }, &WarpOptions::default()).unwrap();
//! assert_eq!(dst.size(), ImageSize { width: 4, height: 4 });
//! ```

mod perspective;
mod raster;

pub use perspective::{transform_point, warp_perspective};
pub use raster::{warp, WarpOptions, DEFAULT_MAX_PIXELS};
