use serde::{Deserialize, Serialize};

use super::bicubic::bicubic_interpolation;
use super::bilinear::bilinear_interpolation;
use super::nearest::nearest_neighbor_interpolation;
use quadwarp_image::{Image, ImageDtype};

/// Interpolation mode for resampling operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    /// Bicubic interpolation
    #[default]
    Bicubic,
    /// Bilinear interpolation
    Bilinear,
    /// Nearest neighbor interpolation
    Nearest,
}

/// Kernel for interpolating a pixel value
///
/// # Arguments
///
/// * `image` - The input image container with shape (height, width, C).
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `interpolation` - The interpolation mode to use.
///
/// # Returns
///
/// The interpolated values of all channels.
///
/// PRECONDITION: the image is not empty.
pub fn interpolate_pixel<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    interpolation: InterpolationMode,
) -> [f32; C] {
    match interpolation {
        InterpolationMode::Bicubic => bicubic_interpolation(image, u, v),
        InterpolationMode::Bilinear => bilinear_interpolation(image, u, v),
        InterpolationMode::Nearest => nearest_neighbor_interpolation(image, u, v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use quadwarp_image::ImageError;

    #[test]
    fn interpolate_on_grid_is_exact() -> Result<(), ImageError> {
        let image = Image::<u8, 2>::from_fn([4, 3].into(), |x, y| {
            [(10 * x + y) as u8, 255 - (x + y) as u8]
        })?;

        for mode in [
            InterpolationMode::Nearest,
            InterpolationMode::Bilinear,
            InterpolationMode::Bicubic,
        ] {
            for y in 0..3 {
                for x in 0..4 {
                    let pixel = interpolate_pixel(&image, x as f32, y as f32, mode);
                    assert_relative_eq!(pixel[0], (10 * x + y) as f32, epsilon = 1e-4);
                    assert_relative_eq!(pixel[1], (255 - x - y) as f32, epsilon = 1e-4);
                }
            }
        }

        Ok(())
    }

    #[test]
    fn interpolation_mode_serde() -> Result<(), serde_json::Error> {
        let mode: InterpolationMode = serde_json::from_str("\"bilinear\"")?;
        assert_eq!(mode, InterpolationMode::Bilinear);
        assert_eq!(InterpolationMode::default(), InterpolationMode::Bicubic);
        Ok(())
    }
}
