use crate::{
    interpolation::{interpolate_pixel, InterpolationMode},
    parallel::{self, ExecutionStrategy},
};

use super::WarpOptions;
use quadwarp_image::{Image, ImageDtype, ImageError};

/// Denominators at or below this magnitude map to infinity.
const DENOMINATOR_EPSILON: f64 = 1e-10;

/// Map a destination coordinate to the source through the coefficients.
///
/// Returns `None` when the projective denominator vanishes or the result is
/// not finite.
pub fn transform_point(x: f64, y: f64, coeffs: &[f64; 8]) -> Option<(f64, f64)> {
    let [a, b, c, d, e, f, g, h] = *coeffs;
    let w = g * x + h * y + 1.0;
    if !(w.abs() > DENOMINATOR_EPSILON) {
        return None;
    }
    let u = (a * x + b * y + c) / w;
    let v = (d * x + e * y + f) / w;
    (u.is_finite() && v.is_finite()).then_some((u, v))
}

/// Applies a perspective transformation to an image.
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (height, width, channels).
/// * `coeffs` - The eight coefficients mapping dst -> src.
/// * `options` - Interpolation mode and execution strategy.
///
/// Destination pixels are sampled at their centres. A pixel whose centre maps
/// outside `[0, width) x [0, height)` of the source is written with all
/// samples set to zero.
///
/// # Errors
///
/// Fails if either image is empty or the execution strategy cannot run.
///
/// # Example
///
/// ```
/// use quadwarp_image::{Image, ImageSize};
/// use quadwarp_imgproc::warp::{warp_perspective, WarpOptions};
///
/// let src = Image::<f32, 1>::new([2, 3].into(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
///
/// // horizontal flip
/// let coeffs = [-1.0, 0.0, 2.0, 0.0, 1.0, 0.0, 0.0, 0.0];
///
/// let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0).unwrap();
/// warp_perspective(&src, &mut dst, &coeffs, &WarpOptions::default()).unwrap();
///
/// assert_eq!(dst.as_slice(), &[1.0, 0.0, 3.0, 2.0, 5.0, 4.0]);
/// ```
pub fn warp_perspective<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    coeffs: &[f64; 8],
    options: &WarpOptions,
) -> Result<(), ImageError> {
    warp_perspective_fill(
        src,
        dst,
        coeffs,
        options.interpolation,
        options.strategy,
        [T::default(); C],
    )
}

/// Same as [`warp_perspective`], writing `fill` into pixels that map outside
/// the source.
pub(crate) fn warp_perspective_fill<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    coeffs: &[f64; 8],
    interpolation: InterpolationMode,
    strategy: ExecutionStrategy,
    fill: [T; C],
) -> Result<(), ImageError> {
    if src.size().is_empty() {
        return Err(ImageError::InvalidDimensions(src.width(), src.height()));
    }
    if dst.size().is_empty() {
        return Err(ImageError::InvalidDimensions(dst.width(), dst.height()));
    }

    let (src_w, src_h) = (src.cols() as f64, src.rows() as f64);
    let (max_u, max_v) = (src_w - 1.0, src_h - 1.0);

    parallel::par_iter_rows_resample(dst, strategy, |x, y, dst_pixel| {
        let mapped = transform_point(x as f64 + 0.5, y as f64 + 0.5, coeffs)
            .filter(|&(u, v)| (0.0..src_w).contains(&u) && (0.0..src_h).contains(&v));

        match mapped {
            Some((u, v)) => {
                // pixel centres of the source sit on the integer lattice
                let u = (u - 0.5).clamp(0.0, max_u) as f32;
                let v = (v - 0.5).clamp(0.0, max_v) as f32;
                let pixel = interpolate_pixel(src, u, v, interpolation);
                dst_pixel
                    .iter_mut()
                    .zip(pixel)
                    .for_each(|(out, val)| *out = T::from_f32(val));
            }
            None => dst_pixel.copy_from_slice(&fill),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const IDENTITY: [f64; 8] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];

    fn options(interpolation: InterpolationMode) -> WarpOptions {
        WarpOptions {
            interpolation,
            ..Default::default()
        }
    }

    #[test]
    fn transform_point_projective() {
        let shift = [1.0, 0.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0];
        assert_eq!(transform_point(1.0, 1.0, &shift), Some((0.0, 2.0)));

        // w = 1 - x vanishes at x = 1
        let horizon = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, -1.0, 0.0];
        assert_eq!(transform_point(1.0, 3.0, &horizon), None);
        assert_eq!(transform_point(0.5, 3.0, &horizon), Some((1.0, 6.0)));
    }

    #[test]
    fn warp_perspective_identity() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_fn([5, 4].into(), |x, y| {
            [(x * 40) as u8, (y * 60) as u8, (x * y) as u8]
        })?;

        for mode in [
            InterpolationMode::Nearest,
            InterpolationMode::Bilinear,
            InterpolationMode::Bicubic,
        ] {
            let mut dst = Image::<u8, 3>::from_size_val(image.size(), 7)?;
            warp_perspective(&image, &mut dst, &IDENTITY, &options(mode))?;
            assert_eq!(dst.as_slice(), image.as_slice(), "mode {mode:?}");
        }

        Ok(())
    }

    #[test]
    fn warp_perspective_hflip() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new([2, 3].into(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0])?;
        let flip = [-1.0, 0.0, 2.0, 0.0, 1.0, 0.0, 0.0, 0.0];

        let mut dst = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;
        warp_perspective(&image, &mut dst, &flip, &options(InterpolationMode::Bilinear))?;

        assert_eq!(dst.as_slice(), &[1.0, 0.0, 3.0, 2.0, 5.0, 4.0]);
        Ok(())
    }

    #[test]
    fn warp_perspective_shift() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new([4, 4].into(), (0..16).map(|v| v as f32).collect())?;

        // shift left by 1 pixel
        let shift = [1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0];

        let mut dst = Image::<f32, 1>::from_size_val(image.size(), -1.0)?;
        warp_perspective(&image, &mut dst, &shift, &options(InterpolationMode::Bilinear))?;

        let expected = [
            1.0, 2.0, 3.0, 0.0, 5.0, 6.0, 7.0, 0.0, 9.0, 10.0, 11.0, 0.0, 13.0, 14.0, 15.0, 0.0,
        ];
        assert_eq!(dst.as_slice(), &expected);
        Ok(())
    }

    #[test]
    fn warp_perspective_upscale_corners() -> Result<(), ImageError> {
        let image = Image::<u8, 2>::new([2, 2].into(), vec![10, 255, 90, 255, 170, 255, 250, 255])?;
        let half = [0.5, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0];

        let mut dst = Image::<u8, 2>::from_size_val([4, 4].into(), 0)?;
        warp_perspective(&image, &mut dst, &half, &WarpOptions::default())?;

        assert_eq!(dst.pixel(0, 0), Some(&[10u8, 255][..]));
        assert_eq!(dst.pixel(3, 0), Some(&[90u8, 255][..]));
        assert_eq!(dst.pixel(0, 3), Some(&[170u8, 255][..]));
        assert_eq!(dst.pixel(3, 3), Some(&[250u8, 255][..]));
        Ok(())
    }

    #[test]
    fn warp_perspective_bilinear_midpoint() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new([2, 1].into(), vec![0.0, 10.0])?;

        // destination centre 0.5 lands halfway between the two source centres
        let shift = [1.0, 0.0, 0.5, 0.0, 1.0, 0.0, 0.0, 0.0];
        let mut dst = Image::<f32, 1>::from_size_val([1, 1].into(), 0.0)?;
        warp_perspective(&image, &mut dst, &shift, &options(InterpolationMode::Bilinear))?;

        assert_relative_eq!(dst.as_slice()[0], 5.0, epsilon = 1e-5);
        Ok(())
    }

    #[test]
    fn warp_perspective_outside_is_zero() -> Result<(), ImageError> {
        let image = Image::<u8, 4>::from_size_val([3, 3].into(), 200)?;

        // horizon at x = 2, everything past it is undefined
        let horizon = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, -0.5, 0.0];
        let far = [1.0, 0.0, 100.0, 0.0, 1.0, 100.0, 0.0, 0.0];

        for coeffs in [horizon, far] {
            let mut dst = Image::<u8, 4>::from_size_val([4, 2].into(), 9)?;
            warp_perspective(&image, &mut dst, &coeffs, &WarpOptions::default())?;
            assert_eq!(dst.pixel(3, 1), Some(&[0u8, 0, 0, 0][..]));
        }
        Ok(())
    }

    #[test]
    fn warp_perspective_custom_fill() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([2, 1].into(), vec![3, 4])?;

        let mut dst = Image::<u8, 1>::from_size_val([4, 1].into(), 0)?;
        warp_perspective_fill(
            &image,
            &mut dst,
            &IDENTITY,
            InterpolationMode::Nearest,
            ExecutionStrategy::Serial,
            [7],
        )?;
        assert_eq!(dst.as_slice(), &[3, 4, 7, 7]);
        Ok(())
    }

    #[test]
    fn warp_perspective_empty() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;
        let mut empty = Image::<u8, 1>::new([0, 3].into(), vec![])?;

        let res = warp_perspective(&image, &mut empty, &IDENTITY, &WarpOptions::default());
        assert_eq!(res, Err(ImageError::InvalidDimensions(0, 3)));

        let mut dst = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;
        let empty_src = Image::<u8, 1>::new([3, 0].into(), vec![])?;
        let res = warp_perspective(&empty_src, &mut dst, &IDENTITY, &WarpOptions::default());
        assert_eq!(res, Err(ImageError::InvalidDimensions(3, 0)));
        Ok(())
    }

    #[test]
    fn warp_perspective_strategies_agree() -> Result<(), ImageError> {
        let image = Image::<u8, 4>::from_fn([17, 13].into(), |x, y| {
            [(x * 13) as u8, (y * 19) as u8, ((x + y) * 7) as u8, 255]
        })?;
        let coeffs = [0.9, 0.1, 1.5, -0.05, 1.1, 0.5, 0.002, -0.003];

        let mut reference = Image::<u8, 4>::from_size_val([20, 15].into(), 0)?;
        let serial = WarpOptions {
            strategy: ExecutionStrategy::Serial,
            ..Default::default()
        };
        warp_perspective(&image, &mut reference, &coeffs, &serial)?;

        for strategy in [ExecutionStrategy::ParallelRows, ExecutionStrategy::Fixed(3)] {
            let mut dst = Image::<u8, 4>::from_size_val([20, 15].into(), 0)?;
            let opts = WarpOptions {
                strategy,
                ..Default::default()
            };
            warp_perspective(&image, &mut dst, &coeffs, &opts)?;
            assert_eq!(dst, reference);
        }
        Ok(())
    }
}
