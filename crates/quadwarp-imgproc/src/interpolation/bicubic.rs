use quadwarp_image::{Image, ImageDtype};

/// Free parameter of the Keys cubic convolution kernel.
const CUBIC_A: f32 = -0.5;

/// Keys cubic convolution weight for a sample at distance `t`.
fn cubic_weight(t: f32) -> f32 {
    let t = t.abs();
    if t <= 1.0 {
        ((CUBIC_A + 2.0) * t - (CUBIC_A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        ((CUBIC_A * t - 5.0 * CUBIC_A) * t + 8.0 * CUBIC_A) * t - 4.0 * CUBIC_A
    } else {
        0.0
    }
}

/// Weights of the four taps at offsets -1, 0, 1, 2 from the floor of the coordinate.
fn cubic_weights(frac: f32) -> [f32; 4] {
    [
        cubic_weight(1.0 + frac),
        cubic_weight(frac),
        cubic_weight(1.0 - frac),
        cubic_weight(2.0 - frac),
    ]
}

/// Kernel for bicubic interpolation
///
/// Samples the 4x4 neighborhood around `(u, v)`; taps outside the image
/// repeat the nearest edge pixel.
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel values. Values may overshoot the input range
/// slightly near sharp edges.
pub(crate) fn bicubic_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
) -> [f32; C] {
    let (rows, cols) = (image.rows() as isize, image.cols() as isize);

    let (u0, v0) = (u.floor(), v.floor());
    let wx = cubic_weights(u - u0);
    let wy = cubic_weights(v - v0);
    let (iu, iv) = (u0 as isize, v0 as isize);

    let data = image.as_slice();

    let mut pixel = [0.0; C];
    for (j, &w_row) in wy.iter().enumerate() {
        let y = (iv - 1 + j as isize).clamp(0, rows - 1) as usize;

        let mut row = [0.0f32; C];
        for (i, &w_col) in wx.iter().enumerate() {
            let x = (iu - 1 + i as isize).clamp(0, cols - 1) as usize;
            let base = (y * cols as usize + x) * C;
            for (acc, &sample) in row.iter_mut().zip(&data[base..base + C]) {
                let sample: f32 = sample.into();
                *acc += sample * w_col;
            }
        }

        for (acc, val) in pixel.iter_mut().zip(row) {
            *acc += val * w_row;
        }
    }

    pixel
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use quadwarp_image::ImageError;

    #[test]
    fn cubic_weights_partition_unity() {
        for frac in [0.0, 0.1, 0.25, 0.5, 0.75, 0.99] {
            let sum: f32 = cubic_weights(frac).iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-6);
        }
        assert_eq!(cubic_weights(0.0), [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn bicubic_constant_image() -> Result<(), ImageError> {
        let image = Image::<u8, 4>::from_size_val([5, 5].into(), 255)?;
        let pixel = bicubic_interpolation(&image, 1.3, 3.7);
        for val in pixel {
            assert_relative_eq!(val, 255.0, epsilon = 1e-3);
        }
        Ok(())
    }

    #[test]
    fn bicubic_linear_ramp() -> Result<(), ImageError> {
        // the kernel reproduces linear functions away from the border
        let image = Image::<f32, 1>::from_fn([8, 1].into(), |x, _| [2.0 * x as f32])?;
        assert_relative_eq!(bicubic_interpolation(&image, 3.5, 0.0)[0], 7.0, epsilon = 1e-5);
        assert_relative_eq!(bicubic_interpolation(&image, 4.25, 0.0)[0], 8.5, epsilon = 1e-5);
        Ok(())
    }

    #[test]
    fn bicubic_edge_clamps() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new([2, 1].into(), vec![1.0, 3.0])?;
        assert_relative_eq!(bicubic_interpolation(&image, 0.0, 0.0)[0], 1.0);
        assert_relative_eq!(bicubic_interpolation(&image, 1.0, 0.0)[0], 3.0);
        Ok(())
    }
}
