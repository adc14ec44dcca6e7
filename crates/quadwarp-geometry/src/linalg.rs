use crate::types::Point2d;

/// Twice the signed area of the triangle `(a, b, c)`.
///
/// Positive for counter-clockwise order in a y-up frame, zero when the points are collinear.
pub fn orient2d(a: &Point2d, b: &Point2d, c: &Point2d) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Determinant of a row-major 3x3 matrix.
#[rustfmt::skip]
pub fn det_mat33(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1]) -
    m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0]) +
    m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Multiply two row-major 3x3 matrices.
pub fn mat33_mul(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    out
}

/// Multiply a row-major 3x3 matrix by a column vector.
pub fn mat33_mul_vec3(m: &[[f64; 3]; 3], v: &[f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orient2d() {
        let (a, b) = (Point2d::new(0.0, 0.0), Point2d::new(1.0, 0.0));
        assert_relative_eq!(orient2d(&a, &b, &Point2d::new(0.0, 1.0)), 1.0);
        assert_relative_eq!(orient2d(&a, &b, &Point2d::new(0.0, -1.0)), -1.0);
        assert_relative_eq!(orient2d(&a, &b, &Point2d::new(7.0, 0.0)), 0.0);
    }

    #[test]
    fn test_det_mat33() {
        let m = [[2.0, 0.0, 1.0], [0.0, 3.0, 0.0], [0.0, 0.0, 0.5]];
        assert_relative_eq!(det_mat33(&m), 3.0);

        let singular = [[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 1.0]];
        assert_relative_eq!(det_mat33(&singular), 0.0);
    }

    #[test]
    fn test_mat33_mul() {
        let scale = [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 1.0]];
        let shift = [[1.0, 0.0, 3.0], [0.0, 1.0, -1.0], [0.0, 0.0, 1.0]];
        let expected = [[2.0, 0.0, 6.0], [0.0, 2.0, -2.0], [0.0, 0.0, 1.0]];
        assert_eq!(mat33_mul(&scale, &shift), expected);
    }

    #[test]
    fn test_mat33_mul_vec3() {
        let m = [[1.0, 0.0, 2.0], [0.0, 1.0, -1.0], [0.0, 0.0, 1.0]];
        assert_eq!(mat33_mul_vec3(&m, &[1.0, 1.0, 1.0]), [3.0, 0.0, 1.0]);
    }
}
