use faer::prelude::SpSolver;
use serde::{Deserialize, Serialize};

use crate::{
    error::GeometryError,
    linalg,
    types::{Point2d, Quad},
};

/// Corners closer to collinear than this, relative to the squared quad extent, are rejected.
const COLLINEAR_TOLERANCE: f64 = 1e-9;

/// Smallest accepted ratio between the extreme singular values of the linear system.
const MIN_SINGULAR_VALUE_RATIO: f64 = 1e-12;

/// Denominators below this magnitude map to infinity.
const DENOMINATOR_EPSILON: f64 = 1e-10;

/// Accepted corner reprojection error, relative to the source quad extent.
const REPROJECTION_TOLERANCE: f64 = 1e-6;

/// The eight coefficients of a projective transform.
///
/// The transform maps a point `(x, y)` as
///
/// ```text
/// x' = (a*x + b*y + c) / (g*x + h*y + 1)
/// y' = (d*x + e*y + f) / (g*x + h*y + 1)
/// ```
///
/// Coefficients returned by [`solve`] map target (destination) coordinates back
/// to source coordinates, which is the direction a resampler needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomographyCoefficients(pub [f64; 8]);

impl HomographyCoefficients {
    /// The identity map.
    pub const fn identity() -> Self {
        Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0])
    }

    /// The coefficients as `[a, b, c, d, e, f, g, h]`.
    pub fn as_array(&self) -> &[f64; 8] {
        &self.0
    }

    /// The coefficients as a row-major 3x3 matrix with a unit bottom-right entry.
    pub fn to_mat33(&self) -> [[f64; 3]; 3] {
        let [a, b, c, d, e, f, g, h] = self.0;
        [[a, b, c], [d, e, f], [g, h, 1.0]]
    }

    /// Map a point.
    ///
    /// Returns `None` when the point maps to infinity or the result is not finite.
    pub fn apply(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let [a, b, c, d, e, f, g, h] = self.0;
        let w = g * x + h * y + 1.0;
        if !(w.abs() > DENOMINATOR_EPSILON) {
            return None;
        }
        let u = (a * x + b * y + c) / w;
        let v = (d * x + e * y + f) / w;
        (u.is_finite() && v.is_finite()).then_some((u, v))
    }

    /// Returns true if the perspective terms `g` and `h` vanish within `tol`.
    pub fn is_affine(&self, tol: f64) -> bool {
        self.0[6].abs() <= tol && self.0[7].abs() <= tol
    }
}

impl Default for HomographyCoefficients {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<HomographyCoefficients> for [f64; 8] {
    fn from(coeffs: HomographyCoefficients) -> Self {
        coeffs.0
    }
}

/// Uniform scaling that brings the mean distance of the corners from the
/// origin to sqrt(2).
///
/// The corners are not moved to their centroid: the origin stays fixed, so
/// pinning the last matrix entry to 1 constrains the same map on the scaled
/// system as on the unscaled one.
fn normalization(quad: &Quad) -> [[f64; 3]; 3] {
    let mean_dist = quad.corners().iter().map(|p| p.x.hypot(p.y)).sum::<f64>() / 4.0;
    let s = if mean_dist > 0.0 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };

    [[s, 0.0, 0.0], [0.0, s, 0.0], [0.0, 0.0, 1.0]]
}

/// Inverse of a matrix produced by [`normalization`].
fn denormalization(n: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let s = n[0][0];
    [[1.0 / s, 0.0, 0.0], [0.0, 1.0 / s, 0.0], [0.0, 0.0, 1.0]]
}

fn apply_mat33(m: &[[f64; 3]; 3], p: &Point2d) -> Point2d {
    let [x, y, w] = linalg::mat33_mul_vec3(m, &[p.x, p.y, 1.0]);
    Point2d::new(x / w, y / w)
}

fn check_quad(name: &str, quad: &Quad) -> Result<(), GeometryError> {
    if !quad.is_finite() {
        return Err(GeometryError::DegenerateGeometry(format!(
            "{name} quad has non-finite corners"
        )));
    }
    if quad.has_collinear_corners(COLLINEAR_TOLERANCE) {
        return Err(GeometryError::DegenerateGeometry(format!(
            "{name} quad has three collinear or two coincident corners"
        )));
    }
    Ok(())
}

/// Compute the projective transform taking each target corner onto its source corner.
///
/// Each correspondence `(s, t)` contributes the two rows
///
/// ```text
/// [t.x, t.y, 1, 0,   0,   0, -s.x*t.x, -s.x*t.y] . coeffs = s.x
/// [0,   0,   0, t.x, t.y, 1, -s.y*t.x, -s.y*t.y] . coeffs = s.y
/// ```
///
/// and the 8x8 system is solved through its normal equations `AᵗA x = AᵗB`.
/// Both quads are first scaled about the origin so the system stays well
/// conditioned for pixel-sized coordinates. Any map the unscaled system
/// determines is found, including ones that send some interior point of a
/// non-convex target to infinity.
///
/// # Arguments
///
/// * `source` - The corners in source raster space.
/// * `target` - The corners in destination space, in the same order.
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateGeometry`] when the corners do not define a
/// unique invertible transform (three collinear corners, coincident corners,
/// non-finite input or a numerically singular system).
///
/// # Example
///
/// ```
/// use quadwarp_geometry::{solve, Quad};
///
/// let source = Quad::rectangle(2.0, 2.0);
/// let target = Quad::rectangle(4.0, 4.0);
/// let coeffs = solve(&source, &target).unwrap();
///
/// let (x, y) = coeffs.apply(4.0, 4.0).unwrap();
/// assert!((x - 2.0).abs() < 1e-9 && (y - 2.0).abs() < 1e-9);
/// ```
pub fn solve(source: &Quad, target: &Quad) -> Result<HomographyCoefficients, GeometryError> {
    check_quad("source", source)?;
    check_quad("target", target)?;

    let norm_src = normalization(source);
    let norm_dst = normalization(target);

    // construct the linear system on normalized coordinates
    let mut rows = [[0.0f64; 8]; 8];
    let mut rhs = [0.0f64; 8];
    for (k, (s, t)) in source.corners().iter().zip(target.corners()).enumerate() {
        let s = apply_mat33(&norm_src, s);
        let t = apply_mat33(&norm_dst, t);
        rows[2 * k] = [t.x, t.y, 1.0, 0.0, 0.0, 0.0, -s.x * t.x, -s.x * t.y];
        rows[2 * k + 1] = [0.0, 0.0, 0.0, t.x, t.y, 1.0, -s.y * t.x, -s.y * t.y];
        rhs[2 * k] = s.x;
        rhs[2 * k + 1] = s.y;
    }

    let mat_a = faer::Mat::<f64>::from_fn(8, 8, |i, j| rows[i][j]);
    let vec_b = faer::Mat::<f64>::from_fn(8, 1, |i, _| rhs[i]);

    let singular_values = mat_a.singular_values();
    let (sv_min, sv_max) = singular_values
        .iter()
        .fold((f64::INFINITY, 0.0f64), |(lo, hi), &sv| (lo.min(sv), hi.max(sv)));
    if !(sv_max > 0.0) || !(sv_min / sv_max >= MIN_SINGULAR_VALUE_RATIO) {
        return Err(GeometryError::DegenerateGeometry(format!(
            "singular correspondence system (singular values {sv_min:e}..{sv_max:e})"
        )));
    }

    // solve the normal equations: (AᵗA) x = AᵗB
    let mat_at = mat_a.transpose();
    let mat_ata = mat_at * mat_a.as_ref();
    let vec_atb = mat_at * vec_b.as_ref();
    let solution = mat_ata.partial_piv_lu().solve(vec_atb);

    let mut h = [0.0f64; 8];
    for (i, val) in h.iter_mut().enumerate() {
        *val = solution.read(i, 0);
    }

    // undo the normalization: H = N_src⁻¹ · Hn · N_dst
    let hn = HomographyCoefficients(h).to_mat33();
    let h_mat = linalg::mat33_mul(&linalg::mat33_mul(&denormalization(&norm_src), &hn), &norm_dst);

    let scale = h_mat[2][2];
    if !(scale.abs() > DENOMINATOR_EPSILON) || linalg::det_mat33(&h_mat).abs() == 0.0 {
        return Err(GeometryError::DegenerateGeometry(
            "transform sends the target origin to infinity".to_string(),
        ));
    }

    let coeffs = HomographyCoefficients([
        h_mat[0][0] / scale,
        h_mat[0][1] / scale,
        h_mat[0][2] / scale,
        h_mat[1][0] / scale,
        h_mat[1][1] / scale,
        h_mat[1][2] / scale,
        h_mat[2][0] / scale,
        h_mat[2][1] / scale,
    ]);

    if coeffs.0.iter().any(|c| !c.is_finite()) {
        return Err(GeometryError::DegenerateGeometry(
            "non-finite coefficients".to_string(),
        ));
    }

    // the solved map must send every target corner back onto its source corner
    let tol = REPROJECTION_TOLERANCE * source.extent().max(1.0);
    for (s, t) in source.corners().iter().zip(target.corners()) {
        match coeffs.apply(t.x, t.y) {
            Some((x, y)) if (x - s.x).abs() <= tol && (y - s.y).abs() <= tol => {}
            _ => {
                return Err(GeometryError::DegenerateGeometry(format!(
                    "corner ({}, {}) does not map onto ({}, {})",
                    t.x, t.y, s.x, s.y
                )))
            }
        }
    }

    log::debug!("solved homography coefficients: {:?}", coeffs.0);

    Ok(coeffs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_coeffs_eq(actual: &HomographyCoefficients, expected: &[f64; 8], epsilon: f64) {
        for (a, e) in actual.as_array().iter().zip(expected.iter()) {
            assert_relative_eq!(*a, *e, epsilon = epsilon);
        }
    }

    #[test]
    fn test_solve_identity() -> Result<(), GeometryError> {
        let quad = Quad::rectangle(640.0, 480.0);
        let coeffs = solve(&quad, &quad)?;
        assert_coeffs_eq(&coeffs, HomographyCoefficients::identity().as_array(), 1e-9);
        Ok(())
    }

    #[test]
    fn test_solve_scale() -> Result<(), GeometryError> {
        let source = Quad::rectangle(2.0, 2.0);
        let target = Quad::rectangle(4.0, 4.0);
        let coeffs = solve(&source, &target)?;
        assert_coeffs_eq(&coeffs, &[0.5, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0], 1e-9);
        assert!(coeffs.is_affine(1e-12));
        Ok(())
    }

    #[test]
    fn test_solve_rotation() -> Result<(), GeometryError> {
        // rotate the 4x2 rectangle by 90 degrees and shift it back into view
        let source = Quad::rectangle(4.0, 2.0);
        let target = Quad::from([[2.0, 0.0], [2.0, 4.0], [0.0, 4.0], [0.0, 0.0]]);
        let coeffs = solve(&source, &target)?;
        assert_coeffs_eq(&coeffs, &[0.0, 1.0, 0.0, -1.0, 0.0, 2.0, 0.0, 0.0], 1e-9);
        assert!(coeffs.is_affine(1e-9));
        Ok(())
    }

    #[test]
    fn test_solve_translation_and_scale() -> Result<(), GeometryError> {
        let source = Quad::rectangle(300.0, 200.0);
        let target = Quad::rectangle(150.0, 100.0).translated(20.0, 30.0);
        let coeffs = solve(&source, &target)?;
        assert_coeffs_eq(&coeffs, &[2.0, 0.0, -40.0, 0.0, 2.0, -60.0, 0.0, 0.0], 1e-8);
        Ok(())
    }

    #[test]
    fn test_solve_perspective() -> Result<(), GeometryError> {
        let expected = HomographyCoefficients([0.9, 0.1, 5.0, -0.05, 1.1, 2.0, 0.001, 0.0005]);
        let target = Quad::from([[0.0, 0.0], [100.0, 10.0], [110.0, 120.0], [-5.0, 90.0]]);

        let mut source = [Point2d::default(); 4];
        for (s, t) in source.iter_mut().zip(target.corners()) {
            let (x, y) = expected.apply(t.x, t.y).ok_or_else(|| {
                GeometryError::DegenerateGeometry("test setup".to_string())
            })?;
            *s = Point2d::new(x, y);
        }

        let coeffs = solve(&Quad::new(source), &target)?;
        assert_coeffs_eq(&coeffs, expected.as_array(), 1e-9);
        assert!(!coeffs.is_affine(1e-6));
        Ok(())
    }

    #[test]
    fn test_solve_centroid_at_infinity() -> Result<(), GeometryError> {
        // non-convex target whose centroid lies on the horizon of the map
        let r = 1.0 + std::f64::consts::SQRT_2;
        let q = 3.0 + 2.0 * std::f64::consts::SQRT_2;
        let target = Quad::from([[0.0, 0.0], [r, 0.0], [-q, -q], [0.0, r]]);
        let source = Quad::rectangle(1.0, 1.0);

        let coeffs = solve(&source, &target)?;
        let p = 2.0 - std::f64::consts::SQRT_2;
        assert_coeffs_eq(&coeffs, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, p, p], 1e-9);

        let (cx, cy) = target
            .corners()
            .iter()
            .fold((0.0, 0.0), |(x, y), c| (x + c.x / 4.0, y + c.y / 4.0));
        assert_eq!(coeffs.apply(cx, cy), None);
        Ok(())
    }

    #[test]
    fn test_solve_large_coordinates() -> Result<(), GeometryError> {
        let source = Quad::rectangle(4000.0, 3000.0);
        let target = Quad::from([
            [1210.5, 388.25],
            [2990.0, 512.0],
            [3105.75, 2240.0],
            [1002.0, 2010.5],
        ]);
        let coeffs = solve(&source, &target)?;
        for (s, t) in source.corners().iter().zip(target.corners()) {
            let (x, y) = coeffs.apply(t.x, t.y).ok_or_else(|| {
                GeometryError::DegenerateGeometry("corner at infinity".to_string())
            })?;
            assert_relative_eq!(x, s.x, epsilon = 1e-6);
            assert_relative_eq!(y, s.y, epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn test_solve_collinear_target() {
        let source = Quad::rectangle(10.0, 10.0);
        let target = Quad::from([[0.0, 0.0], [5.0, 5.0], [10.0, 10.0], [0.0, 10.0]]);
        let result = solve(&source, &target);
        assert!(matches!(result, Err(GeometryError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_solve_all_collinear() {
        let source = Quad::rectangle(10.0, 10.0);
        let target = Quad::from([[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, 0.0]]);
        let result = solve(&source, &target);
        assert!(matches!(result, Err(GeometryError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_solve_coincident_target() {
        let source = Quad::rectangle(10.0, 10.0);
        let target = Quad::from([[0.0, 0.0], [10.0, 0.0], [10.0, 0.0], [0.0, 10.0]]);
        let result = solve(&source, &target);
        assert!(matches!(result, Err(GeometryError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_solve_degenerate_source() {
        let source = Quad::rectangle(0.0, 10.0);
        let target = Quad::rectangle(10.0, 10.0);
        let result = solve(&source, &target);
        assert!(matches!(result, Err(GeometryError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_solve_non_finite() {
        let source = Quad::rectangle(10.0, 10.0);
        let target = Quad::from([[0.0, 0.0], [f64::NAN, 0.0], [10.0, 10.0], [0.0, 10.0]]);
        let result = solve(&source, &target);
        assert!(matches!(result, Err(GeometryError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_apply_at_infinity() {
        // w = 1 - x vanishes on the line x = 1
        let coeffs = HomographyCoefficients([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, -1.0, 0.0]);
        assert_eq!(coeffs.apply(1.0, 3.0), None);
        assert_eq!(coeffs.apply(0.0, 3.0), Some((0.0, 3.0)));
    }

    #[test]
    fn test_to_mat33() {
        let coeffs = HomographyCoefficients([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(
            coeffs.to_mat33(),
            [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 1.0]]
        );
        assert_eq!(HomographyCoefficients::default(), HomographyCoefficients::identity());
    }
}
