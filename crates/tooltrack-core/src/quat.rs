use nalgebra::{Matrix3, Matrix4, Vector3};
use serde::{Deserialize, Serialize};

/// Reduced unit quaternion: the imaginary components `(b, c, d)` of
/// `a + bi + cj + dk`.
///
/// The real part `a` is never stored; it is derived on demand as
/// `sqrt(max(1 - b^2 - c^2 - d^2, 0))`. The clamp keeps the square root
/// well-defined when round-off pushes the imaginary norm slightly past 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReducedQuat {
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl ReducedQuat {
    pub fn new(b: f64, c: f64, d: f64) -> Self {
        Self { b, c, d }
    }

    /// The identity rotation, `(0, 0, 0)`.
    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Derived real part `a`, clamped to keep `a^2 >= 0`.
    pub fn real_part(&self) -> f64 {
        let aa = 1.0 - self.b * self.b - self.c * self.c - self.d * self.d;
        aa.max(0.0).sqrt()
    }

    /// Convert to a 3x3 rotation matrix.
    ///
    /// For any input with `b^2 + c^2 + d^2 <= 1` the result is orthonormal
    /// with determinant +1. Inputs past that bound get `a` clamped to 0 and
    /// still produce a valid rotation.
    pub fn to_rotation(&self) -> Matrix3<f64> {
        let (b, c, d) = (self.b, self.c, self.d);
        let (bb, cc, dd) = (b * b, c * c, d * d);
        let aa = (1.0 - bb - cc - dd).max(0.0);
        let a = aa.sqrt();
        let ab2 = 2.0 * a * b;
        let ac2 = 2.0 * a * c;
        let ad2 = 2.0 * a * d;
        let bc2 = 2.0 * b * c;
        let bd2 = 2.0 * b * d;
        let cd2 = 2.0 * c * d;
        Matrix3::new(
            aa + bb - cc - dd,
            bc2 - ad2,
            bd2 + ac2, //
            bc2 + ad2,
            aa + cc - bb - dd,
            cd2 - ab2, //
            bd2 - ac2,
            cd2 + ab2,
            aa + dd - bb - cc,
        )
    }

    /// Embed the rotation and a translation into a 4x4 homogeneous
    /// transform: rotation in the top-left block, `t` in the last column,
    /// bottom row `(0, 0, 0, 1)`.
    pub fn to_affine(&self, t: &Vector3<f64>) -> Matrix4<f64> {
        let r = self.to_rotation();
        let mut affine = Matrix4::identity();
        affine.fixed_view_mut::<3, 3>(0, 0).copy_from(&r);
        affine.fixed_view_mut::<3, 1>(0, 3).copy_from(t);
        affine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_proper_rotation(r: &Matrix3<f64>) {
        let gram = r.transpose() * r;
        assert_relative_eq!(gram, Matrix3::identity(), epsilon = 1e-12);
        assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn identity_quat_gives_identity_rotation() {
        let r = ReducedQuat::identity().to_rotation();
        assert_relative_eq!(r, Matrix3::identity(), epsilon = 1e-15);
    }

    #[test]
    fn in_bound_quats_give_proper_rotations() {
        for &(b, c, d) in &[
            (0.1, 0.0, 0.0),
            (0.0, -0.4, 0.3),
            (0.5, 0.5, 0.5),
            (-0.7, 0.1, 0.2),
            (0.0, 0.0, 1.0),
        ] {
            let r = ReducedQuat::new(b, c, d).to_rotation();
            assert_proper_rotation(&r);
        }
    }

    #[test]
    fn out_of_bound_quat_is_clamped_to_a_valid_rotation() {
        // Imaginary norm slightly above 1; the real part clamps to 0 and
        // the matrix must stay a proper rotation.
        let n = (1.0f64 + 1e-9).sqrt();
        let q = ReducedQuat::new(0.6 * n, 0.48 * n, 0.64 * n);
        assert_eq!(q.real_part(), 0.0);
        assert_proper_rotation(&q.to_rotation());
    }

    #[test]
    fn half_turn_about_x() {
        // b = 1 means a = 0, a 180 degree rotation about the x axis.
        let r = ReducedQuat::new(1.0, 0.0, 0.0).to_rotation();
        let expected = Matrix3::new(
            1.0, 0.0, 0.0, //
            0.0, -1.0, 0.0, //
            0.0, 0.0, -1.0,
        );
        assert_relative_eq!(r, expected, epsilon = 1e-15);
    }

    #[test]
    fn affine_layout() {
        let q = ReducedQuat::new(0.2, -0.1, 0.3);
        let t = Vector3::new(4.0, -5.0, 6.0);
        let m = q.to_affine(&t);

        let r = q.to_rotation();
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m[(i, j)], r[(i, j)]);
            }
            assert_eq!(m[(i, 3)], t[i]);
            assert_eq!(m[(3, i)], 0.0);
        }
        assert_eq!(m[(3, 3)], 1.0);
    }
}
