//! Closed-form rigid registration of two matched point sets.
//!
//! Follows the notation of P.J. Besl and N.D. McKay, "A Method for
//! Registration of 3-D Shapes", IEEE Trans. PAMI 14, 1992. The method
//! itself is Horn's quaternion solution (J. Opt. Soc. Amer. A 4(4), 1987),
//! which also covers per-point weights and a uniform scale factor.

use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};
use serde::{Deserialize, Serialize};

use crate::error::FitError;
use crate::quat::ReducedQuat;

/// Result of fitting matched point sets: a rotation (reduced quaternion),
/// a translation, and a uniform scale factor (1.0 unless requested).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointFit {
    pub quat: ReducedQuat,
    pub translation: Vector3<f64>,
    pub scale: f64,
}

impl PointFit {
    /// The rotation component as a 3x3 matrix.
    pub fn rotation(&self) -> Matrix3<f64> {
        self.quat.to_rotation()
    }

    /// The full 4x4 homogeneous transform, rotation block pre-scaled by the
    /// uniform scale factor.
    pub fn affine(&self) -> Matrix4<f64> {
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&(self.quat.to_rotation() * self.scale));
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.translation);
        m
    }
}

/// Fit the rigid transform (and optionally a uniform scale) that best maps
/// `p` onto `x` in the weighted least-squares sense.
///
/// Correspondence is by index: `p[i]` matches `x[i]`. Weights, when given,
/// must be non-negative with a positive sum; they are normalized internally.
/// Absent weights mean uniform weighting.
///
/// Caution: with exactly 3 points, or 4 points in a symmetric layout, the
/// geometry can be explained equivalently under 180 degree rotations. The
/// returned rotation is valid but may be the flipped solution.
pub fn fit_matched_points(
    p: &[Point3<f64>],
    x: &[Point3<f64>],
    weights: Option<&[f64]>,
    scale: bool,
) -> Result<PointFit, FitError> {
    if p.is_empty() || x.is_empty() {
        return Err(FitError::EmptyPointSet);
    }
    if p.len() != x.len() {
        return Err(FitError::CardinalityMismatch {
            p: p.len(),
            x: x.len(),
        });
    }
    let w = normalized_weights(p.len(), weights)?;

    // Weighted centroids.
    let mut mu_p = Vector3::zeros();
    let mut mu_x = Vector3::zeros();
    for i in 0..p.len() {
        mu_p += w[i] * p[i].coords;
        mu_x += w[i] * x[i].coords;
    }

    // Weighted cross-covariance, eq. 24 in Besl-McKay.
    let mut sigma_px = Matrix3::zeros();
    for i in 0..p.len() {
        sigma_px += w[i] * (p[i].coords * x[i].coords.transpose());
    }
    sigma_px -= mu_p * mu_x.transpose();

    let a_ij = sigma_px - sigma_px.transpose();
    let delta = Vector3::new(a_ij[(1, 2)], a_ij[(2, 0)], a_ij[(0, 1)]);
    let tr = sigma_px.trace();

    // "N" in Horn's paper: symmetric 4x4 whose top eigenvector is the
    // optimal unit quaternion, real part first.
    let mut q = Matrix4::zeros();
    q[(0, 0)] = tr;
    for i in 0..3 {
        q[(0, i + 1)] = delta[i];
        q[(i + 1, 0)] = delta[i];
    }
    let sym = sigma_px + sigma_px.transpose() - tr * Matrix3::identity();
    q.fixed_view_mut::<3, 3>(1, 1).copy_from(&sym);

    let eigen = q.symmetric_eigen();
    let top: Vector4<f64> = eigen.eigenvectors.column(eigen.eigenvalues.imax()).clone_owned();

    // Canonical sign: non-negative real part.
    let mut quat = ReducedQuat::new(top[1], top[2], top[3]);
    if top[0] != 0.0 {
        let sign = top[0].signum();
        quat = ReducedQuat::new(sign * quat.b, sign * quat.c, sign * quat.d);
    }

    // Scale is the ratio of weighted variances; p is "from", x is "to".
    let s = if scale {
        let mut var_p = 0.0;
        let mut var_x = 0.0;
        for i in 0..p.len() {
            var_p += w[i] * (p[i].coords - mu_p).norm_squared();
            var_x += w[i] * (x[i].coords - mu_x).norm_squared();
        }
        (var_x / var_p).sqrt()
    } else {
        1.0
    };

    let translation = mu_x - s * (quat.to_rotation() * mu_p);
    Ok(PointFit {
        quat,
        translation,
        scale: s,
    })
}

fn normalized_weights(n: usize, weights: Option<&[f64]>) -> Result<Vec<f64>, FitError> {
    match weights {
        None => Ok(vec![1.0 / n as f64; n]),
        Some(w) => {
            if w.len() != n {
                return Err(FitError::WeightCountMismatch {
                    points: n,
                    weights: w.len(),
                });
            }
            if let Some((index, &value)) = w.iter().enumerate().find(|(_, v)| **v < 0.0) {
                return Err(FitError::NegativeWeight { index, value });
            }
            let sum: f64 = w.iter().sum();
            if !(sum > 0.0) {
                return Err(FitError::NonPositiveWeightSum);
            }
            Ok(w.iter().map(|v| v / sum).collect())
        }
    }
}
