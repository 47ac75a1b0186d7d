//! Closed-form rigid registration for optical motion-capture markers.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! know about any capture protocol or rendering backend: given two matched
//! sets of 3D marker positions, it computes the rotation, translation, and
//! optional uniform scale that best align them (Horn's quaternion method),
//! and converts the result into a 4x4 homogeneous transform.

mod error;
mod fit;
mod logger;
mod quat;

pub use error::FitError;
pub use fit::{fit_matched_points, PointFit};
pub use quat::ReducedQuat;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;
pub use logger::{init_with_level, is_initialized};
