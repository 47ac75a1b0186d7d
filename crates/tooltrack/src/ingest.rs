//! Frame-to-frame pose ingestion.

use log::debug;
use nalgebra::{Matrix4, Point3};

use tooltrack_core::fit_matched_points;

use crate::channel::SharedPoseChannel;

/// Turns a stream of marker frames into published incremental poses.
///
/// The ingestor keeps the previously accepted frame as its baseline. When a
/// new frame arrives with the same marker count, the rigid motion from the
/// baseline to the new frame is fitted and written to the pose channel.
/// A missing baseline, a cardinality change, or an empty frame resets the
/// baseline without publishing: marker identity across a count change is
/// unknown, so the stream resynchronizes instead of guessing.
pub struct FrameIngestor {
    previous: Option<Vec<Point3<f64>>>,
    channel: SharedPoseChannel,
}

impl FrameIngestor {
    pub fn new(channel: SharedPoseChannel) -> Self {
        Self {
            previous: None,
            channel,
        }
    }

    /// Handle to the channel this ingestor publishes into.
    pub fn channel(&self) -> &SharedPoseChannel {
        &self.channel
    }

    /// Process one marker frame; returns the published transform, if any.
    ///
    /// Published transforms are *incremental*: each one is the rigid motion
    /// between two adjacent frames of equal marker count, not an alignment
    /// to a fixed reference. Callers needing an absolute pose must compose
    /// the increments themselves.
    pub fn handle_frame(&mut self, frame: Vec<Point3<f64>>) -> Option<Matrix4<f64>> {
        let publish = match &self.previous {
            Some(prev) if !frame.is_empty() && prev.len() == frame.len() => {
                // Equal non-empty cardinality satisfies every fit
                // precondition, so the Err branch is unreachable here.
                fit_matched_points(prev, &frame, None, false).ok().map(|f| {
                    let affine = f.quat.to_affine(&f.translation);
                    self.channel.write(&affine);
                    debug!("published incremental pose: {affine:.4}");
                    affine
                })
            }
            _ => {
                debug!("baseline reset ({} markers)", frame.len());
                None
            }
        };
        self.previous = Some(frame);
        publish
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use tooltrack_core::ReducedQuat;

    fn frame(n: usize) -> Vec<Point3<f64>> {
        (0..n)
            .map(|i| {
                let k = i as f64;
                Point3::new(k, k * k * 0.5, 3.0 - k)
            })
            .collect()
    }

    #[test]
    fn publishes_only_for_matching_cardinalities() {
        let mut ingestor = FrameIngestor::new(SharedPoseChannel::new());

        assert!(ingestor.handle_frame(frame(5)).is_none()); // no baseline yet
        assert!(ingestor.handle_frame(frame(5)).is_some()); // 5 -> 5
        assert!(ingestor.handle_frame(frame(3)).is_none()); // count change
        assert!(ingestor.handle_frame(frame(5)).is_none()); // 3 -> 5, resync
        assert!(ingestor.handle_frame(frame(5)).is_some()); // 5 -> 5 again
    }

    #[test]
    fn empty_frames_never_publish() {
        let mut ingestor = FrameIngestor::new(SharedPoseChannel::new());
        assert!(ingestor.handle_frame(vec![]).is_none());
        assert!(ingestor.handle_frame(vec![]).is_none());
        assert_eq!(ingestor.channel().read_snapshot(), Matrix4::identity());
    }

    #[test]
    fn published_transform_matches_the_applied_motion() {
        let channel = SharedPoseChannel::new();
        let mut ingestor = FrameIngestor::new(channel.clone());

        let base = frame(6);
        let r = ReducedQuat::new(0.1, -0.2, 0.05).to_rotation();
        let t = Vector3::new(2.0, -1.0, 0.5);
        let moved: Vec<_> = base
            .iter()
            .map(|p| Point3::from(r * p.coords + t))
            .collect();

        ingestor.handle_frame(base);
        let published = ingestor.handle_frame(moved).expect("equal cardinality");

        let mut expected = Matrix4::identity();
        expected.fixed_view_mut::<3, 3>(0, 0).copy_from(&r);
        expected.fixed_view_mut::<3, 1>(0, 3).copy_from(&t);
        assert_relative_eq!(published, expected, epsilon = 1e-9);
        assert_relative_eq!(channel.read_snapshot(), expected, epsilon = 1e-9);
    }

    #[test]
    fn identical_consecutive_frames_publish_identity() {
        let mut ingestor = FrameIngestor::new(SharedPoseChannel::new());
        ingestor.handle_frame(frame(4));
        let published = ingestor.handle_frame(frame(4)).expect("equal cardinality");
        assert_relative_eq!(published, Matrix4::identity(), epsilon = 1e-9);
    }
}
