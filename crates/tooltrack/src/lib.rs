//! Real-time rigid-pose tracking of a marker-tagged tool.
//!
//! An external optical capture source reports the 3D positions of markers
//! fixed to a physical tool, frame by frame. This crate fits the rigid
//! motion between consecutive frames ([`tooltrack_core::fit_matched_points`])
//! and keeps the most recent 4x4 transform in a [`SharedPoseChannel`] that
//! an independent consumer polls at its own cadence.
//!
//! ## Quickstart
//!
//! ```
//! use std::sync::mpsc;
//! use nalgebra::Point3;
//! use tooltrack::{FrameIngestor, SharedPoseChannel, run_ingest_loop};
//!
//! let channel = SharedPoseChannel::new();
//! let mut ingestor = FrameIngestor::new(channel.clone());
//!
//! let (tx, rx) = mpsc::channel();
//! tx.send(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)]).unwrap();
//! tx.send(vec![Point3::new(0.0, 0.0, 1.0), Point3::new(1.0, 0.0, 1.0)]).unwrap();
//! drop(tx);
//!
//! run_ingest_loop(rx, &mut ingestor);
//! let pose = channel.read_snapshot(); // latest incremental transform
//! assert!((pose[(2, 3)] - 1.0).abs() < 1e-9);
//! ```
//!
//! Published transforms are frame-to-frame increments, not absolute poses;
//! see [`FrameIngestor::handle_frame`].

mod channel;
mod ingest;
mod stream;

pub use tooltrack_core as core;
pub use tooltrack_core::{fit_matched_points, init_with_level, FitError, PointFit, ReducedQuat};

pub use channel::{ChannelError, SharedPoseChannel};
pub use ingest::FrameIngestor;
pub use stream::{run_ingest_loop, MarkerSource, StreamConfig};
