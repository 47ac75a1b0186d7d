//! Ingestion loop: drain marker frames from a source, one at a time.

use std::sync::mpsc::Receiver;

use log::{debug, info};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::ingest::FrameIngestor;

/// Connection surface for the external capture source.
///
/// The protocol itself lives outside this crate; whatever adapter speaks it
/// only needs these values to establish the stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Address the capture server can be reached at.
    #[serde(default = "default_address")]
    pub address: String,
    /// Real-time protocol version to negotiate.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_address() -> String {
    "127.0.0.1".to_owned()
}

fn default_version() -> String {
    "1.8".to_owned()
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            version: default_version(),
        }
    }
}

/// Blocking supplier of marker frames.
///
/// `next_frame` suspends until a frame is available and returns `None` once
/// the source has disconnected. Implementations deliver one bounded list of
/// 3D marker positions per captured frame; an empty list is a valid frame
/// (no markers visible).
pub trait MarkerSource {
    fn next_frame(&mut self) -> Option<Vec<Point3<f64>>>;
}

impl MarkerSource for Receiver<Vec<Point3<f64>>> {
    fn next_frame(&mut self) -> Option<Vec<Point3<f64>>> {
        self.recv().ok()
    }
}

/// Drain `source` into `ingestor` until the source disconnects.
///
/// Frames are processed strictly sequentially: each one runs the fit and
/// publish synchronously to completion before the next receive. There is no
/// reconnection logic; when the source ends, the loop returns and the last
/// published pose stays available in the channel.
///
/// A protocol adapter typically opens its connection from a
/// [`StreamConfig`], forwards decoded marker frames into an
/// `mpsc::Sender`, and hands the receiver here as the [`MarkerSource`].
pub fn run_ingest_loop<S: MarkerSource>(mut source: S, ingestor: &mut FrameIngestor) {
    info!("ingest loop started");
    let mut published = 0u64;
    while let Some(frame) = source.next_frame() {
        debug!("frame received ({} markers)", frame.len());
        if ingestor.handle_frame(frame).is_some() {
            published += 1;
        }
    }
    info!("marker source disconnected after {published} published poses");
}
