//! Shared buffer for the most recently published pose.

use std::sync::{Arc, Mutex, PoisonError};

use nalgebra::Matrix4;

/// Errors raised when attaching to a pose buffer.
#[derive(thiserror::Error, Debug)]
pub enum ChannelError {
    #[error("pose buffer must hold exactly 16 values, got {0}")]
    BadLength(usize),
}

/// Mutually-exclusive slot holding the latest published 4x4 transform as a
/// row-major 16-element buffer.
///
/// Cloning the channel produces another handle to the same buffer; the
/// intended topology is one writer and any number of polling readers.
/// Writers and readers each hold the lock only for a fixed-size copy, so a
/// reader always observes a complete write, never a mixture of two.
#[derive(Clone, Debug)]
pub struct SharedPoseChannel {
    slot: Arc<Mutex<[f64; 16]>>,
}

impl SharedPoseChannel {
    /// Create a channel initialized to the identity transform, so a read
    /// that precedes the first write is well-defined.
    pub fn new() -> Self {
        let mut slot = [0.0; 16];
        for i in 0..4 {
            slot[i * 4 + i] = 1.0;
        }
        Self {
            slot: Arc::new(Mutex::new(slot)),
        }
    }

    /// Create a channel from an existing row-major buffer.
    ///
    /// The handle must hold exactly 16 values; anything else is a fatal
    /// configuration error, rejected before any data flows.
    pub fn from_values(values: &[f64]) -> Result<Self, ChannelError> {
        let slot: [f64; 16] = values
            .try_into()
            .map_err(|_| ChannelError::BadLength(values.len()))?;
        Ok(Self {
            slot: Arc::new(Mutex::new(slot)),
        })
    }

    /// Overwrite the buffer with `t`, row-major.
    pub fn write(&self, t: &Matrix4<f64>) {
        let mut slot = self.lock();
        for i in 0..4 {
            for j in 0..4 {
                slot[i * 4 + j] = t[(i, j)];
            }
        }
    }

    /// Copy the buffer out and reshape it into a 4x4 transform.
    pub fn read_snapshot(&self) -> Matrix4<f64> {
        let copy = *self.lock();
        Matrix4::from_row_slice(&copy)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, [f64; 16]> {
        // The payload is a plain array and every write is a full overwrite
        // under the lock, so a poisoned mutex still holds a complete pose.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SharedPoseChannel {
    fn default() -> Self {
        Self::new()
    }
}
