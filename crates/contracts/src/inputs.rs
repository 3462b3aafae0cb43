//! ModelInputs - recurrent context handed to the executor
//!
//! The image tensors themselves are prepared upstream and are opaque to this
//! pipeline; only the recurrent side-channel inputs are owned here.

use serde::{Deserialize, Serialize};

/// Recurrent side-channel inputs for one inference call.
///
/// Layouts are row-major, oldest history entry first, matching the order the
/// model was trained with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInputs {
    /// Desire pulse history including the current frame,
    /// `(history_len + 1) * desire_len` floats
    pub desire_pulse: Vec<f32>,

    /// One-hot traffic convention: `[1, 0]` left-hand drive, `[0, 1]` right
    pub traffic_convention: [f32; 2],

    /// Latent feature history, `history_len * feature_len` floats
    pub feature_buffer: Vec<f32>,
}

/// Per-frame bookkeeping passed into decode, produced by the camera feed
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameContext {
    /// Camera frame counter (primary clock)
    pub frame_id: u32,

    /// Wide-camera frame counter
    pub frame_id_extra: u32,

    /// Sensor end-of-frame timestamp (nanoseconds)
    pub timestamp_eof: u64,

    /// Fraction of recent frames dropped upstream, 0.0-1.0
    pub frame_drop: f32,

    /// Number of frames dropped immediately before this one
    pub dropped_frames: u32,

    /// Upstream validity flag
    pub valid: bool,

    /// Wall time the executor spent on this frame (seconds)
    pub model_execution_time: f32,
}
