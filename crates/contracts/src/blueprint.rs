//! PipelineBlueprint - Config Loader output
//!
//! Describes a complete decode-pipeline deployment: decoder tunables,
//! executor selection, and output routing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use validator::Validate;

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete pipeline configuration blueprint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PipelineBlueprint {
    /// Config version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Decoder tunables
    #[serde(default)]
    #[validate(nested)]
    pub decoder: DecoderConfig,

    /// Model executor selection
    #[serde(default)]
    pub executor: ExecutorConfig,

    /// Output routing
    pub sinks: Vec<SinkConfig>,
}

/// Decoder tunables
///
/// Structural constants (grid sizes, hypothesis counts, horizon sets) are
/// compile-time and live in `tensor_view`; everything here is a deployment
/// parameter.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DecoderConfig {
    /// Model frame rate (Hz)
    #[validate(range(min = 1))]
    pub frequency_hz: u32,

    /// Hazard debounce tunables (fast path)
    #[validate(nested)]
    #[serde(default)]
    pub hazard: HazardConfig,

    /// Confidence classification tunables (slow path)
    #[validate(nested)]
    #[serde(default)]
    pub confidence: ConfidenceConfig,

    /// Attach the raw output buffer bytes to each published frame
    #[serde(default)]
    pub send_raw_predictions: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 20,
            hazard: HazardConfig::default(),
            confidence: ConfidenceConfig::default(),
            send_raw_predictions: false,
        }
    }
}

/// Hazard debounce configuration
///
/// The flag fires only when every slot of both rolling windows clears its
/// threshold. The severe window applies `severe_relaxed` to its older slots
/// and `severe_strict` to its two newest.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HazardConfig {
    /// Severe-braking window length (frames)
    #[validate(range(min = 2))]
    pub severe_window: usize,

    /// Medium-braking window length (frames)
    #[validate(range(min = 1))]
    pub medium_window: usize,

    /// Threshold for the older slots of the severe window
    #[validate(range(min = 0.0, max = 1.0))]
    pub severe_relaxed: f32,

    /// Threshold for the two newest slots of the severe window
    #[validate(range(min = 0.0, max = 1.0))]
    pub severe_strict: f32,

    /// Threshold for every slot of the medium window
    #[validate(range(min = 0.0, max = 1.0))]
    pub medium: f32,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            severe_window: 5,
            medium_window: 3,
            severe_relaxed: 0.05,
            severe_strict: 0.15,
            medium: 0.7,
        }
    }
}

/// Confidence classification configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConfidenceConfig {
    /// Frames between disengage-matrix row updates (2 seconds at model rate)
    #[validate(range(min = 1))]
    pub cadence_frames: u32,

    /// Consensus score below this is classified green
    #[validate(range(min = 0.0, max = 1.0))]
    pub score_green: f32,

    /// Consensus score below this (and above green) is classified yellow
    #[validate(range(min = 0.0, max = 1.0))]
    pub score_yellow: f32,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            cadence_frames: 40,
            score_green: 0.01165,
            score_yellow: 0.06157,
        }
    }
}

/// Model executor selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Backend mode
    #[serde(default)]
    pub mode: ExecutorMode,

    /// Recorded output buffers for replay mode
    #[serde(default)]
    pub replay_path: Option<PathBuf>,

    /// Deterministic seed for mock mode
    #[serde(default)]
    pub seed: u64,
}

/// Executor backend kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorMode {
    /// Synthesized outputs, no model required
    #[default]
    Mock,
    /// Play back recorded output buffers
    Replay,
}

/// Sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Unique sink name
    pub name: String,

    /// Sink kind
    pub sink_type: SinkType,

    /// Worker queue capacity
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Sink-specific parameters (e.g. `base_path`)
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_queue_capacity() -> usize {
    100
}

/// Sink kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// Log frame summaries via tracing
    Log,
    /// Append frames as JSON lines
    Jsonl,
    /// Append frames as length-prefixed bincode records
    Bincode,
}
