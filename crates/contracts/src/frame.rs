//! DecodedFrame - Decode Engine output
//!
//! Structured, calibrated prediction record built from one raw model output.

use serde::{Deserialize, Serialize};

/// Parallel time-indexed sequences for one trajectory quantity.
///
/// `t` pairs element-wise with `x`/`y`/`z`; the `*_std` vectors are empty for
/// quantities the model does not emit uncertainty for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XyztData {
    /// Forecast time of each sample (seconds)
    pub t: Vec<f32>,

    /// Longitudinal component (meters, or the per-quantity unit)
    pub x: Vec<f32>,

    /// Lateral component
    pub y: Vec<f32>,

    /// Vertical component
    pub z: Vec<f32>,

    /// Standard deviation of `x` (empty if not emitted)
    #[serde(default)]
    pub x_std: Vec<f32>,

    /// Standard deviation of `y` (empty if not emitted)
    #[serde(default)]
    pub y_std: Vec<f32>,

    /// Standard deviation of `z` (empty if not emitted)
    #[serde(default)]
    pub z_std: Vec<f32>,
}

/// One lead-vehicle forecast at a fixed time offset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadForecast {
    /// Calibrated existence probability
    pub prob: f32,

    /// Time offset this forecast is anchored to (0/2/4 seconds)
    pub prob_time: f32,

    /// Forecast sample times (seconds)
    pub t: Vec<f32>,

    /// Longitudinal distance (meters)
    pub x: Vec<f32>,

    /// Lateral offset (meters)
    pub y: Vec<f32>,

    /// Speed (m/s)
    pub v: Vec<f32>,

    /// Acceleration (m/s²)
    pub a: Vec<f32>,

    /// Per-sample standard deviations
    pub x_std: Vec<f32>,
    pub y_std: Vec<f32>,
    pub v_std: Vec<f32>,
    pub a_std: Vec<f32>,
}

/// Per-horizon disengagement forecast block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisengagePredictions {
    /// Forecast horizons (seconds)
    pub t: Vec<f32>,

    /// P(brake disengage by horizon)
    pub brake_disengage_probs: Vec<f32>,

    /// P(gas disengage by horizon)
    pub gas_disengage_probs: Vec<f32>,

    /// P(steering override by horizon)
    pub steer_override_probs: Vec<f32>,

    /// P(braking harder than 3 m/s² by horizon)
    pub brake_3ms2_probs: Vec<f32>,

    /// P(braking harder than 4 m/s² by horizon)
    pub brake_4ms2_probs: Vec<f32>,

    /// P(braking harder than 5 m/s² by horizon)
    pub brake_5ms2_probs: Vec<f32>,
}

/// Meta block: engagement, desire, disengagement, hazard flag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetaData {
    /// Calibrated probability the system is engaged
    pub engaged_prob: f32,

    /// Current desire-state distribution (softmax over 8 categories)
    pub desire_state: Vec<f32>,

    /// Predicted desire distributions, one per forecast bucket, flattened
    /// bucket-major (each bucket sums to 1 independently)
    pub desire_prediction: Vec<f32>,

    /// Disengagement forecast block
    pub disengage_predictions: DisengagePredictions,

    /// Debounced hazard flag: sustained high probability of hard braking
    pub hard_brake_predicted: bool,
}

/// Three-band confidence classification of the rolling disengage consensus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceClass {
    /// Low predicted disengage risk
    #[default]
    Green,
    /// Elevated risk
    Yellow,
    /// High risk
    Red,
}

/// Pose estimate: translation + rotation with uncertainties
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PoseData {
    /// Translation velocity (m/s, device frame)
    pub trans: [f32; 3],

    /// Rotation rate (rad/s, device frame)
    pub rot: [f32; 3],

    /// Translation standard deviation
    pub trans_std: [f32; 3],

    /// Rotation standard deviation
    pub rot_std: [f32; 3],
}

/// Main decoded prediction record, published once per frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrivingModelFrame {
    /// Camera frame counter this decode corresponds to
    pub frame_id: u32,

    /// Wide-camera frame counter
    pub frame_id_extra: u32,

    /// Frames of processing lag behind the camera (0 when keeping up)
    pub frame_age: u32,

    /// Dropped-frame percentage reported by the upstream feed
    pub frame_drop_perc: f32,

    /// Sensor end-of-frame timestamp (nanoseconds)
    pub timestamp_eof: u64,

    /// Model execution wall time (seconds)
    pub model_execution_time: f32,

    /// Upstream validity flag, carried through
    pub valid: bool,

    /// Ego position over the forecast grid, with uncertainty
    pub position: XyztData,

    /// Ego velocity
    pub velocity: XyztData,

    /// Ego acceleration
    pub acceleration: XyztData,

    /// Ego orientation (euler)
    pub orientation: XyztData,

    /// Ego orientation rate
    pub orientation_rate: XyztData,

    /// Lane lines: far-left, near-left, near-right, far-right
    pub lane_lines: Vec<XyztData>,

    /// Calibrated existence probability per lane line
    pub lane_line_probs: Vec<f32>,

    /// Near-field lateral standard deviation per lane line
    pub lane_line_stds: Vec<f32>,

    /// Road edges: left, right
    pub road_edges: Vec<XyztData>,

    /// Near-field lateral standard deviation per road edge
    pub road_edge_stds: Vec<f32>,

    /// Lead forecasts at 0/2/4 second offsets
    pub leads: Vec<LeadForecast>,

    /// Meta block
    pub meta: MetaData,

    /// Rolling confidence classification
    pub confidence: ConfidenceClass,

    /// Temporally-smoothed pose estimate
    pub temporal_pose: PoseData,

    /// Optional verbatim copy of the raw output buffer (little-endian f32
    /// bytes), for offline debugging; gated by config
    #[serde(with = "serde_bytes", default)]
    pub raw_predictions: Vec<u8>,
}

/// Camera odometry record, published alongside the model frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraOdometryFrame {
    /// Camera frame counter
    pub frame_id: u32,

    /// Sensor end-of-frame timestamp (nanoseconds)
    pub timestamp_eof: u64,

    /// Valid only when no frames were dropped this cycle
    pub valid: bool,

    /// Device-frame translation velocity (m/s)
    pub trans: [f32; 3],

    /// Device-frame rotation rate (rad/s)
    pub rot: [f32; 3],

    /// Euler angles of the wide camera relative to the device
    pub wide_from_device_euler: [f32; 3],

    /// Road-frame transform translation
    pub road_transform_trans: [f32; 3],

    /// Standard deviations of the above
    pub trans_std: [f32; 3],
    pub rot_std: [f32; 3],
    pub wide_from_device_euler_std: [f32; 3],
    pub road_transform_trans_std: [f32; 3],
}

/// One frame's complete decode output: model record + odometry record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecodedFrame {
    /// Structured prediction record
    pub model: DrivingModelFrame,

    /// Pose/odometry record
    pub odometry: CameraOdometryFrame,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoded_frame_json_round_trip() {
        let mut frame = DecodedFrame::default();
        frame.model.frame_id = 7;
        frame.model.confidence = ConfidenceClass::Yellow;
        frame.model.raw_predictions = vec![1, 2, 3, 4];

        let json = serde_json::to_string(&frame).unwrap();
        let back: DecodedFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(back.model.frame_id, 7);
        assert_eq!(back.model.confidence, ConfidenceClass::Yellow);
        assert_eq!(back.model.raw_predictions, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_confidence_class_serde_names() {
        let json = serde_json::to_string(&ConfidenceClass::Red).unwrap();
        assert_eq!(json, "\"red\"");
    }
}
