//! Fixed output-buffer layout.
//!
//! Every struct here is `#[repr(C)]` and `Pod`: the flat `&[f32]` the
//! executor returns is reinterpreted in place, field offsets are the block
//! offsets. All values are raw model outputs (log-stds, logits, unnormalized
//! mixture weights) until `decode_engine` calibrates them.

use bytemuck::{Pod, Zeroable};

/// Samples per trajectory / lane-line grid
pub const TRAJECTORY_SIZE: usize = 33;
/// Plan mixture size
pub const PLAN_HYP_N: usize = 5;
/// Lead mixture size
pub const LEAD_HYP_N: usize = 2;
/// Future time points per lead forecast
pub const LEAD_TRAJ_LEN: usize = 6;
/// Lead forecasts published per frame (0/2/4 s anchors)
pub const LEAD_SELECTION_N: usize = 3;
/// Desire categories (index 0 is "none")
pub const DESIRE_LEN: usize = 8;
/// Desire-prediction forecast buckets
pub const DESIRE_PRED_LEN: usize = 4;
/// Disengage forecast horizons
pub const DISENGAGE_LEN: usize = 5;
/// Latent feature width
pub const FEATURE_LEN: usize = 128;
/// Frames of recurrent history fed back into the model
pub const HISTORY_LEN: usize = 99;
/// Traffic convention one-hot width
pub const TRAFFIC_CONVENTION_LEN: usize = 2;

/// xyz triple
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct Xyz {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Lateral/vertical pair, used where the longitudinal axis is the grid itself
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct Yz {
    pub y: f32,
    pub z: f32,
}

/// One trajectory step of the ego plan
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct PlanElement {
    pub position: Xyz,
    pub velocity: Xyz,
    pub acceleration: Xyz,
    pub rotation: Xyz,
    pub rotation_rate: Xyz,
}

/// One plan hypothesis: per-step means and log-stds plus a selection weight
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct PlanPrediction {
    pub mean: [PlanElement; TRAJECTORY_SIZE],
    pub std: [PlanElement; TRAJECTORY_SIZE],
    pub weight: f32,
}

/// Plan mixture block
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct PlanMixture {
    pub hypotheses: [PlanPrediction; PLAN_HYP_N],
}

/// Lane-line geometry, one array per line, ordered left-to-right
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LaneLineSet {
    pub left_far: [Yz; TRAJECTORY_SIZE],
    pub left_near: [Yz; TRAJECTORY_SIZE],
    pub right_near: [Yz; TRAJECTORY_SIZE],
    pub right_far: [Yz; TRAJECTORY_SIZE],
}

/// Lane-line block: mean/log-std geometry plus existence logits
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LaneLines {
    pub mean: LaneLineSet,
    pub std: LaneLineSet,
    /// Existence logits, same left-to-right order as the geometry
    pub prob: [f32; 4],
}

/// Road-edge geometry
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RoadEdgeSet {
    pub left: [Yz; TRAJECTORY_SIZE],
    pub right: [Yz; TRAJECTORY_SIZE],
}

/// Road-edge block
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RoadEdges {
    pub mean: RoadEdgeSet,
    pub std: RoadEdgeSet,
}

/// One future time point of a lead forecast
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LeadElement {
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
    pub acceleration: f32,
}

/// One lead hypothesis with a selection weight per time anchor
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LeadPrediction {
    pub mean: [LeadElement; LEAD_TRAJ_LEN],
    pub std: [LeadElement; LEAD_TRAJ_LEN],
    pub weight: [f32; LEAD_SELECTION_N],
}

/// Lead mixture block with group-level existence logits per time anchor
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LeadMixture {
    pub hypotheses: [LeadPrediction; LEAD_HYP_N],
    pub prob: [f32; LEAD_SELECTION_N],
}

/// Per-horizon disengage-cause logits
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct DisengageLogits {
    pub gas_disengage: f32,
    pub brake_disengage: f32,
    pub steer_override: f32,
    pub brake_3ms2: f32,
    pub brake_4ms2: f32,
    pub brake_5ms2: f32,
}

/// Meta block: desire, engagement and disengage logits
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct MetaLogits {
    pub desire_state: [f32; DESIRE_LEN],
    pub engaged: f32,
    pub desire_pred: [[f32; DESIRE_LEN]; DESIRE_PRED_LEN],
    pub disengage: [DisengageLogits; DISENGAGE_LEN],
}

/// Pose block: velocity/rotation means and log-stds
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct PoseBlock {
    pub velocity_mean: Xyz,
    pub rotation_mean: Xyz,
    pub velocity_std: Xyz,
    pub rotation_std: Xyz,
}

/// Euler-angle block with log-std
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct EulerBlock {
    pub mean: Xyz,
    pub std: Xyz,
}

/// Road-frame transform block
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RoadTransform {
    pub position_mean: Xyz,
    pub position_std: Xyz,
}

/// The complete output buffer, in emission order.
///
/// The trailing `features` slice is not part of the published prediction; it
/// is the latent state the recurrent history feeds back into the next
/// inference call.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RawModelOutput {
    pub plans: PlanMixture,
    pub lane_lines: LaneLines,
    pub road_edges: RoadEdges,
    pub leads: LeadMixture,
    pub meta: MetaLogits,
    pub pose: PoseBlock,
    pub wide_from_device: EulerBlock,
    pub temporal_pose: PoseBlock,
    pub road_transform: RoadTransform,
    pub features: [f32; FEATURE_LEN],
}

/// Total floats in one output buffer
pub const OUTPUT_FLOATS: usize = std::mem::size_of::<RawModelOutput>() / std::mem::size_of::<f32>();

/// Floats in the published prediction part (everything before `features`)
pub const PREDICTION_FLOATS: usize = OUTPUT_FLOATS - FEATURE_LEN;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_sizes() {
        assert_eq!(std::mem::size_of::<PlanElement>(), 15 * 4);
        assert_eq!(std::mem::size_of::<PlanPrediction>(), (33 * 15 * 2 + 1) * 4);
        assert_eq!(std::mem::size_of::<LaneLines>(), (4 * 33 * 2 * 2 + 4) * 4);
        assert_eq!(std::mem::size_of::<RoadEdges>(), (2 * 33 * 2 * 2) * 4);
        assert_eq!(
            std::mem::size_of::<LeadMixture>(),
            (2 * (6 * 4 * 2 + 3) + 3) * 4
        );
        assert_eq!(std::mem::size_of::<MetaLogits>(), (8 + 1 + 32 + 30) * 4);
    }

    #[test]
    fn test_total_size() {
        // 4955 plan + 532 lanes + 264 edges + 105 leads + 71 meta
        // + 12 pose + 6 wide + 12 temporal + 6 road transform + 128 features
        assert_eq!(OUTPUT_FLOATS, 6091);
        assert_eq!(PREDICTION_FLOATS, 5963);
    }

    #[test]
    fn test_no_padding() {
        // Pod reinterpretation relies on the struct being exactly the sum of
        // its f32 fields.
        assert_eq!(std::mem::align_of::<RawModelOutput>(), 4);
    }
}
