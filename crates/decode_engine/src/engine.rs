//! Main decode engine implementation.

use contracts::{
    CameraOdometryFrame, ConfidenceClass, DecodedFrame, DecoderConfig, DisengagePredictions,
    DrivingModelFrame, FrameContext, LeadForecast, MetaData, ModelInputs, PipelineError, PoseData,
    XyztData,
};
use tracing::{debug, instrument};

use tensor_view::{
    t_idxs, view_raw_output, x_idxs, LaneLines, LeadMixture, MetaLogits, PlanPrediction,
    PoseBlock, RawModelOutput, RoadEdges, Xyz, Yz, DESIRE_LEN, DESIRE_PRED_LEN, DISENGAGE_LEN,
    DISENGAGE_T, LEAD_T_IDXS, LEAD_T_OFFSETS, TRAJECTORY_SIZE,
};

use crate::confidence::{independent_from_cumulative, ConfidenceTracker};
use crate::history::RecurrentHistory;
use crate::{align, calibrate::*, select};

/// Per-camera decode pipeline state.
///
/// Owns the recurrent history and the confidence state; both are mutated
/// exactly once per frame by [`DecodeEngine::prepare_inputs`] /
/// [`DecodeEngine::decode`]. Callers must deliver frames strictly in arrival
/// order — the sliding-window and cadence logic has no detection for
/// out-of-order or duplicated frames.
pub struct DecodeEngine {
    /// Configuration
    config: DecoderConfig,
    /// Recurrent model-input history
    history: RecurrentHistory,
    /// Rolling confidence state
    confidence: ConfidenceTracker,
    /// Frames decoded since construction
    frames_decoded: u64,
}

impl std::fmt::Debug for DecodeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeEngine")
            .field("frames_decoded", &self.frames_decoded)
            .field("history", &self.history)
            .field("confidence", &self.confidence)
            .finish()
    }
}

impl DecodeEngine {
    /// Create a new engine with zeroed state
    pub fn new(config: DecoderConfig) -> Self {
        let confidence =
            ConfidenceTracker::new(config.hazard.clone(), config.confidence.clone());
        Self {
            config,
            history: RecurrentHistory::new(),
            confidence,
            frames_decoded: 0,
        }
    }

    /// Update the desire/traffic side-channels and snapshot the recurrent
    /// inputs for this frame's inference call.
    ///
    /// Must be called exactly once per frame, before [`DecodeEngine::decode`].
    pub fn prepare_inputs(&mut self, desire: &[f32; DESIRE_LEN], is_rhd: bool) -> ModelInputs {
        self.history.encode_desire_pulse(desire);
        self.history.set_traffic_convention(is_rhd);
        self.history.snapshot_inputs()
    }

    /// Decode one raw output buffer into the published records and fold its
    /// feature slice back into the recurrent history.
    ///
    /// # Errors
    /// Fails only on a wrong-shape buffer, which is an executor contract
    /// violation.
    #[instrument(
        name = "decode_frame",
        skip(self, buf),
        fields(frame_id = ctx.frame_id)
    )]
    pub fn decode(&mut self, ctx: FrameContext, buf: &[f32]) -> Result<DecodedFrame, PipelineError> {
        let raw = view_raw_output(buf)?;

        self.history.push_features(&raw.features);

        let model = self.fill_model(ctx, raw, buf);
        let odometry = fill_odometry(ctx, raw);

        self.frames_decoded += 1;
        metrics::counter!("decode_frames_total").increment(1);
        metrics::histogram!("decode_execution_time_s").record(ctx.model_execution_time as f64);

        Ok(DecodedFrame { model, odometry })
    }

    /// Frames decoded since construction
    pub fn frame_count(&self) -> u64 {
        self.frames_decoded
    }

    fn fill_model(
        &mut self,
        ctx: FrameContext,
        raw: &RawModelOutput,
        buf: &[f32],
    ) -> DrivingModelFrame {
        let (plan_idx, plan) = select::best_plan(&raw.plans);
        let plan_t = align::plan_times(plan);

        let mut frame = DrivingModelFrame {
            frame_id: ctx.frame_id,
            frame_id_extra: ctx.frame_id_extra,
            frame_age: (self.frames_decoded as u32).saturating_sub(ctx.frame_id),
            frame_drop_perc: ctx.frame_drop * 100.0,
            timestamp_eof: ctx.timestamp_eof,
            model_execution_time: ctx.model_execution_time,
            valid: ctx.valid,
            ..Default::default()
        };

        fill_plan(&mut frame, plan);
        fill_lane_lines(&mut frame, &plan_t, &raw.lane_lines);
        fill_road_edges(&mut frame, &plan_t, &raw.road_edges);

        frame.meta = self.fill_meta(&raw.meta);
        frame.confidence =
            self.update_confidence(ctx.frame_id, &frame.meta.disengage_predictions);

        frame.leads = LEAD_T_OFFSETS
            .iter()
            .enumerate()
            .map(|(t_idx, &prob_t)| fill_lead(&raw.leads, t_idx, prob_t))
            .collect();

        frame.temporal_pose = pose_data(&raw.temporal_pose);

        if self.config.send_raw_predictions {
            frame.raw_predictions = buf.iter().flat_map(|v| v.to_le_bytes()).collect();
        }

        debug!(
            plan_hypothesis = plan_idx,
            confidence = ?frame.confidence,
            hard_brake = frame.meta.hard_brake_predicted,
            "frame decoded"
        );
        frame
    }

    fn fill_meta(&mut self, meta: &MetaLogits) -> MetaData {
        let desire_state = softmax(&meta.desire_state).to_vec();

        // One independent softmax per forecast bucket, flattened bucket-major.
        let mut desire_prediction = Vec::with_capacity(DESIRE_PRED_LEN * DESIRE_LEN);
        for bucket in &meta.desire_pred {
            desire_prediction.extend_from_slice(&softmax(bucket));
        }

        let mut disengage = DisengagePredictions {
            t: DISENGAGE_T.to_vec(),
            ..Default::default()
        };
        for horizon in &meta.disengage {
            disengage
                .gas_disengage_probs
                .push(sigmoid(horizon.gas_disengage));
            disengage
                .brake_disengage_probs
                .push(sigmoid(horizon.brake_disengage));
            disengage
                .steer_override_probs
                .push(sigmoid(horizon.steer_override));
            disengage.brake_3ms2_probs.push(sigmoid(horizon.brake_3ms2));
            disengage.brake_4ms2_probs.push(sigmoid(horizon.brake_4ms2));
            disengage.brake_5ms2_probs.push(sigmoid(horizon.brake_5ms2));
        }

        let hard_brake_predicted = self
            .confidence
            .push_hazard(disengage.brake_5ms2_probs[0], disengage.brake_3ms2_probs[0]);
        if hard_brake_predicted {
            metrics::counter!("decode_hard_brake_flags_total").increment(1);
        }

        MetaData {
            engaged_prob: sigmoid(meta.engaged),
            desire_state,
            desire_prediction,
            disengage_predictions: disengage,
            hard_brake_predicted,
        }
    }

    fn update_confidence(
        &mut self,
        frame_id: u32,
        disengage: &DisengagePredictions,
    ) -> ConfidenceClass {
        if frame_id % self.config.confidence.cadence_frames == 0 {
            // One row per forecast-slice width of elapsed time, so row age
            // lines up with the horizon columns.
            let mut cumulative = [0.0f32; DISENGAGE_LEN];
            for (i, slot) in cumulative.iter_mut().enumerate() {
                *slot = 1.0
                    - (1.0 - disengage.brake_disengage_probs[i])
                        * (1.0 - disengage.gas_disengage_probs[i])
                        * (1.0 - disengage.steer_override_probs[i]);
            }
            self.confidence
                .push_row(independent_from_cumulative(&cumulative));
        }

        let score = self.confidence.consensus_score();
        metrics::histogram!("decode_consensus_score").record(score as f64);

        let class = self.confidence.classify(score);
        metrics::counter!("decode_confidence_class_total", "class" => class_label(class))
            .increment(1);
        class
    }
}

fn class_label(class: ConfidenceClass) -> &'static str {
    match class {
        ConfidenceClass::Green => "green",
        ConfidenceClass::Yellow => "yellow",
        ConfidenceClass::Red => "red",
    }
}

fn fill_plan(frame: &mut DrivingModelFrame, plan: &PlanPrediction) {
    let t = t_idxs().to_vec();
    let mut position = XyztData {
        t: t.clone(),
        ..Default::default()
    };
    let mut velocity = XyztData {
        t: t.clone(),
        ..Default::default()
    };
    let mut acceleration = XyztData {
        t: t.clone(),
        ..Default::default()
    };
    let mut orientation = XyztData {
        t: t.clone(),
        ..Default::default()
    };
    let mut orientation_rate = XyztData {
        t,
        ..Default::default()
    };

    for (mean, std) in plan.mean.iter().zip(plan.std.iter()) {
        position.x.push(mean.position.x);
        position.y.push(mean.position.y);
        position.z.push(mean.position.z);
        position.x_std.push(std_from_log(std.position.x));
        position.y_std.push(std_from_log(std.position.y));
        position.z_std.push(std_from_log(std.position.z));

        velocity.x.push(mean.velocity.x);
        velocity.y.push(mean.velocity.y);
        velocity.z.push(mean.velocity.z);

        acceleration.x.push(mean.acceleration.x);
        acceleration.y.push(mean.acceleration.y);
        acceleration.z.push(mean.acceleration.z);

        orientation.x.push(mean.rotation.x);
        orientation.y.push(mean.rotation.y);
        orientation.z.push(mean.rotation.z);

        orientation_rate.x.push(mean.rotation_rate.x);
        orientation_rate.y.push(mean.rotation_rate.y);
        orientation_rate.z.push(mean.rotation_rate.z);
    }

    frame.position = position;
    frame.velocity = velocity;
    frame.acceleration = acceleration;
    frame.orientation = orientation;
    frame.orientation_rate = orientation_rate;
}

/// Geometry series on the distance grid, indexed by the plan's time axis
fn yz_series(plan_t: &[f32; TRAJECTORY_SIZE], x: &[f32], line: &[Yz; TRAJECTORY_SIZE]) -> XyztData {
    XyztData {
        t: plan_t.to_vec(),
        x: x.to_vec(),
        y: line.iter().map(|p| p.y).collect(),
        z: line.iter().map(|p| p.z).collect(),
        ..Default::default()
    }
}

fn fill_lane_lines(
    frame: &mut DrivingModelFrame,
    plan_t: &[f32; TRAJECTORY_SIZE],
    lanes: &LaneLines,
) {
    let x = x_idxs();

    let mean = [
        &lanes.mean.left_far,
        &lanes.mean.left_near,
        &lanes.mean.right_near,
        &lanes.mean.right_far,
    ];
    frame.lane_lines = mean
        .iter()
        .map(|line| yz_series(plan_t, &x, line))
        .collect();

    let std = [
        &lanes.std.left_far,
        &lanes.std.left_near,
        &lanes.std.right_near,
        &lanes.std.right_far,
    ];
    frame.lane_line_stds = std.iter().map(|line| std_from_log(line[0].y)).collect();

    frame.lane_line_probs = lanes.prob.iter().map(|&logit| sigmoid(logit)).collect();
}

fn fill_road_edges(
    frame: &mut DrivingModelFrame,
    plan_t: &[f32; TRAJECTORY_SIZE],
    edges: &RoadEdges,
) {
    let x = x_idxs();
    frame.road_edges = [&edges.mean.left, &edges.mean.right]
        .iter()
        .map(|edge| yz_series(plan_t, &x, edge))
        .collect();
    frame.road_edge_stds = [&edges.std.left, &edges.std.right]
        .iter()
        .map(|edge| std_from_log(edge[0].y))
        .collect();
}

fn fill_lead(leads: &LeadMixture, t_idx: usize, prob_t: f32) -> LeadForecast {
    let best = select::best_lead(leads, t_idx);

    let mut lead = LeadForecast {
        prob: sigmoid(leads.prob[t_idx]),
        prob_time: prob_t,
        t: LEAD_T_IDXS.to_vec(),
        ..Default::default()
    };
    for (mean, std) in best.mean.iter().zip(best.std.iter()) {
        lead.x.push(mean.x);
        lead.y.push(mean.y);
        lead.v.push(mean.velocity);
        lead.a.push(mean.acceleration);
        lead.x_std.push(std_from_log(std.x));
        lead.y_std.push(std_from_log(std.y));
        lead.v_std.push(std_from_log(std.velocity));
        lead.a_std.push(std_from_log(std.acceleration));
    }
    lead
}

fn xyz_array(v: &Xyz) -> [f32; 3] {
    [v.x, v.y, v.z]
}

fn xyz_std_array(v: &Xyz) -> [f32; 3] {
    [std_from_log(v.x), std_from_log(v.y), std_from_log(v.z)]
}

fn pose_data(pose: &PoseBlock) -> PoseData {
    PoseData {
        trans: xyz_array(&pose.velocity_mean),
        rot: xyz_array(&pose.rotation_mean),
        trans_std: xyz_std_array(&pose.velocity_std),
        rot_std: xyz_std_array(&pose.rotation_std),
    }
}

fn fill_odometry(ctx: FrameContext, raw: &RawModelOutput) -> CameraOdometryFrame {
    CameraOdometryFrame {
        frame_id: ctx.frame_id,
        timestamp_eof: ctx.timestamp_eof,
        valid: ctx.valid && ctx.dropped_frames < 1,
        trans: xyz_array(&raw.pose.velocity_mean),
        rot: xyz_array(&raw.pose.rotation_mean),
        wide_from_device_euler: xyz_array(&raw.wide_from_device.mean),
        road_transform_trans: xyz_array(&raw.road_transform.position_mean),
        trans_std: xyz_std_array(&raw.pose.velocity_std),
        rot_std: xyz_std_array(&raw.pose.rotation_std),
        wide_from_device_euler_std: xyz_std_array(&raw.wide_from_device.std),
        road_transform_trans_std: xyz_std_array(&raw.road_transform.position_std),
    }
}
