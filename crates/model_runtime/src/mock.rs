//! MockExecutor - synthesized output buffers, no model required.
//!
//! Produces a coherent driving scene: a smooth constant-speed plan, lane
//! lines at typical lateral offsets, one plausible lead, quiet meta logits.
//! Deterministic for a given seed.

use bytemuck::Zeroable;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use contracts::{ModelExecutor, ModelInputs, PipelineError};
use tensor_view::{t_idxs, RawModelOutput, OUTPUT_FLOATS};

/// Synthesized-output executor
#[derive(Debug)]
pub struct MockExecutor {
    rng: StdRng,
    frame: u64,
}

impl MockExecutor {
    /// Create a mock executor with a deterministic seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            frame: 0,
        }
    }

    fn noise(&mut self, scale: f32) -> f32 {
        self.rng.random_range(-scale..scale)
    }

    fn synthesize(&mut self) -> Vec<f32> {
        let mut raw = RawModelOutput::zeroed();

        let speed = 12.0 + self.noise(0.5);
        let grid = t_idxs();

        // Dominant hypothesis: straight constant-speed plan with tight
        // log-stds. The remaining hypotheses stay at weight 0.
        raw.plans.hypotheses[0].weight = 5.0;
        for (i, step) in raw.plans.hypotheses[0].mean.iter_mut().enumerate() {
            step.position.x = speed * grid[i];
            step.position.y = self.noise(0.05);
            step.velocity.x = speed;
        }
        for step in raw.plans.hypotheses[0].std.iter_mut() {
            step.position.x = -2.0;
            step.position.y = -2.0;
            step.position.z = -2.0;
        }

        let lane_offsets = [-5.2f32, -1.75, 1.75, 5.2];
        let lanes = &mut raw.lane_lines;
        for (line, offset) in [
            &mut lanes.mean.left_far,
            &mut lanes.mean.left_near,
            &mut lanes.mean.right_near,
            &mut lanes.mean.right_far,
        ]
        .into_iter()
        .zip(lane_offsets)
        {
            for point in line.iter_mut() {
                point.y = offset;
            }
        }
        raw.lane_lines.prob = [2.0; 4]; // sigmoid ≈ 0.88

        for point in raw.road_edges.mean.left.iter_mut() {
            point.y = -6.5;
        }
        for point in raw.road_edges.mean.right.iter_mut() {
            point.y = 6.5;
        }

        // One lead 40 m ahead, slightly slower than ego.
        raw.leads.hypotheses[0].weight = [3.0; 3];
        raw.leads.prob = [1.0; 3];
        for (i, step) in raw.leads.hypotheses[0].mean.iter_mut().enumerate() {
            step.x = 40.0 + (speed - 2.0) * 2.0 * i as f32;
            step.velocity = speed - 2.0;
        }

        // Quiet scene: strongly negative disengage logits.
        for horizon in raw.meta.disengage.iter_mut() {
            horizon.gas_disengage = -6.0;
            horizon.brake_disengage = -6.0;
            horizon.steer_override = -6.0;
            horizon.brake_3ms2 = -6.0;
            horizon.brake_4ms2 = -6.0;
            horizon.brake_5ms2 = -6.0;
        }
        raw.meta.engaged = 4.0;

        raw.pose.velocity_mean.x = speed;
        raw.pose.velocity_std = tensor_view::Xyz {
            x: -2.0,
            y: -2.0,
            z: -2.0,
        };
        raw.temporal_pose.velocity_mean.x = speed;

        for feature in raw.features.iter_mut() {
            *feature = self.noise(1.0);
        }

        bytemuck::cast_slice(bytemuck::bytes_of(&raw)).to_vec()
    }
}

impl ModelExecutor for MockExecutor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn execute(&mut self, _inputs: &ModelInputs) -> Result<Vec<f32>, PipelineError> {
        self.frame += 1;
        let buf = self.synthesize();
        debug!(frame = self.frame, floats = buf.len(), "mock inference");
        Ok(buf)
    }
}
