//! Recurrent input history.
//!
//! The model is stateless per frame; its short-term memory is these rolling
//! buffers, refilled from its own previous outputs and from the desire
//! side-channel. Rings are fixed-capacity and pre-filled with zeros so the
//! flattened input views always have their full trained-with length.

use contracts::ModelInputs;
use ringbuf::{traits::*, HeapRb};
use tensor_view::{DESIRE_LEN, FEATURE_LEN, HISTORY_LEN, TRAFFIC_CONVENTION_LEN};

/// Rolling recurrent state for one camera pipeline
pub struct RecurrentHistory {
    /// Latent feature slices of the most recent outputs, oldest first
    features: HeapRb<[f32; FEATURE_LEN]>,
    /// Desire pulse rows, history plus current frame, oldest first
    desire_pulse: HeapRb<[f32; DESIRE_LEN]>,
    /// Raw desire vector seen last frame, for edge detection
    prev_desire: [f32; DESIRE_LEN],
    /// One-hot left/right-hand drive encoding
    traffic_convention: [f32; TRAFFIC_CONVENTION_LEN],
}

impl std::fmt::Debug for RecurrentHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecurrentHistory")
            .field("feature_rows", &self.features.occupied_len())
            .field("pulse_rows", &self.desire_pulse.occupied_len())
            .field("traffic_convention", &self.traffic_convention)
            .finish()
    }
}

impl RecurrentHistory {
    /// Create zero-filled history (pipeline start)
    pub fn new() -> Self {
        let mut features = HeapRb::new(HISTORY_LEN);
        while features.try_push([0.0; FEATURE_LEN]).is_ok() {}

        // history rows plus the current frame's row
        let mut desire_pulse = HeapRb::new(HISTORY_LEN + 1);
        while desire_pulse.try_push([0.0; DESIRE_LEN]).is_ok() {}

        Self {
            features,
            desire_pulse,
            prev_desire: [0.0; DESIRE_LEN],
            traffic_convention: [0.0; TRAFFIC_CONVENTION_LEN],
        }
    }

    /// Encode the desire input as a rising-edge pulse and enqueue it.
    ///
    /// The model decides when an action is completed, so the input is a
    /// one-frame trigger rather than a sustained level: category `i` pulses
    /// with `desire[i]` only when it jumps by more than 0.99 since the last
    /// frame. The "none" category (index 0) never pulses. `prev_desire` is
    /// updated regardless of pulse outcome.
    pub fn encode_desire_pulse(&mut self, desire: &[f32; DESIRE_LEN]) {
        let mut pulse = [0.0f32; DESIRE_LEN];
        for i in 1..DESIRE_LEN {
            if desire[i] - self.prev_desire[i] > 0.99 {
                pulse[i] = desire[i];
            }
            self.prev_desire[i] = desire[i];
        }
        self.desire_pulse.push_overwrite(pulse);
    }

    /// Set the traffic-convention one-hot directly (no windowing)
    pub fn set_traffic_convention(&mut self, is_rhd: bool) {
        let rhd_idx = usize::from(is_rhd);
        self.traffic_convention[rhd_idx] = 1.0;
        self.traffic_convention[1 - rhd_idx] = 0.0;
    }

    /// Append the newest output's feature slice, dropping the oldest
    pub fn push_features(&mut self, features: &[f32; FEATURE_LEN]) {
        self.features.push_overwrite(*features);
    }

    /// Flatten the rings into the input views for the next inference call,
    /// oldest entry first
    pub fn snapshot_inputs(&self) -> ModelInputs {
        let mut desire_pulse = Vec::with_capacity((HISTORY_LEN + 1) * DESIRE_LEN);
        for row in self.desire_pulse.iter() {
            desire_pulse.extend_from_slice(row);
        }

        let mut feature_buffer = Vec::with_capacity(HISTORY_LEN * FEATURE_LEN);
        for row in self.features.iter() {
            feature_buffer.extend_from_slice(row);
        }

        ModelInputs {
            desire_pulse,
            traffic_convention: self.traffic_convention,
            feature_buffer,
        }
    }

    /// Newest desire-pulse row (diagnostics and tests)
    pub fn latest_pulse(&self) -> [f32; DESIRE_LEN] {
        self.desire_pulse
            .iter()
            .last()
            .copied()
            .unwrap_or([0.0; DESIRE_LEN])
    }
}

impl Default for RecurrentHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_fires_once_on_rising_edge() {
        let mut history = RecurrentHistory::new();
        let mut desire = [0.0f32; DESIRE_LEN];
        desire[3] = 1.0;

        history.encode_desire_pulse(&desire);
        assert_eq!(history.latest_pulse()[3], 1.0);

        // Desire stays high: no re-trigger.
        history.encode_desire_pulse(&desire);
        assert_eq!(history.latest_pulse()[3], 0.0);
    }

    #[test]
    fn test_slow_ramp_never_pulses() {
        let mut history = RecurrentHistory::new();
        for step in 1..=10 {
            let mut desire = [0.0f32; DESIRE_LEN];
            desire[2] = step as f32 / 10.0;
            history.encode_desire_pulse(&desire);
            assert_eq!(history.latest_pulse()[2], 0.0);
        }
    }

    #[test]
    fn test_none_category_never_pulses() {
        let mut history = RecurrentHistory::new();
        let mut desire = [0.0f32; DESIRE_LEN];
        desire[0] = 1.0;
        history.encode_desire_pulse(&desire);
        assert_eq!(history.latest_pulse()[0], 0.0);
    }

    #[test]
    fn test_input_views_have_trained_lengths() {
        let history = RecurrentHistory::new();
        let inputs = history.snapshot_inputs();
        assert_eq!(inputs.desire_pulse.len(), (HISTORY_LEN + 1) * DESIRE_LEN);
        assert_eq!(inputs.feature_buffer.len(), HISTORY_LEN * FEATURE_LEN);
    }

    #[test]
    fn test_feature_ring_drops_oldest() {
        let mut history = RecurrentHistory::new();
        for value in 1..=(HISTORY_LEN + 2) {
            history.push_features(&[value as f32; FEATURE_LEN]);
        }
        let inputs = history.snapshot_inputs();
        // Oldest surviving row is value 3; newest is HISTORY_LEN + 2.
        assert_eq!(inputs.feature_buffer[0], 3.0);
        assert_eq!(
            inputs.feature_buffer[HISTORY_LEN * FEATURE_LEN - 1],
            (HISTORY_LEN + 2) as f32
        );
    }

    #[test]
    fn test_traffic_convention_one_hot() {
        let mut history = RecurrentHistory::new();
        history.set_traffic_convention(false);
        assert_eq!(history.snapshot_inputs().traffic_convention, [1.0, 0.0]);
        history.set_traffic_convention(true);
        assert_eq!(history.snapshot_inputs().traffic_convention, [0.0, 1.0]);
    }
}
