//! Rolling disengage-confidence aggregation.
//!
//! Two independent mechanisms over fixed-size state:
//! - a per-frame hazard debounce over short windows of the nearest-horizon
//!   braking probabilities
//! - a slow consensus over a ring of per-horizon disengage rows, scored on
//!   the diagonal that pairs each row with the column whose horizon matches
//!   the row's age

use contracts::{ConfidenceClass, ConfidenceConfig, HazardConfig};
use ringbuf::{traits::*, HeapRb};
use tensor_view::DISENGAGE_LEN;

/// Slots of the severe window held to the strict threshold (the newest ones)
const STRICT_RECENT_SLOTS: usize = 2;

/// Rolling confidence state for one camera pipeline
pub struct ConfidenceTracker {
    /// Independent per-horizon disengage rows, oldest first; always exactly
    /// `DISENGAGE_LEN` rows
    rows: HeapRb<[f32; DISENGAGE_LEN]>,
    /// Nearest-horizon severe-braking probabilities, oldest first
    severe_window: HeapRb<f32>,
    /// Nearest-horizon medium-braking probabilities, oldest first
    medium_window: HeapRb<f32>,
    hazard: HazardConfig,
    bands: ConfidenceConfig,
}

impl std::fmt::Debug for ConfidenceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfidenceTracker")
            .field("rows", &self.rows.occupied_len())
            .field("score", &self.consensus_score())
            .finish()
    }
}

impl ConfidenceTracker {
    /// Create zero-filled state (pipeline start)
    pub fn new(hazard: HazardConfig, bands: ConfidenceConfig) -> Self {
        let mut rows = HeapRb::new(DISENGAGE_LEN);
        while rows.try_push([0.0; DISENGAGE_LEN]).is_ok() {}

        let mut severe_window = HeapRb::new(hazard.severe_window);
        while severe_window.try_push(0.0).is_ok() {}

        let mut medium_window = HeapRb::new(hazard.medium_window);
        while medium_window.try_push(0.0).is_ok() {}

        Self {
            rows,
            severe_window,
            medium_window,
            hazard,
            bands,
        }
    }

    /// Push this frame's nearest-horizon braking probabilities and evaluate
    /// the debounced hazard flag.
    ///
    /// The flag is true only when every slot of both windows clears its
    /// threshold: a single high reading cannot trigger it. The severe window
    /// holds its two newest slots to the strict threshold and the older ones
    /// to the relaxed threshold.
    pub fn push_hazard(&mut self, severe_prob: f32, medium_prob: f32) -> bool {
        self.severe_window.push_overwrite(severe_prob);
        self.medium_window.push_overwrite(medium_prob);

        let len = self.severe_window.occupied_len();
        let strict_from = len.saturating_sub(STRICT_RECENT_SLOTS);

        let mut above = true;
        for (i, &p) in self.severe_window.iter().enumerate() {
            let threshold = if i < strict_from {
                self.hazard.severe_relaxed
            } else {
                self.hazard.severe_strict
            };
            above = above && p > threshold;
        }
        for &p in self.medium_window.iter() {
            above = above && p > self.hazard.medium;
        }
        above
    }

    /// Push one independent per-horizon row, dropping the oldest.
    ///
    /// The ring is pre-filled at construction, so the matrix stays exactly
    /// `DISENGAGE_LEN` rows across any number of updates.
    pub fn push_row(&mut self, row: [f32; DISENGAGE_LEN]) {
        self.rows.push_overwrite(row);
    }

    /// Number of rows currently held (always `DISENGAGE_LEN`)
    pub fn row_count(&self) -> usize {
        self.rows.occupied_len()
    }

    /// Diagonal consensus score.
    ///
    /// Row `i` (oldest = 0) contributes column `H-1-i`: each historical
    /// forecast is read at the horizon whose remaining time matches the row's
    /// age, so the score combines the most temporally relevant prediction for
    /// each slice instead of always trusting the newest row.
    pub fn consensus_score(&self) -> f32 {
        let h = DISENGAGE_LEN;
        let sum: f32 = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| row[h - 1 - i])
            .sum();
        sum / h as f32
    }

    /// Classify a consensus score into the three risk bands
    pub fn classify(&self, score: f32) -> ConfidenceClass {
        if score < self.bands.score_green {
            ConfidenceClass::Green
        } else if score < self.bands.score_yellow {
            ConfidenceClass::Yellow
        } else {
            ConfidenceClass::Red
        }
    }
}

/// Convert a cumulative any-event curve into independent per-horizon
/// probabilities via the discrete hazard-rate recurrence.
///
/// `independent[0] = cumulative[0]`; each later slice is the conditional
/// probability of the event landing there given it has not happened yet.
pub fn independent_from_cumulative(cumulative: &[f32; DISENGAGE_LEN]) -> [f32; DISENGAGE_LEN] {
    let mut independent = [0.0f32; DISENGAGE_LEN];
    independent[0] = cumulative[0];
    for i in 0..DISENGAGE_LEN - 1 {
        independent[i + 1] = (cumulative[i + 1] - cumulative[i]) / (1.0 - cumulative[i]);
    }
    independent
}
