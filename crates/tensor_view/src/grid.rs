//! Fixed forecast grids.
//!
//! The trajectory grids are square-spaced: sample `i` of `n` sits at
//! `(i / (n-1))^2 * max`, concentrating resolution near the vehicle where
//! control consumes it.

use crate::layout::{DISENGAGE_LEN, LEAD_SELECTION_N, LEAD_TRAJ_LEN, TRAJECTORY_SIZE};

/// Maximum forecast time (seconds)
pub const MAX_T: f32 = 10.0;
/// Maximum forecast distance (meters)
pub const MAX_X: f32 = 192.0;

/// Lead forecast sample times (seconds)
pub const LEAD_T_IDXS: [f32; LEAD_TRAJ_LEN] = [0.0, 2.0, 4.0, 6.0, 8.0, 10.0];
/// Time anchors of the published lead forecasts (seconds)
pub const LEAD_T_OFFSETS: [f32; LEAD_SELECTION_N] = [0.0, 2.0, 4.0];
/// Disengage forecast horizons (seconds)
pub const DISENGAGE_T: [f32; DISENGAGE_LEN] = [2.0, 4.0, 6.0, 8.0, 10.0];

/// Trajectory time grid, ascending, `t_idxs()[0] == 0`, max [`MAX_T`]
pub fn t_idxs() -> [f32; TRAJECTORY_SIZE] {
    square_spaced(MAX_T)
}

/// Longitudinal distance grid, ascending, max [`MAX_X`]
pub fn x_idxs() -> [f32; TRAJECTORY_SIZE] {
    square_spaced(MAX_X)
}

fn square_spaced(max: f32) -> [f32; TRAJECTORY_SIZE] {
    let mut grid = [0.0f32; TRAJECTORY_SIZE];
    let last = (TRAJECTORY_SIZE - 1) as f32;
    for (i, slot) in grid.iter_mut().enumerate() {
        let p = i as f32 / last;
        *slot = max * p * p;
    }
    grid
}
