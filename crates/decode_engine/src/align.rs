//! Time-from-distance alignment of the selected plan.
//!
//! Lane lines and road edges are sampled on the fixed distance grid, but
//! consumers index them by time; this maps each grid distance to the forecast
//! time at which the selected plan reaches it.

use tensor_view::{t_idxs, x_idxs, PlanPrediction, TRAJECTORY_SIZE};

/// Interpolate, for each ascending target distance, the time the trajectory
/// reaches it.
///
/// `positions` and `times` are parallel ascending grids. The first target is
/// the distance-0 anchor and maps to time 0 exactly. Targets beyond the last
/// bracketing pair — the plan does not extend that far — get the grid's
/// maximum time, as do all targets after them; they are a defined fallback,
/// not an extrapolation.
pub fn time_at_distances(positions: &[f32], times: &[f32], targets: &[f32], out: &mut [f32]) {
    assert_eq!(positions.len(), times.len());
    assert_eq!(targets.len(), out.len());

    out.fill(f32::NAN);
    if out.is_empty() {
        return;
    }
    out[0] = 0.0;

    let last = positions.len() - 1;
    let mut tidx = 0usize;
    for xidx in 1..targets.len() {
        // advance until the next step is no longer short of the target
        while tidx < last && positions[tidx + 1] < targets[xidx] {
            tidx += 1;
        }
        if tidx == last {
            for slot in &mut out[xidx..] {
                *slot = times[last];
            }
            break;
        }

        let current = positions[tidx];
        let next = positions[tidx + 1];
        let p = (targets[xidx] - current) / (next - current);
        out[xidx] = p * times[tidx + 1] + (1.0 - p) * times[tidx];
    }
}

/// Map the fixed distance grid onto the selected plan's time axis.
pub fn plan_times(plan: &PlanPrediction) -> [f32; TRAJECTORY_SIZE] {
    let mut positions = [0.0f32; TRAJECTORY_SIZE];
    for (slot, step) in positions.iter_mut().zip(plan.mean.iter()) {
        *slot = step.position.x;
    }
    let mut out = [0.0f32; TRAJECTORY_SIZE];
    time_at_distances(&positions, &t_idxs(), &x_idxs(), &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolation_between_steps() {
        let positions = [0.0, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0];
        let times = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut out = [0.0f32; 2];

        time_at_distances(&positions, &times, &[0.0, 4.0], &mut out);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], 3.5);
    }

    #[test]
    fn test_exact_grid_hit_has_no_interpolation_error() {
        let positions = [0.0, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0];
        let times = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut out = [0.0f32; 3];

        time_at_distances(&positions, &times, &[0.0, 3.0, 8.0], &mut out);
        assert_eq!(out[1], 3.0);
        assert_eq!(out[2], 5.0);
    }

    #[test]
    fn test_short_plan_falls_back_to_max_time() {
        let positions = [0.0, 1.0, 2.0, 3.0];
        let times = [0.0, 1.0, 2.0, 3.0];
        let mut out = [0.0f32; 4];

        time_at_distances(&positions, &times, &[0.0, 2.5, 10.0, 50.0], &mut out);
        assert_eq!(out[1], 2.5);
        // Unreachable targets and everything after them saturate at the
        // horizon end.
        assert_eq!(out[2], 3.0);
        assert_eq!(out[3], 3.0);
    }

    #[test]
    fn test_plan_times_monotonic_for_linear_plan() {
        use bytemuck::Zeroable;
        use tensor_view::{x_idxs, PlanPrediction};

        let mut plan = PlanPrediction::zeroed();
        // Plan that tracks the distance grid exactly: each grid distance is
        // reached at the matching grid time.
        for (step, x) in plan.mean.iter_mut().zip(x_idxs()) {
            step.position.x = x;
        }
        let out = plan_times(&plan);
        let t = t_idxs();
        for (got, want) in out.iter().zip(t.iter()) {
            assert!((got - want).abs() < 1e-4, "got {got}, want {want}");
        }
        for pair in out.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }
}
