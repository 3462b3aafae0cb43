//! Mixture hypothesis selection.
//!
//! Selection compares raw weights directly: sigmoid is monotonic, so the
//! argmax is unchanged and the transform is only applied where a calibrated
//! probability is published.

use tensor_view::{LeadMixture, LeadPrediction, PlanMixture, PlanPrediction};

/// Pick the highest-weighted plan hypothesis.
///
/// Deterministic: ties resolve to the lowest index. The mixture is non-empty
/// by layout contract.
pub fn best_plan(plans: &PlanMixture) -> (usize, &PlanPrediction) {
    let mut best = 0usize;
    for (idx, hyp) in plans.hypotheses.iter().enumerate().skip(1) {
        if hyp.weight > plans.hypotheses[best].weight {
            best = idx;
        }
    }
    (best, &plans.hypotheses[best])
}

/// Pick the highest-weighted lead hypothesis for one time anchor.
///
/// Each hypothesis carries a weight per anchor; selection uses the column for
/// `t_idx`. Same tie-break as [`best_plan`].
pub fn best_lead(leads: &LeadMixture, t_idx: usize) -> &LeadPrediction {
    let mut best = 0usize;
    for (idx, hyp) in leads.hypotheses.iter().enumerate().skip(1) {
        if hyp.weight[t_idx] > leads.hypotheses[best].weight[t_idx] {
            best = idx;
        }
    }
    &leads.hypotheses[best]
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::Zeroable;

    fn plans_with_weights(weights: &[f32]) -> PlanMixture {
        let mut plans = PlanMixture::zeroed();
        for (hyp, &w) in plans.hypotheses.iter_mut().zip(weights) {
            hyp.weight = w;
        }
        plans
    }

    #[test]
    fn test_best_plan_argmax() {
        let plans = plans_with_weights(&[0.1, 2.5, -1.0, 2.4, 0.0]);
        let (idx, hyp) = best_plan(&plans);
        assert_eq!(idx, 1);
        assert_eq!(hyp.weight, 2.5);
    }

    #[test]
    fn test_best_plan_tie_breaks_low_index() {
        let plans = plans_with_weights(&[0.0, 3.0, 3.0, 3.0, 0.0]);
        let (idx, _) = best_plan(&plans);
        assert_eq!(idx, 1);
    }

    #[test]
    fn test_best_lead_uses_anchor_column() {
        let mut leads = LeadMixture::zeroed();
        leads.hypotheses[0].weight = [5.0, 0.0, 0.0];
        leads.hypotheses[1].weight = [0.0, 5.0, 0.0];
        leads.hypotheses[0].mean[0].x = 10.0;
        leads.hypotheses[1].mean[0].x = 20.0;

        assert_eq!(best_lead(&leads, 0).mean[0].x, 10.0);
        assert_eq!(best_lead(&leads, 1).mean[0].x, 20.0);
        // Equal weights at anchor 2: lowest index wins.
        assert_eq!(best_lead(&leads, 2).mean[0].x, 10.0);
    }
}
