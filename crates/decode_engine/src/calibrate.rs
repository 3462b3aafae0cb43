//! Elementwise calibration of raw model values.
//!
//! The model emits unconstrained floats; these helpers map them into bounded
//! physical quantities. Saturation at extreme logits is expected and not an
//! error.

/// Logit to probability, open interval (0, 1)
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Log-scale standard deviation to physical standard deviation.
///
/// Strictly positive for every finite input regardless of sign.
#[inline]
pub fn std_from_log(log_std: f32) -> f32 {
    log_std.exp()
}

/// Normalized distribution over one category axis.
///
/// Max-subtracted for numerical stability; each call normalizes one bucket
/// independently.
pub fn softmax<const N: usize>(logits: &[f32; N]) -> [f32; N] {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut out = [0.0f32; N];
    let mut sum = 0.0f32;
    for (slot, &logit) in out.iter_mut().zip(logits.iter()) {
        *slot = (logit - max).exp();
        sum += *slot;
    }
    for slot in &mut out {
        *slot /= sum;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_strictly_positive() {
        for log_std in [-20.0f32, -1.0, 0.0, 1.0, 20.0] {
            let std = std_from_log(log_std);
            assert!(std > 0.0, "exp({log_std}) must be positive");
            assert!((std - log_std.exp()).abs() < f32::EPSILON * std.max(1.0));
        }
    }

    #[test]
    fn test_sigmoid_bounds() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(-40.0) >= 0.0);
        assert!(sigmoid(40.0) <= 1.0);
        assert!(sigmoid(-5.0) < sigmoid(5.0));
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let dist = softmax(&[1.0f32, 2.0, 3.0, 4.0]);
        let sum: f32 = dist.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(dist[3] > dist[0]);
    }

    #[test]
    fn test_softmax_stable_at_large_logits() {
        let dist = softmax(&[1000.0f32, 1000.0, -1000.0]);
        assert!(dist.iter().all(|p| p.is_finite()));
        assert!((dist[0] - 0.5).abs() < 1e-6);
        assert!(dist[2] < 1e-6);
    }
}
