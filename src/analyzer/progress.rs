use std::time::Duration;

/// Next displayed progress. Follows `100 × (1 − e^(−t/τ))` but never moves
/// backwards and never passes `ceiling` while the analysis is running.
pub fn next_progress(current: f32, elapsed: Duration, time_constant: f32, ceiling: f32) -> f32 {
    let t = elapsed.as_secs_f32();
    let target = 100.0 * (1.0 - (-t / time_constant).exp());
    current.max(target).clamp(0.0, ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(next_progress(0.0, Duration::ZERO, 1.6, 92.0), 0.0);
    }

    #[test]
    fn test_follows_curve() {
        let p = next_progress(0.0, Duration::from_millis(1600), 1.6, 92.0);
        assert!((p - 63.212).abs() < 0.01, "got {}", p);
    }

    #[test]
    fn test_capped_at_ceiling() {
        let p = next_progress(0.0, Duration::from_secs(60), 1.6, 92.0);
        assert_eq!(p, 92.0);
    }

    #[test]
    fn test_monotonic_over_ticks() {
        let mut progress = 0.0;
        for tick in 0..200u64 {
            let next = next_progress(progress, Duration::from_millis(tick * 120), 1.6, 92.0);
            assert!(next >= progress);
            assert!(next <= 92.0);
            progress = next;
        }
    }

    #[test]
    fn test_never_moves_backwards() {
        let p = next_progress(50.0, Duration::from_millis(100), 1.6, 92.0);
        assert_eq!(p, 50.0);
    }
}
