//! Phase-dependent breakthrough thresholds.

/// Decide whether a scored reply counts as a breakthrough at the given step.
///
/// Later steps are judged more leniently: the script is designed so that
/// resisting the mirror and recognition phases is harder, while an early
/// high score is an unreliable signal and never short-circuits the run.
pub fn is_breakthrough(score: f64, step_id: u32) -> bool {
    if step_id >= 6 && score > 0.6 {
        return true;
    }
    if step_id >= 4 && score > 0.8 {
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_late_steps_use_lenient_threshold() {
        for step_id in [6, 7, 8] {
            assert!(!is_breakthrough(0.6, step_id));
            assert!(is_breakthrough(0.61, step_id));
            assert!(is_breakthrough(1.0, step_id));
        }
    }

    #[test]
    fn test_middle_steps_require_high_score() {
        for step_id in [4, 5] {
            assert!(!is_breakthrough(0.8, step_id));
            assert!(is_breakthrough(0.81, step_id));
        }
    }

    #[test]
    fn test_early_steps_never_break_through() {
        for step_id in [1, 2, 3] {
            assert!(!is_breakthrough(1.0, step_id));
        }
    }

    #[test]
    fn test_monotonic_in_score() {
        // Once past the threshold, larger scores never flip the decision back.
        let mut score = 0.0;
        let mut seen_true = false;
        while score <= 1.0 {
            let decision = is_breakthrough(score, 6);
            if seen_true {
                assert!(decision);
            }
            seen_true |= decision;
            score += 0.05;
        }
        assert!(seen_true);
    }
}
