use super::job::PublishMode;
use super::state::JobStatus;

/// Gate threshold applied when a job does not carry its own.
pub const DEFAULT_GATE: f64 = 0.7;

/// Map a publish mode and model confidence onto a terminal status.
///
/// Only `Auto` jobs whose confidence reaches the gate are marked `Done`;
/// everything else goes to manual review. Out-of-range confidences are
/// compared as-is.
pub fn decide(mode: PublishMode, confidence: f64, gate: f64) -> JobStatus {
    if mode == PublishMode::Auto && confidence >= gate {
        JobStatus::Done
    } else {
        JobStatus::NeedsReview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_above_gate_is_done() {
        assert_eq!(decide(PublishMode::Auto, 0.82, 0.7), JobStatus::Done);
    }

    #[test]
    fn auto_at_gate_is_done() {
        assert_eq!(decide(PublishMode::Auto, 0.7, 0.7), JobStatus::Done);
    }

    #[test]
    fn auto_below_gate_needs_review() {
        assert_eq!(decide(PublishMode::Auto, 0.5, 0.7), JobStatus::NeedsReview);
    }

    #[test]
    fn review_mode_ignores_confidence() {
        assert_eq!(
            decide(PublishMode::NeedsReview, 0.99, 0.7),
            JobStatus::NeedsReview
        );
        assert_eq!(
            decide(PublishMode::NeedsReview, 1.0, 0.0),
            JobStatus::NeedsReview
        );
    }

    #[test]
    fn failed_model_call_routes_to_review() {
        assert_eq!(decide(PublishMode::Auto, 0.0, 0.7), JobStatus::NeedsReview);
    }

    #[test]
    fn out_of_range_confidence_is_compared_raw() {
        assert_eq!(decide(PublishMode::Auto, 1.5, 0.7), JobStatus::Done);
        assert_eq!(decide(PublishMode::Auto, -0.2, 0.0), JobStatus::NeedsReview);
    }

    #[test]
    fn zero_gate_accepts_any_nonnegative_confidence() {
        assert_eq!(decide(PublishMode::Auto, 0.0, 0.0), JobStatus::Done);
    }
}
