//! Comment service metrics.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// How a `comments.post` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOutcome {
    Created,
    /// Failed validation and never reached the store.
    Rejected,
    /// The store failed.
    Failed,
}

impl PostOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostOutcome::Created => "created",
            PostOutcome::Rejected => "rejected",
            PostOutcome::Failed => "failed",
        }
    }
}

/// Comment metrics recorder
pub struct CommentMetrics;

impl CommentMetrics {
    pub fn record_post(outcome: PostOutcome) {
        counter!("comments_posted_total", "outcome" => outcome.as_str()).increment(1);

        tracing::debug!(outcome = outcome.as_str(), "Recorded comment post");
    }

    /// A successful full list read.
    pub fn record_list(count: usize, elapsed: Duration) {
        counter!("comments_listed_total", "outcome" => "ok").increment(1);
        histogram!("comments_list_duration_seconds").record(elapsed.as_secs_f64());
        Self::set_comments_total(count as u64);
    }

    pub fn record_list_failure() {
        counter!("comments_listed_total", "outcome" => "failed").increment(1);
    }

    pub fn set_comments_total(total: u64) {
        gauge!("comments_total").set(total as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(PostOutcome::Created.as_str(), "created");
        assert_eq!(PostOutcome::Rejected.as_str(), "rejected");
        assert_eq!(PostOutcome::Failed.as_str(), "failed");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        CommentMetrics::record_post(PostOutcome::Created);
        CommentMetrics::record_list(3, Duration::from_millis(4));
        CommentMetrics::record_list_failure();
    }
}
