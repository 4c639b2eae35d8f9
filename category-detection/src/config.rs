//! Runtime knobs loaded from environment variables.

use std::time::Duration;

/// Retry policy for [`crate::CategoryDetector::detect_category_with_retry`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectionConfig {
    /// Fixed pause between two failed attempts.
    pub retry_delay: Duration,
    /// Attempts used by callers that do not pick their own count.
    pub default_max_attempts: usize,
    /// Ceiling for caller-supplied attempt counts.
    pub max_attempts_limit: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            retry_delay: Duration::from_millis(500),
            default_max_attempts: 3,
            max_attempts_limit: 10,
        }
    }
}

impl DetectionConfig {
    /// Build from `DETECTION_RETRY_DELAY_MS`, `DETECTION_MAX_ATTEMPTS` and
    /// `DETECTION_MAX_ATTEMPTS_LIMIT`. Unset or unparsable values keep their
    /// defaults; the default attempt count never exceeds the limit.
    pub fn from_env() -> Self {
        let dflt = Self::default();
        let limit = parse("DETECTION_MAX_ATTEMPTS_LIMIT", dflt.max_attempts_limit);
        Self {
            retry_delay: Duration::from_millis(parse(
                "DETECTION_RETRY_DELAY_MS",
                dflt.retry_delay.as_millis() as u64,
            )),
            default_max_attempts: parse("DETECTION_MAX_ATTEMPTS", dflt.default_max_attempts)
                .min(limit),
            max_attempts_limit: limit,
        }
    }

    /// Attempt count for a caller request: `None` takes the default, negative
    /// values mean no attempt, anything above the limit is clamped to it.
    pub fn attempts_for(&self, requested: Option<i64>) -> usize {
        requested
            .map_or(self.default_max_attempts, |n| usize::try_from(n).unwrap_or(0))
            .min(self.max_attempts_limit)
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let cfg = DetectionConfig::default();
        assert_eq!(cfg.retry_delay, Duration::from_millis(500));
        assert_eq!(cfg.default_max_attempts, 3);
        assert_eq!(cfg.max_attempts_limit, 10);
    }

    #[test]
    fn requested_attempts_are_floored_and_capped() {
        let cfg = DetectionConfig::default();
        assert_eq!(cfg.attempts_for(None), 3);
        assert_eq!(cfg.attempts_for(Some(5)), 5);
        assert_eq!(cfg.attempts_for(Some(-2)), 0);
        assert_eq!(cfg.attempts_for(Some(1_000_000)), 10);
        assert_eq!(cfg.attempts_for(Some(i64::MAX)), 10);
    }

    #[test]
    fn unset_variable_keeps_default() {
        assert_eq!(parse("DETECTION_TEST_SURELY_UNSET_VAR", 42usize), 42);
    }
}
