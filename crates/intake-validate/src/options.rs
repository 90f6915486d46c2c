//! Validation configuration.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Bounds for batch progress reporting.
pub const MIN_PROGRESS_INTERVAL: usize = 50;
pub const MAX_PROGRESS_INTERVAL: usize = 200;

/// Thresholds and reference date for the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Reference date for age and staleness checks.
    pub today: NaiveDate,
    /// Follow-up dates older than this many days are reported.
    pub follow_up_max_age_days: i64,
    /// Youngest plausible age in years.
    pub min_age: u32,
    /// Oldest plausible age in years.
    pub max_age: u32,
    /// Rows between progress callbacks (clamped to 50-200).
    pub progress_interval: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            today: Local::now().date_naive(),
            follow_up_max_age_days: 365,
            min_age: 14,
            max_age: 110,
            progress_interval: 100,
        }
    }
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    #[must_use]
    pub fn with_age_range(mut self, min_age: u32, max_age: u32) -> Self {
        self.min_age = min_age;
        self.max_age = max_age;
        self
    }

    #[must_use]
    pub fn with_follow_up_max_age_days(mut self, days: i64) -> Self {
        self.follow_up_max_age_days = days;
        self
    }

    #[must_use]
    pub fn with_progress_interval(mut self, rows: usize) -> Self {
        self.progress_interval = rows;
        self
    }

    /// Progress interval clamped to the supported range.
    pub fn effective_progress_interval(&self) -> usize {
        self.progress_interval
            .clamp(MIN_PROGRESS_INTERVAL, MAX_PROGRESS_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_interval_is_clamped() {
        let options = ValidationOptions::new();
        assert_eq!(options.effective_progress_interval(), 100);
        assert_eq!(options.clone().with_progress_interval(1).effective_progress_interval(), 50);
        assert_eq!(options.with_progress_interval(10_000).effective_progress_interval(), 200);
    }

    #[test]
    fn test_deserialize_partial() {
        let options: ValidationOptions =
            serde_json::from_str(r#"{"today":"2025-01-01","min_age":16}"#).expect("parse");
        assert_eq!(options.today, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(options.min_age, 16);
        assert_eq!(options.max_age, 110);
    }
}
