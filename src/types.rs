//! Domain types shared across the engine.
//!
//! Timestamps are RFC3339 strings in UTC, written with `Utc::now().to_rfc3339()`
//! and parsed back on demand (see `period::parse_instant`). Structs serialize
//! with camelCase field names so route handlers can return them as JSON
//! without re-mapping.

use serde::{Deserialize, Serialize};

/// Lowest accepted check-in rating.
pub const RATING_MIN: i32 = 1;
/// Highest accepted check-in rating.
pub const RATING_MAX: i32 = 5;

/// A row from the `rating_events` table: one partner's check-in score.
///
/// Events are immutable once recorded. `tags` holds a JSON array of short
/// labels ("communication", "intimacy") or NULL when the check-in had none.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingEvent {
    pub id: String,
    pub subject_id: String,
    pub rating: i32,
    pub note: Option<String>,
    pub tags: Option<Vec<String>>,
    pub recorded_at: String,
}

/// Input for recording a new check-in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRating {
    pub subject_id: String,
    pub rating: i32,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// One week of aggregated check-in data.
///
/// `mean` is None when the week had no events; `std_dev` is None below two
/// samples (sample standard deviation needs n >= 2).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// First day of the week, e.g. "2026-08-17".
    pub week_start: crate::period::PeriodKey,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub count: usize,
}

/// A row from the `candidates` table: a saved prompt that can be resurfaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub subject_id: String,
    pub owner_id: String,
    /// Visible to both partners when true, only to the owner when false.
    pub shared: bool,
    pub prompt: String,
    pub pinned: bool,
    pub usage_count: i64,
    pub last_used_at: Option<String>,
    pub created_at: String,
}

/// Input for saving a new candidate prompt.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCandidate {
    pub subject_id: String,
    pub owner_id: String,
    #[serde(default)]
    pub shared: bool,
    pub prompt: String,
    #[serde(default)]
    pub pinned: bool,
}

/// A row from the `allocation_arms` table: counters for one variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmCounters {
    pub scope: String,
    pub name: String,
    pub impressions: i64,
    pub successes: i64,
    pub updated_at: String,
}

impl ArmCounters {
    /// Smoothed success estimate: (successes + 1) / (impressions + 2).
    ///
    /// The Laplace prior keeps unseen arms at 0.5 instead of 0, so a fresh
    /// arm competes with established ones from its first allocation.
    pub fn smoothed_score(&self) -> f64 {
        (self.successes as f64 + 1.0) / (self.impressions as f64 + 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothed_score_fresh_arm() {
        let arm = ArmCounters {
            scope: "s".to_string(),
            name: "a".to_string(),
            impressions: 0,
            successes: 0,
            updated_at: "2026-01-01T00:00:00+00:00".to_string(),
        };
        assert!((arm.smoothed_score() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_smoothed_score_tracks_observed_rate() {
        let arm = ArmCounters {
            scope: "s".to_string(),
            name: "a".to_string(),
            impressions: 98,
            successes: 49,
            updated_at: "2026-01-01T00:00:00+00:00".to_string(),
        };
        assert!((arm.smoothed_score() - 0.5).abs() < 1e-9);

        let hot = ArmCounters {
            impressions: 100,
            successes: 90,
            ..arm
        };
        assert!((hot.smoothed_score() - 91.0 / 102.0).abs() < 1e-9);
    }

    #[test]
    fn test_candidate_serializes_camel_case() {
        let candidate = Candidate {
            id: "cand-1".to_string(),
            subject_id: "couple-9".to_string(),
            owner_id: "user-1".to_string(),
            shared: true,
            prompt: "What made you laugh this week?".to_string(),
            pinned: false,
            usage_count: 2,
            last_used_at: None,
            created_at: "2026-03-01T12:00:00+00:00".to_string(),
        };
        let json = serde_json::to_string(&candidate).expect("serialize");
        assert!(json.contains("\"subjectId\":\"couple-9\""));
        assert!(json.contains("\"usageCount\":2"));
        assert!(json.contains("\"lastUsedAt\":null"));
    }
}
