//! Record-store traits: the seam between engine logic and persistence.
//!
//! The engine only ever needs three capabilities from its store: a range
//! query over rating events, visibility-filtered candidate reads with an
//! atomic usage bump, and atomic counter upserts for allocation arms.
//! `db::EngineDb` is the shipped implementation; the traits exist so a
//! service can swap in another backend without touching the selectors.

use chrono::{DateTime, Utc};

use crate::db::DbError;
use crate::types::{ArmCounters, Candidate, NewCandidate, NewRating, RatingEvent};

/// Storage for immutable check-in events.
pub trait RatingStore {
    /// Insert a check-in recorded at `now`. Assumes the rating was already
    /// validated (see `ratings::record_rating`); the schema CHECK constraint
    /// backstops direct callers.
    fn insert_rating(&self, rating: &NewRating, now: DateTime<Utc>) -> Result<RatingEvent, DbError>;

    /// Events for one subject in the half-open range `[start, end)`,
    /// ordered by recorded time ascending. One round trip.
    fn ratings_in_range(
        &self,
        subject_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RatingEvent>, DbError>;
}

/// Storage for resurfaceable candidate prompts.
pub trait CandidateStore {
    fn insert_candidate(
        &self,
        candidate: &NewCandidate,
        now: DateTime<Utc>,
    ) -> Result<Candidate, DbError>;

    /// Candidates the viewer may see for a subject: rows the viewer owns
    /// plus rows marked shared. Visibility is a filter applied here, never
    /// a ranking input.
    fn candidates_for(&self, subject_id: &str, viewer_id: &str) -> Result<Vec<Candidate>, DbError>;

    /// Atomically bump `usage_count` and set `last_used_at` in one
    /// conditional write. Returns false when the row no longer exists.
    fn mark_resurfaced(&self, candidate_id: &str, at: DateTime<Utc>) -> Result<bool, DbError>;
}

/// Storage for allocation arm counters, keyed by (scope, name).
pub trait ArmStore {
    /// Create missing arm rows with zero counters. Idempotent; existing
    /// counters are never reset.
    fn ensure_arms(&self, scope: &str, names: &[&str]) -> Result<(), DbError>;

    /// Counters for the named arms within a scope: exactly one entry per
    /// requested name, in request order, zero-filled when an arm has no
    /// stored row yet. The allocator maps weights back to arms by position,
    /// so implementations must not reorder or drop names.
    fn arm_counters(&self, scope: &str, names: &[&str]) -> Result<Vec<ArmCounters>, DbError>;

    /// Atomically add one impression to an arm. Concurrent calls must not
    /// lose increments.
    fn record_impression(&self, scope: &str, name: &str) -> Result<(), DbError>;

    /// Atomically add one success to an arm. Called by the feedback
    /// handler when a variant converts.
    fn record_success(&self, scope: &str, name: &str) -> Result<(), DbError>;
}
