//! Calendar bucketing (TDM-41).
//!
//! Check-ins are grouped by the civil date where the couple lives, not by
//! UTC date. An 11pm Tuesday check-in in Denver belongs to Tuesday even
//! though it is already Wednesday in UTC. All bucketing therefore runs
//! through `day_key`, which converts an instant to a civil date in the
//! subject's IANA timezone, and day arithmetic happens on the canonical
//! civil date so DST transitions cannot shift a key.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A canonical calendar day: the civil date itself, independent of any
/// timezone once computed. Renders as "YYYY-MM-DD" and as UTC midnight
/// when an instant is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodKey(NaiveDate);

impl PeriodKey {
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The canonical instant for this key: midnight UTC of the civil date.
    pub fn canonical(&self) -> DateTime<Utc> {
        self.0.and_time(NaiveTime::MIN).and_utc()
    }

    /// The "YYYY-MM-DD" label used in period-keyed storage and JSON.
    pub fn label(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl std::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Parse an IANA timezone identifier, failing fast on anything unknown.
///
/// Unknown zones are never silently replaced with UTC: a wrong zone would
/// quietly shift every bucket for that couple.
pub fn parse_timezone(timezone: &str) -> Result<Tz, EngineError> {
    timezone
        .parse()
        .map_err(|_| EngineError::InvalidTimezone(timezone.to_string()))
}

/// Civil date of `instant` in `timezone`.
pub fn day_key(instant: DateTime<Utc>, timezone: &str) -> Result<PeriodKey, EngineError> {
    Ok(day_key_in(instant, &parse_timezone(timezone)?))
}

/// Civil date of `instant` in an already-parsed timezone. Used by callers
/// that bucket many events against one zone.
pub fn day_key_in(instant: DateTime<Utc>, tz: &Tz) -> PeriodKey {
    PeriodKey(instant.with_timezone(tz).date_naive())
}

/// Shift a key by whole days on the canonical value.
///
/// Day arithmetic never re-enters a timezone, so adding 7 always lands on
/// the same weekday even across a DST change.
pub fn add_days(key: PeriodKey, days: i64) -> PeriodKey {
    PeriodKey(key.date() + chrono::Duration::days(days))
}

/// First day of the week containing `instant`, in the subject's timezone.
///
/// `weekday_offset` follows 0 = Sunday .. 6 = Saturday
/// (`chrono::Weekday::num_days_from_sunday`); values above 6 wrap. The
/// result walks backward at most 6 days and never forward.
pub fn week_start(
    instant: DateTime<Utc>,
    timezone: &str,
    weekday_offset: u8,
) -> Result<PeriodKey, EngineError> {
    Ok(week_start_of(day_key(instant, timezone)?, weekday_offset))
}

/// Week start for a key that is already a civil date.
pub fn week_start_of(key: PeriodKey, weekday_offset: u8) -> PeriodKey {
    let offset = i64::from(weekday_offset % 7);
    let weekday = i64::from(key.date().weekday().num_days_from_sunday());
    let back = (weekday - offset).rem_euclid(7);
    add_days(key, -back)
}

/// Parse an engine timestamp back to an instant.
///
/// Accepts RFC3339 with any offset, plus bare "YYYY-MM-DDTHH:MM:SS" strings
/// from older rows, which are treated as UTC.
pub fn parse_instant(iso: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(iso)
        .or_else(|_| {
            DateTime::parse_from_rfc3339(&format!("{}+00:00", iso.trim_end_matches('Z')))
        })
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
