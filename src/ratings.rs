//! Check-in recording (TDM-41).
//!
//! Validation happens here, before the store is touched. The schema CHECK
//! constraint is a backstop for writers that bypass this function.

use chrono::{DateTime, Utc};

use crate::error::EngineError;
use crate::store::RatingStore;
use crate::types::{NewRating, RatingEvent, RATING_MAX, RATING_MIN};

/// Validate and persist one check-in.
pub fn record_rating<S: RatingStore>(
    store: &S,
    new: &NewRating,
    now: DateTime<Utc>,
) -> Result<RatingEvent, EngineError> {
    if new.rating < RATING_MIN || new.rating > RATING_MAX {
        return Err(EngineError::RatingOutOfRange {
            rating: new.rating,
            min: RATING_MIN,
            max: RATING_MAX,
        });
    }
    Ok(store.insert_rating(new, now)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 10, 9, 0, 0).unwrap()
    }

    fn sample(rating: i32) -> NewRating {
        NewRating {
            subject_id: "couple-1".to_string(),
            rating,
            note: None,
            tags: None,
        }
    }

    #[test]
    fn test_record_rating_persists_valid_score() {
        let db = test_db();
        let event = record_rating(&db, &sample(3), now()).expect("record");
        assert_eq!(event.rating, 3);

        let stored = db
            .ratings_in_range(
                "couple-1",
                now() - chrono::Duration::hours(1),
                now() + chrono::Duration::hours(1),
            )
            .expect("query");
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn test_record_rating_rejects_out_of_range() {
        let db = test_db();
        for bad in [0, 6, -2, 100] {
            let err = record_rating(&db, &sample(bad), now()).expect_err("must reject");
            assert!(matches!(
                err,
                EngineError::RatingOutOfRange { rating, min: 1, max: 5 } if rating == bad
            ));
        }
        let stored = db
            .ratings_in_range(
                "couple-1",
                now() - chrono::Duration::hours(1),
                now() + chrono::Duration::hours(1),
            )
            .expect("query");
        assert!(stored.is_empty(), "rejected ratings must not be stored");
    }
}
