//! Check-in event storage.

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use crate::db::{DbError, EngineDb};
use crate::store::RatingStore;
use crate::types::{NewRating, RatingEvent};

fn map_rating_row(row: &rusqlite::Row) -> rusqlite::Result<RatingEvent> {
    let tags_json: Option<String> = row.get(4)?;
    Ok(RatingEvent {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        rating: row.get(2)?,
        note: row.get(3)?,
        tags: tags_json.and_then(|s| serde_json::from_str(&s).ok()),
        recorded_at: row.get(5)?,
    })
}

impl RatingStore for EngineDb {
    fn insert_rating(
        &self,
        rating: &NewRating,
        now: DateTime<Utc>,
    ) -> Result<RatingEvent, DbError> {
        let id = format!("chk-{}", Uuid::new_v4());
        let recorded_at = now.to_rfc3339();
        let tags_json = rating
            .tags
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        self.conn_ref().execute(
            "INSERT INTO rating_events (id, subject_id, rating, note, tags, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id,
                rating.subject_id,
                rating.rating,
                rating.note,
                tags_json,
                recorded_at
            ],
        )?;

        Ok(RatingEvent {
            id,
            subject_id: rating.subject_id.clone(),
            rating: rating.rating,
            note: rating.note.clone(),
            tags: rating.tags.clone(),
            recorded_at,
        })
    }

    fn ratings_in_range(
        &self,
        subject_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RatingEvent>, DbError> {
        // RFC3339 in UTC sorts lexicographically, so string comparison is
        // chronological here.
        let mut stmt = self.conn_ref().prepare(
            "SELECT id, subject_id, rating, note, tags, recorded_at
             FROM rating_events
             WHERE subject_id = ?1 AND recorded_at >= ?2 AND recorded_at < ?3
             ORDER BY recorded_at ASC",
        )?;

        let rows = stmt.query_map(
            params![subject_id, start.to_rfc3339(), end.to_rfc3339()],
            map_rating_row,
        )?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }
        Ok(events)
    }
}
