//! Candidate prompt storage.

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use crate::db::{DbError, EngineDb};
use crate::store::CandidateStore;
use crate::types::{Candidate, NewCandidate};

fn map_candidate_row(row: &rusqlite::Row) -> rusqlite::Result<Candidate> {
    Ok(Candidate {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        owner_id: row.get(2)?,
        shared: row.get(3)?,
        prompt: row.get(4)?,
        pinned: row.get(5)?,
        usage_count: row.get(6)?,
        last_used_at: row.get(7)?,
        created_at: row.get(8)?,
    })
}

impl CandidateStore for EngineDb {
    fn insert_candidate(
        &self,
        candidate: &NewCandidate,
        now: DateTime<Utc>,
    ) -> Result<Candidate, DbError> {
        let id = format!("cand-{}", Uuid::new_v4());
        let created_at = now.to_rfc3339();

        self.conn_ref().execute(
            "INSERT INTO candidates (id, subject_id, owner_id, shared, prompt, pinned, usage_count, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
            params![
                id,
                candidate.subject_id,
                candidate.owner_id,
                candidate.shared,
                candidate.prompt,
                candidate.pinned,
                created_at
            ],
        )?;

        Ok(Candidate {
            id,
            subject_id: candidate.subject_id.clone(),
            owner_id: candidate.owner_id.clone(),
            shared: candidate.shared,
            prompt: candidate.prompt.clone(),
            pinned: candidate.pinned,
            usage_count: 0,
            last_used_at: None,
            created_at,
        })
    }

    fn candidates_for(&self, subject_id: &str, viewer_id: &str) -> Result<Vec<Candidate>, DbError> {
        let mut stmt = self.conn_ref().prepare(
            "SELECT id, subject_id, owner_id, shared, prompt, pinned, usage_count, last_used_at, created_at
             FROM candidates
             WHERE subject_id = ?1 AND (owner_id = ?2 OR shared = 1)",
        )?;

        let rows = stmt.query_map(params![subject_id, viewer_id], map_candidate_row)?;

        let mut candidates = Vec::new();
        for row in rows {
            candidates.push(row?);
        }
        Ok(candidates)
    }

    fn mark_resurfaced(&self, candidate_id: &str, at: DateTime<Utc>) -> Result<bool, DbError> {
        let changed = self.conn_ref().execute(
            "UPDATE candidates
             SET usage_count = usage_count + 1, last_used_at = ?2
             WHERE id = ?1",
            params![candidate_id, at.to_rfc3339()],
        )?;
        Ok(changed > 0)
    }
}
