//! Allocation arm counter storage.
//!
//! Counters move through single-statement upserts so concurrent writers
//! never lose increments. There is no read-modify-write anywhere here.

use rusqlite::params;

use crate::db::{DbError, EngineDb};
use crate::store::ArmStore;
use crate::types::ArmCounters;

impl ArmStore for EngineDb {
    fn ensure_arms(&self, scope: &str, names: &[&str]) -> Result<(), DbError> {
        let mut stmt = self.conn_ref().prepare(
            "INSERT OR IGNORE INTO allocation_arms (scope, name) VALUES (?1, ?2)",
        )?;
        for name in names {
            stmt.execute(params![scope, name])?;
        }
        Ok(())
    }

    fn arm_counters(&self, scope: &str, names: &[&str]) -> Result<Vec<ArmCounters>, DbError> {
        let mut stmt = self.conn_ref().prepare(
            "SELECT scope, name, impressions, successes, updated_at
             FROM allocation_arms
             WHERE scope = ?1 AND name = ?2",
        )?;

        // One ArmCounters per requested name, in request order. Names with
        // no stored row come back zeroed.
        let mut counters = Vec::with_capacity(names.len());
        for name in names {
            let result = stmt.query_row(params![scope, name], |row| {
                Ok(ArmCounters {
                    scope: row.get(0)?,
                    name: row.get(1)?,
                    impressions: row.get(2)?,
                    successes: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            });
            match result {
                Ok(arm) => counters.push(arm),
                Err(rusqlite::Error::QueryReturnedNoRows) => counters.push(ArmCounters {
                    scope: scope.to_string(),
                    name: (*name).to_string(),
                    impressions: 0,
                    successes: 0,
                    updated_at: String::new(),
                }),
                Err(err) => return Err(err.into()),
            }
        }
        Ok(counters)
    }

    fn record_impression(&self, scope: &str, name: &str) -> Result<(), DbError> {
        self.conn_ref().execute(
            "INSERT INTO allocation_arms (scope, name, impressions)
             VALUES (?1, ?2, 1)
             ON CONFLICT (scope, name) DO UPDATE SET
                impressions = impressions + 1,
                updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')",
            params![scope, name],
        )?;
        Ok(())
    }

    fn record_success(&self, scope: &str, name: &str) -> Result<(), DbError> {
        self.conn_ref().execute(
            "INSERT INTO allocation_arms (scope, name, successes)
             VALUES (?1, ?2, 1)
             ON CONFLICT (scope, name) DO UPDATE SET
                successes = successes + 1,
                updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')",
            params![scope, name],
        )?;
        Ok(())
    }
}
