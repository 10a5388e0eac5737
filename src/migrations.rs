//! Schema migration framework.
//!
//! Numbered SQL migrations are embedded at compile time via `include_str!`.
//! Each migration runs exactly once, tracked by the `schema_version` table.
//! Databases written by a newer engine are refused rather than guessed at.

use rusqlite::Connection;

struct Migration {
    version: i32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("migrations/001_baseline.sql"),
}];

/// Create the `schema_version` table if it doesn't exist.
fn ensure_schema_version_table(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .map_err(|e| format!("Failed to create schema_version table: {}", e))
}

/// Return the highest applied migration version, or 0 if none.
fn current_version(conn: &Connection) -> Result<i32, String> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| format!("Failed to read schema version: {}", e))
}

/// Run all pending migrations.
///
/// Returns the number of migrations applied (0 if already up-to-date).
///
/// Forward-compat guard: if the database has a higher version than the
/// highest known migration, returns an error instead of touching the file.
pub fn run_migrations(conn: &Connection) -> Result<usize, String> {
    ensure_schema_version_table(conn)?;

    let current = current_version(conn)?;
    let max_known = MIGRATIONS.last().map(|m| m.version).unwrap_or(0);

    if current > max_known {
        return Err(format!(
            "Database schema version ({}) is newer than this engine supports ({}). \
             Update the service before opening this database.",
            current, max_known
        ));
    }

    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > current).collect();

    if pending.is_empty() {
        return Ok(0);
    }

    for migration in &pending {
        conn.execute_batch(migration.sql)
            .map_err(|e| format!("Migration v{} failed: {}", migration.version, e))?;

        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [migration.version],
        )
        .map_err(|e| format!("Failed to record migration v{}: {}", migration.version, e))?;

        log::info!("Applied migration v{}", migration.version);
    }

    Ok(pending.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn mem_db() -> Connection {
        Connection::open_in_memory().expect("in-memory db")
    }

    #[test]
    fn test_fresh_db_applies_baseline() {
        let conn = mem_db();
        let applied = run_migrations(&conn).expect("migrations should succeed");
        assert_eq!(applied, 1, "should apply exactly 1 migration (baseline)");

        let version = current_version(&conn).expect("version query");
        assert_eq!(version, 1);

        // Verify key tables exist by inserting into them
        conn.execute(
            "INSERT INTO rating_events (id, subject_id, rating, recorded_at)
             VALUES ('chk-1', 'couple-1', 4, '2026-01-05T08:00:00+00:00')",
            [],
        )
        .expect("rating_events should exist");

        conn.execute(
            "INSERT INTO candidates (id, subject_id, owner_id, shared, prompt, pinned,
             usage_count, created_at)
             VALUES ('cand-1', 'couple-1', 'user-1', 1, 'prompt', 0, 0,
             '2026-01-05T08:00:00+00:00')",
            [],
        )
        .expect("candidates should exist");

        conn.execute(
            "INSERT INTO allocation_arms (scope, name, impressions, successes)
             VALUES ('nudge_copy', 'warm', 0, 0)",
            [],
        )
        .expect("allocation_arms should exist");
    }

    #[test]
    fn test_second_run_is_noop() {
        let conn = mem_db();
        assert_eq!(run_migrations(&conn).expect("first run"), 1);
        assert_eq!(run_migrations(&conn).expect("second run"), 0);
    }

    #[test]
    fn test_refuses_newer_database() {
        let conn = mem_db();
        run_migrations(&conn).expect("baseline");
        conn.execute("INSERT INTO schema_version (version) VALUES (99)", [])
            .expect("simulate newer engine");

        let err = run_migrations(&conn).expect_err("must refuse");
        assert!(err.contains("newer"), "unexpected message: {err}");
    }

    #[test]
    fn test_rating_check_constraint() {
        let conn = mem_db();
        run_migrations(&conn).expect("baseline");

        let result = conn.execute(
            "INSERT INTO rating_events (id, subject_id, rating, recorded_at)
             VALUES ('chk-bad', 'couple-1', 9, '2026-01-05T08:00:00+00:00')",
            [],
        );
        assert!(result.is_err(), "rating 9 must violate the CHECK constraint");
    }

    #[test]
    fn test_arm_composite_key_rejects_duplicates() {
        let conn = mem_db();
        run_migrations(&conn).expect("baseline");

        conn.execute(
            "INSERT INTO allocation_arms (scope, name) VALUES ('nudge_copy', 'warm')",
            [],
        )
        .expect("first insert");
        let dup = conn.execute(
            "INSERT INTO allocation_arms (scope, name) VALUES ('nudge_copy', 'warm')",
            [],
        );
        assert!(dup.is_err(), "duplicate (scope, name) must be rejected");

        // Same name in another scope is a different arm
        conn.execute(
            "INSERT INTO allocation_arms (scope, name) VALUES ('reminder_tone', 'warm')",
            [],
        )
        .expect("other scope");
    }
}
