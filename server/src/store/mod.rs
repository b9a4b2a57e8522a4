
use std::{fs, path::Path, sync::Mutex};

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

/// Outcome of a score submission under the upsert-best-only policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    /// No row existed for the name; one was inserted.
    Inserted,
    /// A row existed with a lower score; it was overwritten.
    Updated,
    /// A row existed with an equal or higher score; nothing changed.
    KeptBest,
}

impl SubmitAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitAction::Inserted => "inserted",
            SubmitAction::Updated => "updated",
            SubmitAction::KeptBest => "kept_best",
        }
    }
}

/// One leaderboard entry. `created_at` is unix seconds of the first
/// submission under this name; score updates do not touch it, so ties
/// rank by who reached the score lineage first.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRow {
    pub name: String,
    pub score: i64,
    pub created_at: i64,
}

/// SQLite-backed leaderboard store. One row per display name; the stored
/// score only ever increases (upsert-best-only).
pub struct ScoreStore {
    conn: Mutex<Connection>,
}

impl ScoreStore {
    /// Open (or create) the SQLite database under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, String> {
        fs::create_dir_all(data_dir)
            .map_err(|e| format!("failed to create data dir {}: {e}", data_dir.display()))?;

        let db_path = data_dir.join("scores.db");
        let conn = Connection::open(&db_path)
            .map_err(|e| format!("failed to open SQLite at {}: {e}", db_path.display()))?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=5000;
             PRAGMA synchronous=NORMAL;",
        )
        .map_err(|e| format!("failed to set pragmas: {e}"))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS scores (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                name       TEXT NOT NULL UNIQUE,
                score      INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_scores_rank
                ON scores(score DESC, created_at ASC);",
        )
        .map_err(|e| format!("failed to create schema: {e}"))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Record `score` for `name` at time `now` (unix seconds).
    ///
    /// Insert when the name is new; overwrite only a strictly lower stored
    /// score. `created_at` is written once on insert and never updated.
    pub fn submit(&self, name: &str, score: i64, now: i64) -> Result<SubmitAction, String> {
        let conn = self.conn.lock().unwrap();

        let existing: Option<(i64, i64)> = conn
            .query_row(
                "SELECT id, score FROM scores WHERE name = ?1",
                params![name],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| format!("score lookup failed: {e}"))?;

        match existing {
            None => {
                conn.execute(
                    "INSERT INTO scores (name, score, created_at) VALUES (?1, ?2, ?3)",
                    params![name, score, now],
                )
                .map_err(|e| format!("score insert failed: {e}"))?;
                Ok(SubmitAction::Inserted)
            }
            Some((id, best)) if score > best => {
                conn.execute(
                    "UPDATE scores SET score = ?1 WHERE id = ?2",
                    params![score, id],
                )
                .map_err(|e| format!("score update failed: {e}"))?;
                Ok(SubmitAction::Updated)
            }
            Some(_) => Ok(SubmitAction::KeptBest),
        }
    }

    /// The top `limit` rows, best score first. Ties rank by earliest
    /// `created_at`, then lowest row id for a stable order.
    pub fn top(&self, limit: usize) -> Result<Vec<ScoreRow>, String> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT name, score, created_at FROM scores
                 ORDER BY score DESC, created_at ASC, id ASC
                 LIMIT ?1",
            )
            .map_err(|e| format!("leaderboard query failed: {e}"))?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok(ScoreRow {
                    name: row.get(0)?,
                    score: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })
            .map_err(|e| format!("leaderboard query failed: {e}"))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("leaderboard row decode failed: {e}"))?;

        Ok(rows)
    }

    pub fn count(&self) -> Result<usize, String> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM scores", [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|n| n as usize)
        .map_err(|e| format!("score count failed: {e}"))
    }
}
