//! SQLite Database
//!
//! Embedded database for persistent storage using rusqlite with r2d2 connection pooling.
//! Holds mock interviews, append-only answer records and subscriptions.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use crate::models::{MockInterview, Plan, Subscription, SubscriptionStatus, UserAnswer};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::database_path;

/// Type alias for the connection pool
pub type DbPool = Pool<SqliteConnectionManager>;

/// Database service for managing SQLite operations
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

/// Timestamps are stored as fixed-precision RFC 3339 text so that string
/// order matches time order.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

impl Database {
    /// Create an in-memory database for testing.
    ///
    /// Uses an in-memory SQLite database with the same schema as the
    /// production database.
    pub fn new_in_memory() -> AppResult<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| AppError::database(format!("Failed to create connection pool: {}", e)))?;

        let db = Self { pool };
        db.init_schema()?;
        Ok(db)
    }

    /// Create a new database instance at the default location
    pub fn new() -> AppResult<Self> {
        Self::open(&database_path()?)
    }

    /// Open (or create) a database file with connection pooling
    pub fn open(db_path: &Path) -> AppResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(10)
            .build(manager)
            .map_err(|e| AppError::database(format!("Failed to create connection pool: {}", e)))?;

        let db = Self { pool };
        db.init_schema()?;

        Ok(db)
    }

    /// Initialize the database schema
    fn init_schema(&self) -> AppResult<()> {
        let conn = self.get_connection()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS mock_interviews (
                mock_id TEXT PRIMARY KEY,
                json_mock_resp TEXT NOT NULL,
                job_position TEXT NOT NULL,
                job_desc TEXT NOT NULL,
                job_experience INTEGER NOT NULL DEFAULT 0,
                interview_type TEXT NOT NULL DEFAULT 'technical',
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_mock_interviews_created_by
             ON mock_interviews(created_by)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS user_answers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                mock_id TEXT NOT NULL,
                question TEXT NOT NULL,
                correct_ans TEXT NOT NULL DEFAULT '',
                user_ans TEXT NOT NULL,
                rating TEXT NOT NULL,
                feedback TEXT NOT NULL,
                degraded INTEGER NOT NULL DEFAULT 0,
                user_email TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_user_answers_mock_id ON user_answers(mock_id)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS user_subscriptions (
                user_id TEXT PRIMARY KEY,
                plan TEXT NOT NULL DEFAULT 'free',
                status TEXT NOT NULL DEFAULT 'active',
                payment_id TEXT,
                order_id TEXT,
                start_date TEXT NOT NULL,
                end_date TEXT,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> AppResult<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| AppError::database(format!("Failed to get connection: {}", e)))
    }

    /// Check if the database is healthy
    pub fn is_healthy(&self) -> bool {
        if let Ok(conn) = self.pool.get() {
            conn.query_row("SELECT 1", [], |_| Ok(())).is_ok()
        } else {
            false
        }
    }

    // ========================================================================
    // Mock Interview Operations
    // ========================================================================

    /// Insert a new mock interview
    pub fn insert_mock_interview(&self, interview: &MockInterview) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO mock_interviews (mock_id, json_mock_resp, job_position, job_desc,
                                          job_experience, interview_type, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                interview.mock_id,
                interview.json_mock_resp,
                interview.job_position,
                interview.job_desc,
                interview.job_experience,
                interview.interview_type.to_string(),
                interview.created_by,
                format_timestamp(&interview.created_at),
            ],
        )?;
        Ok(())
    }

    /// Get a mock interview by its mock id
    pub fn get_mock_interview(&self, mock_id: &str) -> AppResult<Option<MockInterview>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT mock_id, json_mock_resp, job_position, job_desc, job_experience,
                    interview_type, created_by, created_at
             FROM mock_interviews WHERE mock_id = ?1",
            params![mock_id],
            Self::row_to_mock_interview,
        );

        match result {
            Ok(interview) => Ok(Some(interview)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    /// List a user's mock interviews, newest first
    pub fn list_mock_interviews_by_creator(&self, created_by: &str) -> AppResult<Vec<MockInterview>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT mock_id, json_mock_resp, job_position, job_desc, job_experience,
                    interview_type, created_by, created_at
             FROM mock_interviews
             WHERE created_by = ?1
             ORDER BY created_at DESC, rowid DESC",
        )?;

        let rows = stmt
            .query_map(params![created_by], Self::row_to_mock_interview)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Delete a mock interview together with its answers
    pub fn delete_mock_interview(&self, mock_id: &str) -> AppResult<()> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM user_answers WHERE mock_id = ?1", params![mock_id])?;
        tx.execute("DELETE FROM mock_interviews WHERE mock_id = ?1", params![mock_id])?;
        tx.commit()?;
        Ok(())
    }

    fn row_to_mock_interview(row: &rusqlite::Row) -> rusqlite::Result<MockInterview> {
        let interview_type: String = row.get(5)?;
        Ok(MockInterview {
            mock_id: row.get(0)?,
            json_mock_resp: row.get(1)?,
            job_position: row.get(2)?,
            job_desc: row.get(3)?,
            job_experience: row.get(4)?,
            interview_type: interview_type.parse().map_err(|e: String| {
                rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, e.into())
            })?,
            created_by: row.get(6)?,
            created_at: parse_timestamp(7, row.get(7)?)?,
        })
    }

    // ========================================================================
    // User Answer Operations
    // ========================================================================

    /// Append an answer record and return its row id
    pub fn insert_user_answer(&self, answer: &UserAnswer) -> AppResult<i64> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO user_answers (mock_id, question, correct_ans, user_ans, rating,
                                       feedback, degraded, user_email, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                answer.mock_id,
                answer.question,
                answer.correct_ans,
                answer.user_ans,
                answer.rating,
                answer.feedback,
                answer.degraded,
                answer.user_email,
                format_timestamp(&answer.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List the answers recorded for an interview, oldest first
    pub fn list_user_answers(&self, mock_id: &str) -> AppResult<Vec<UserAnswer>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, mock_id, question, correct_ans, user_ans, rating, feedback,
                    degraded, user_email, created_at
             FROM user_answers
             WHERE mock_id = ?1
             ORDER BY created_at ASC, id ASC",
        )?;

        let rows = stmt
            .query_map(params![mock_id], |row| {
                Ok(UserAnswer {
                    id: row.get(0)?,
                    mock_id: row.get(1)?,
                    question: row.get(2)?,
                    correct_ans: row.get(3)?,
                    user_ans: row.get(4)?,
                    rating: row.get(5)?,
                    feedback: row.get(6)?,
                    degraded: row.get(7)?,
                    user_email: row.get(8)?,
                    created_at: parse_timestamp(9, row.get(9)?)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Delete a single answer record
    pub fn delete_user_answer(&self, id: i64) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute("DELETE FROM user_answers WHERE id = ?1", params![id])?;
        Ok(())
    }

    // ========================================================================
    // Subscription Operations
    // ========================================================================

    /// Insert or replace a user's subscription
    pub fn upsert_subscription(&self, subscription: &Subscription) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO user_subscriptions (user_id, plan, status, payment_id, order_id,
                                             start_date, end_date, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(user_id) DO UPDATE SET
                plan = ?2, status = ?3, payment_id = ?4, order_id = ?5,
                start_date = ?6, end_date = ?7, updated_at = ?8",
            params![
                subscription.user_id,
                subscription.plan.as_str(),
                subscription.status.as_str(),
                subscription.payment_id,
                subscription.order_id,
                format_timestamp(&subscription.start_date),
                subscription.end_date.as_ref().map(format_timestamp),
                format_timestamp(&subscription.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Get a user's subscription record
    pub fn get_subscription(&self, user_id: &str) -> AppResult<Option<Subscription>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT user_id, plan, status, payment_id, order_id, start_date, end_date, updated_at
             FROM user_subscriptions WHERE user_id = ?1",
            params![user_id],
            |row| {
                let plan: String = row.get(1)?;
                let status: String = row.get(2)?;
                let end_date: Option<String> = row.get(6)?;
                Ok(Subscription {
                    user_id: row.get(0)?,
                    plan: Plan::parse(&plan),
                    status: SubscriptionStatus::parse(&status),
                    payment_id: row.get(3)?,
                    order_id: row.get(4)?,
                    start_date: parse_timestamp(5, row.get(5)?)?,
                    end_date: end_date.map(|d| parse_timestamp(6, d)).transpose()?,
                    updated_at: parse_timestamp(7, row.get(7)?)?,
                })
            },
        );

        match result {
            Ok(subscription) => Ok(Some(subscription)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("pool_size", &self.pool.state().connections)
            .finish()
    }
}
