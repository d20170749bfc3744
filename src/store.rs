use std::fs;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    event::{is_sorted, ReplayEvent},
    session::{Device, Session},
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Unknown device in store: {0}")]
    InvalidDevice(String),

    #[error("Session {id} has an unrepresentable duration: {value}")]
    InvalidDuration { id: String, value: String },
}

/// Read a JSON array of sessions. Unsorted event logs are kept as-is.
pub fn load_sessions_json<P: AsRef<Path>>(path: P) -> Result<Vec<Session>, SessionError> {
    let bytes = fs::read(path.as_ref())?;
    let sessions: Vec<Session> = serde_json::from_slice(&bytes)?;
    for s in sessions.iter().filter(|s| !is_sorted(&s.events)) {
        warn!(session = %s.id, "events are not sorted by timestamp; playback may skip events");
    }
    debug!(count = sessions.len(), path = %path.as_ref().display(), "loaded sessions");
    Ok(sessions)
}

pub fn save_sessions_json<P: AsRef<Path>>(path: P, sessions: &[Session]) -> Result<(), SessionError> {
    ensure_parent(path.as_ref())?;
    let data = serde_json::to_vec_pretty(sessions)?;
    fs::write(path, data)?;
    Ok(())
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// SQLite-backed session list
#[derive(Debug)]
pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        ensure_parent(path.as_ref())?;
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, SessionError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, SessionError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                device TEXT NOT NULL,
                browser TEXT NOT NULL,
                duration_secs INTEGER NOT NULL,
                start_time TEXT NOT NULL,
                events TEXT NOT NULL,
                conversion_success BOOLEAN NOT NULL,
                landing_page TEXT NOT NULL,
                exit_page TEXT NOT NULL,
                content_snapshot TEXT
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_sessions_start_time ON sessions(start_time)",
            [],
        )?;

        Ok(Self { conn })
    }

    /// Insert or replace by id
    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        insert_session(&self.conn, session)
    }

    pub fn save_all(&mut self, sessions: &[Session]) -> Result<(), SessionError> {
        let tx = self.conn.transaction()?;
        for s in sessions {
            insert_session(&tx, s)?;
        }
        tx.commit()?;
        debug!(count = sessions.len(), "stored sessions");
        Ok(())
    }

    /// All sessions, oldest first
    pub fn list(&self) -> Result<Vec<Session>, SessionError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, user_id, device, browser, duration_secs, start_time, events,
                   conversion_success, landing_page, exit_page, content_snapshot
            FROM sessions
            ORDER BY start_time ASC, id ASC
            "#,
        )?;
        let rows = stmt.query_map([], StoredRow::from_row)?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?.into_session()?);
        }
        Ok(sessions)
    }

    pub fn get(&self, id: &str) -> Result<Session, SessionError> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT id, user_id, device, browser, duration_secs, start_time, events,
                       conversion_success, landing_page, exit_page, content_snapshot
                FROM sessions WHERE id = ?1
                "#,
                params![id],
                StoredRow::from_row,
            )
            .optional()?;

        match row {
            Some(row) => row.into_session(),
            None => Err(SessionError::NotFound(id.to_string())),
        }
    }

    pub fn count(&self) -> Result<usize, SessionError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

fn insert_session(conn: &Connection, session: &Session) -> Result<(), SessionError> {
    let events = serde_json::to_string(&session.events)?;
    let duration_secs =
        i64::try_from(session.duration_secs).map_err(|_| SessionError::InvalidDuration {
            id: session.id.clone(),
            value: session.duration_secs.to_string(),
        })?;
    conn.execute(
        r#"
        INSERT OR REPLACE INTO sessions
        (id, user_id, device, browser, duration_secs, start_time, events,
         conversion_success, landing_page, exit_page, content_snapshot)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
        params![
            session.id,
            session.user_id,
            session.device.to_string(),
            session.browser,
            duration_secs,
            session.start_time,
            events,
            session.conversion_success,
            session.landing_page,
            session.exit_page,
            session.content_snapshot,
        ],
    )?;
    Ok(())
}

/// Raw column values before the event log and device are decoded
struct StoredRow {
    id: String,
    user_id: String,
    device: String,
    browser: String,
    duration_secs: i64,
    start_time: String,
    events: String,
    conversion_success: bool,
    landing_page: String,
    exit_page: String,
    content_snapshot: Option<String>,
}

impl StoredRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            device: row.get(2)?,
            browser: row.get(3)?,
            duration_secs: row.get(4)?,
            start_time: row.get(5)?,
            events: row.get(6)?,
            conversion_success: row.get(7)?,
            landing_page: row.get(8)?,
            exit_page: row.get(9)?,
            content_snapshot: row.get(10)?,
        })
    }

    fn into_session(self) -> Result<Session, SessionError> {
        let device = Device::ALL
            .into_iter()
            .find(|d| d.to_string() == self.device)
            .ok_or_else(|| SessionError::InvalidDevice(self.device.clone()))?;
        let events: Vec<ReplayEvent> = serde_json::from_str(&self.events)?;
        let duration_secs =
            u64::try_from(self.duration_secs).map_err(|_| SessionError::InvalidDuration {
                id: self.id.clone(),
                value: self.duration_secs.to_string(),
            })?;

        Ok(Session {
            id: self.id,
            user_id: self.user_id,
            device,
            browser: self.browser,
            duration_secs,
            start_time: self.start_time,
            events,
            conversion_success: self.conversion_success,
            landing_page: self.landing_page,
            exit_page: self.exit_page,
            content_snapshot: self.content_snapshot,
        })
    }
}
