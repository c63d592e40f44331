//! Cookie persistence - save and load jars keyed by session id.
//!
//! A [`CookieStore`] holds one cookie list per session id. The jar snapshots
//! its whole list after every mutation, so stores only need whole-session
//! load and save.

use crate::base::neterror::NetError;
use crate::cookies::cookie::Cookie;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::OffsetDateTime;

/// Serializable representation of a cookie for persistence.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PersistentCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    /// Unix seconds; `None` for session cookies.
    pub expiry: Option<i64>,
    pub host: Option<String>,
    pub is_secure: bool,
}

impl From<&Cookie> for PersistentCookie {
    fn from(cookie: &Cookie) -> Self {
        Self {
            name: cookie.name().to_string(),
            value: cookie.value().to_string(),
            path: cookie.path().to_string(),
            expiry: cookie.expiry().map(|t| t.unix_timestamp()),
            host: cookie.host().map(str::to_string),
            is_secure: cookie.is_secure(),
        }
    }
}

impl PersistentCookie {
    pub fn into_cookie(self) -> Cookie {
        let expiry = self.expiry.and_then(|s| OffsetDateTime::from_unix_timestamp(s).ok());
        let mut cookie =
            Cookie::new(self.name, self.value, &self.path, expiry).with_secure(self.is_secure);
        if let Some(host) = &self.host {
            cookie.set_host(host);
        }
        cookie
    }
}

/// Backing storage for cookie jars.
pub trait CookieStore: Send + Sync {
    /// Cookies saved under `session`. An unknown session yields an empty list.
    fn load(&self, session: &str) -> Result<Vec<PersistentCookie>, NetError>;

    /// Replace everything saved under `session`.
    fn save(&self, session: &str, cookies: &[PersistentCookie]) -> Result<(), NetError>;
}

impl From<rusqlite::Error> for NetError {
    fn from(err: rusqlite::Error) -> Self {
        NetError::cookie_store(err)
    }
}

impl From<serde_json::Error> for NetError {
    fn from(err: serde_json::Error) -> Self {
        NetError::cookie_store(err)
    }
}

/// One `<session>.sess` JSON file per session inside a directory.
#[derive(Debug, Clone)]
pub struct JsonCookieStore {
    dir: PathBuf,
}

impl JsonCookieStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing `session`. Path separators in the id are replaced.
    pub fn session_file(&self, session: &str) -> PathBuf {
        let name: String =
            session.chars().map(|c| if c == '/' || c == '\\' { '_' } else { c }).collect();
        self.dir.join(format!("{}.sess", name))
    }
}

impl CookieStore for JsonCookieStore {
    fn load(&self, session: &str) -> Result<Vec<PersistentCookie>, NetError> {
        let path = self.session_file(session);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        Ok(serde_json::from_str(&json)?)
    }

    fn save(&self, session: &str, cookies: &[PersistentCookie]) -> Result<(), NetError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let path = self.session_file(session);
        let json = serde_json::to_string_pretty(cookies)?;
        fs::write(&path, json).map_err(|e| io_error(&path, e))
    }
}

fn io_error(path: &Path, err: std::io::Error) -> NetError {
    NetError::cookie_store(format!("{}: {}", path.display(), err))
}

/// All sessions in one SQLite database, one row per cookie.
pub struct SqliteCookieStore {
    conn: Mutex<Connection>,
}

impl SqliteCookieStore {
    /// Opens (or creates) the database at `path` and ensures the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, NetError> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, NetError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, NetError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS cookies (
                session TEXT NOT NULL,
                position INTEGER NOT NULL,
                name TEXT NOT NULL,
                value TEXT NOT NULL,
                path TEXT NOT NULL,
                expiry INTEGER,
                host TEXT,
                is_secure INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS cookies_session ON cookies (session);",
        )?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, NetError> {
        self.conn.lock().map_err(|_| NetError::cookie_store("connection lock poisoned"))
    }
}

impl std::fmt::Debug for SqliteCookieStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteCookieStore").finish_non_exhaustive()
    }
}

impl CookieStore for SqliteCookieStore {
    fn load(&self, session: &str) -> Result<Vec<PersistentCookie>, NetError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT name, value, path, expiry, host, is_secure
             FROM cookies WHERE session = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map([session], |row| {
            Ok(PersistentCookie {
                name: row.get(0)?,
                value: row.get(1)?,
                path: row.get(2)?,
                expiry: row.get(3)?,
                host: row.get(4)?,
                is_secure: row.get(5)?,
            })
        })?;

        let mut cookies = Vec::new();
        for row in rows {
            cookies.push(row?);
        }
        Ok(cookies)
    }

    fn save(&self, session: &str, cookies: &[PersistentCookie]) -> Result<(), NetError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM cookies WHERE session = ?1", [session])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO cookies (session, position, name, value, path, expiry, host, is_secure)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for (position, c) in cookies.iter().enumerate() {
                insert.execute(params![
                    session,
                    position as i64,
                    c.name,
                    c.value,
                    c.path,
                    c.expiry,
                    c.host,
                    c.is_secure
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    sessions: Mutex<HashMap<String, Vec<PersistentCookie>>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for MemoryCookieStore {
    fn load(&self, session: &str) -> Result<Vec<PersistentCookie>, NetError> {
        let sessions =
            self.sessions.lock().map_err(|_| NetError::cookie_store("session lock poisoned"))?;
        Ok(sessions.get(session).cloned().unwrap_or_default())
    }

    fn save(&self, session: &str, cookies: &[PersistentCookie]) -> Result<(), NetError> {
        let mut sessions =
            self.sessions.lock().map_err(|_| NetError::cookie_store("session lock poisoned"))?;
        sessions.insert(session.to_string(), cookies.to_vec());
        Ok(())
    }
}
