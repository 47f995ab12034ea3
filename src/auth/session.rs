//! Session token storage.
//!
//! A session is only ever created from a successful login response that
//! carried a token. The token is always held in memory for the lifetime of
//! the process; when the user opted into "remember me" it is additionally
//! persisted to `session.json` in the cache directory with a 7-day expiry.
//! A login without "remember me" removes any previously remembered file,
//! so a stale remembered session never outlives an explicit opt-out.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Session file name in the cache directory.
pub const SESSION_FILE: &str = "session.json";

/// Remembered sessions expire after 7 days.
const REMEMBER_EXPIRY_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub identifier: String,
    pub persistent: bool,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn is_expired(&self) -> bool {
        let expiry = self.created_at + Duration::days(REMEMBER_EXPIRY_DAYS);
        Utc::now() > expiry
    }
}

pub struct Session {
    cache_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            data: None,
        }
    }

    /// Load a remembered session from disk. Returns true when a live
    /// session was restored; expired files are removed.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read session file")?;
            let data: SessionData =
                serde_json::from_str(&contents).context("Failed to parse session file")?;

            if data.is_expired() {
                std::fs::remove_file(&path)?;
            } else {
                self.data = Some(data);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Establish a session from a successful login. The token is always
    /// kept in memory; the on-disk copy is written only for persistent
    /// sessions and removed otherwise.
    pub fn establish(&mut self, data: SessionData) -> Result<()> {
        let persistent = data.persistent;
        self.data = Some(data);
        if persistent {
            self.save()
        } else {
            self.remove_remembered()
        }
    }

    /// Save the current session to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Clear the in-memory session and any remembered file.
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        self.remove_remembered()
    }

    /// Get the session token, if any.
    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.token.as_str())
    }

    /// Check whether a live session is held.
    pub fn is_valid(&self) -> bool {
        self.data.as_ref().map(|d| !d.is_expired()).unwrap_or(false)
    }

    fn remove_remembered(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}
