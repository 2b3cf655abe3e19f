// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session credential persistence: a single bearer token in a JSON file
//! with atomic writes.
//!
//! The token is written by the login flow, read once at activation, and
//! cleared when the remote service rejects it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Persisted session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    pub token: String,
}

/// Resolve the state directory for persona data.
///
/// Checks `PERSONA_STATE_DIR`, then `$XDG_STATE_HOME/persona`,
/// then `$HOME/.local/state/persona`.
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PERSONA_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("persona");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local/state/persona");
    }
    PathBuf::from(".persona")
}

/// File-backed store for the session credential.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store rooted at the default state directory.
    pub fn open_default() -> Self {
        Self::new(state_dir())
    }

    fn path(&self) -> PathBuf {
        self.dir.join("session.json")
    }

    /// Read the stored token. A missing, unreadable, or empty credential is
    /// not an error: the caller simply proceeds unauthenticated.
    pub fn load(&self) -> Option<String> {
        let path = self.path();
        let data = match std::fs::read_to_string(&path) {
            Ok(d) => d,
            Err(e) => {
                debug!(path = %path.display(), "no stored session: {e}");
                return None;
            }
        };
        match serde_json::from_str::<PersistedSession>(&data) {
            Ok(session) if !session.token.is_empty() => Some(session.token),
            Ok(_) => None,
            Err(e) => {
                debug!(path = %path.display(), "unparseable session file: {e}");
                None
            }
        }
    }

    /// Save the token atomically (write tmp + rename), creating the state
    /// directory as needed.
    ///
    /// Uses a unique temp filename (PID + counter) to avoid corruption when
    /// concurrent saves race on the same `.tmp` file — a shorter write can
    /// leave trailing bytes from a longer previous write.
    pub fn save(&self, token: &str) -> anyhow::Result<()> {
        use std::sync::atomic::{AtomicU32, Ordering};
        static COUNTER: AtomicU32 = AtomicU32::new(0);

        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)?;
        }

        let json = serde_json::to_string_pretty(&PersistedSession { token: token.to_owned() })?;
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = self.path();
        let tmp_name = format!("session.json.{}.{}.tmp", std::process::id(), seq);
        let tmp_path = path.with_file_name(tmp_name);
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Remove the stored token. Idempotent: clearing an absent credential
    /// succeeds.
    pub fn clear(&self) -> anyhow::Result<()> {
        match std::fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "credential_tests.rs"]
mod tests;
