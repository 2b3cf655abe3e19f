// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Profile synchronization: initial load, refresh-after-mutate, and the
//! mutation dispatch that drives both.
//!
//! The load and refresh paths share their fetch/install logic but differ
//! deliberately on failure: a failed initial load tears the session down
//! (credential cleared, blocking notice, no retry), while a failed refresh
//! after a mutation only logs. Mutations are independent operations, each
//! followed by its own refresh; nothing guards against overlapping
//! submissions, and the newest fetch response wins.

use std::path::PathBuf;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::client::ProfileClient;
use crate::credential::CredentialStore;
use crate::error::SyncError;
use crate::notice::{FailedOp, Notice};
use crate::profile::{Draft, Profile};

/// Owns the cached profile mirror and the pending edit state, and runs the
/// sync flows against the remote profile endpoint.
pub struct ProfileSync {
    client: ProfileClient,
    store: CredentialStore,
    notice_tx: broadcast::Sender<Notice>,
    profile: Option<Profile>,
    draft: Draft,
    /// Sequence number handed to the most recently issued fetch.
    fetch_seq: u64,
    /// Sequence number of the most recently installed response.
    installed_seq: u64,
}

impl ProfileSync {
    pub fn new(
        client: ProfileClient,
        store: CredentialStore,
        notice_tx: broadcast::Sender<Notice>,
    ) -> Self {
        Self {
            client,
            store,
            notice_tx,
            profile: None,
            draft: Draft::default(),
            fetch_seq: 0,
            installed_seq: 0,
        }
    }

    /// Last successfully fetched profile, if any.
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Current pending edit state.
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.draft.username = username.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.draft.email = email.into();
    }

    /// Select an avatar image for a later [`upload_avatar`](Self::upload_avatar).
    pub fn select_avatar(&mut self, path: PathBuf) {
        self.draft.avatar_path = Some(path);
    }

    /// Initial load. On success the server profile replaces the cached
    /// mirror and the draft. On failure the session is expired: the stored
    /// credential is cleared, the in-memory token dropped, and a blocking
    /// [`Notice::SessionExpired`] emitted — exactly once, with no retry.
    pub async fn activate(&mut self) -> Result<(), SyncError> {
        let seq = self.next_seq();
        match self.client.fetch_profile().await {
            Ok(profile) => {
                self.install(seq, profile);
                Ok(())
            }
            Err(e) => {
                warn!(err = %e, "initial profile load failed");
                self.expire_session();
                Err(SyncError::SessionExpired)
            }
        }
    }

    /// Re-fetch after a successful mutation. Failures are logged and
    /// otherwise swallowed; the session is not torn down here.
    pub async fn refresh(&mut self) {
        let seq = self.next_seq();
        match self.client.fetch_profile().await {
            Ok(profile) => self.install(seq, profile),
            Err(e) => warn!(err = %e, "profile refresh failed"),
        }
    }

    /// Submit the draft's display fields.
    ///
    /// On success the profile is re-fetched and [`Notice::FieldsUpdated`]
    /// emitted; the visible result comes from the refresh, never from the
    /// submitted values. On failure a single [`Notice::OperationFailed`] is
    /// emitted and nothing else changes.
    pub async fn submit_fields(&mut self) -> Result<(), SyncError> {
        let username = self.draft.username.clone();
        let email = self.draft.email.clone();
        match self.client.put_fields(&username, &email).await {
            Ok(()) => {
                self.refresh().await;
                self.notify(Notice::FieldsUpdated);
                Ok(())
            }
            Err(e) => {
                warn!(err = %e, "field update failed");
                self.notify(Notice::OperationFailed { op: FailedOp::FieldUpdate });
                Err(SyncError::OperationFailed(e))
            }
        }
    }

    /// Upload the selected avatar image.
    ///
    /// Fails fast with [`Notice::FileRequired`] — and zero remote calls —
    /// when nothing is selected.
    pub async fn upload_avatar(&mut self) -> Result<(), SyncError> {
        let Some(path) = self.draft.avatar_path.clone() else {
            self.notify(Notice::FileRequired);
            return Err(SyncError::OperationFailed(anyhow::anyhow!("no avatar file selected")));
        };

        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) => {
                warn!(path = %path.display(), err = %e, "cannot read avatar file");
                self.notify(Notice::OperationFailed { op: FailedOp::AvatarUpload });
                return Err(SyncError::OperationFailed(e.into()));
            }
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "avatar".to_owned());

        match self.client.put_avatar(&file_name, bytes).await {
            Ok(()) => {
                self.refresh().await;
                self.notify(Notice::AvatarUploaded);
                Ok(())
            }
            Err(e) => {
                warn!(err = %e, "avatar upload failed");
                self.notify(Notice::OperationFailed { op: FailedOp::AvatarUpload });
                Err(SyncError::OperationFailed(e))
            }
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.fetch_seq += 1;
        self.fetch_seq
    }

    /// Install a fetch response unless a newer one has already landed
    /// (latest request wins, by arrival order).
    fn install(&mut self, seq: u64, profile: Profile) {
        if seq <= self.installed_seq {
            debug!(seq, installed = self.installed_seq, "stale fetch response dropped");
            return;
        }
        self.installed_seq = seq;
        self.draft.adopt(&profile);
        self.profile = Some(profile);
    }

    /// Session-expiry side effects: clear the persisted credential, drop
    /// the in-memory token, surface the blocking notice.
    fn expire_session(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(err = %e, "failed to clear stored credential");
        }
        self.client.clear_token();
        self.notify(Notice::SessionExpired);
    }

    fn notify(&self, notice: Notice) {
        let _ = self.notice_tx.send(notice);
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
