// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing notices, decoupled from any display surface.
//!
//! The sync controller emits [`Notice`] values over a broadcast channel;
//! whatever front end is attached (here, the CLI) decides how to render
//! them. The core never blocks on a display.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Which mutation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedOp {
    FieldUpdate,
    AvatarUpload,
}

/// Notices emitted by the sync controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    /// The session credential was rejected on initial load and has been
    /// cleared. The user must log in again.
    SessionExpired,
    /// Display fields were accepted by the server.
    FieldsUpdated,
    /// The avatar image was accepted by the server.
    AvatarUploaded,
    /// An avatar upload was requested with no file selected.
    FileRequired,
    /// A mutation was rejected or never reached the server.
    OperationFailed { op: FailedOp },
}

impl Notice {
    /// True for notices a front end should surface as an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::FileRequired | Self::OperationFailed { .. })
    }
}

/// Create the notice channel.
pub fn channel() -> (broadcast::Sender<Notice>, broadcast::Receiver<Notice>) {
    broadcast::channel(16)
}

/// Terminal rendering of a notice.
pub fn render(notice: &Notice) -> &'static str {
    match notice {
        Notice::SessionExpired => "Session expired. Please log in again (persona login).",
        Notice::FieldsUpdated => "Profile updated.",
        Notice::AvatarUploaded => "Avatar uploaded.",
        Notice::FileRequired => "Select an image first.",
        Notice::OperationFailed { op: FailedOp::FieldUpdate } => "Update failed.",
        Notice::OperationFailed { op: FailedOp::AvatarUpload } => "Avatar upload failed.",
    }
}

#[cfg(test)]
#[path = "notice_tests.rs"]
mod tests;
