// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

/// Failure kinds for profile sync operations.
///
/// There are exactly two: an expired session (initial load only) tears the
/// screen down, while a failed mutation or refresh is recovered locally.
/// Neither is retried.
#[derive(Debug)]
pub enum SyncError {
    /// The initial profile load was rejected. The stored credential has
    /// already been cleared by the time this is returned.
    SessionExpired,
    /// A mutation attempt failed; local state is unchanged.
    OperationFailed(anyhow::Error),
}

impl SyncError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::OperationFailed(_) => "OPERATION_FAILED",
        }
    }

    /// Process exit code for the CLI: expiry is distinguishable from an
    /// ordinary failed attempt so wrappers can route the user to login.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SessionExpired => 3,
            Self::OperationFailed(_) => 1,
        }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionExpired => f.write_str("session expired"),
            Self::OperationFailed(e) => write!(f, "operation failed: {e}"),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SessionExpired => None,
            Self::OperationFailed(e) => Some(e.as_ref()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
