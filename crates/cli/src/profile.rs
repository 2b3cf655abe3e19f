// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire and draft types for the user profile.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Server-owned user record. Local copies are cached mirrors, overwritten
/// wholesale on every successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Wire envelope: the profile endpoint nests the record under `user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileEnvelope {
    pub user: Profile,
}

/// Local editable mirror of the profile, plus the selected avatar file.
///
/// Draft fields are only overwritten by server data immediately after a
/// successful fetch; edits between fetches are never silently discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub username: String,
    pub email: String,
    /// Selected but not yet uploaded avatar image.
    pub avatar_path: Option<PathBuf>,
}

impl Draft {
    /// Overwrite the editable fields from server data. The selected avatar
    /// file survives a refresh.
    pub fn adopt(&mut self, profile: &Profile) {
        self.username = profile.username.clone();
        self.email = profile.email.clone();
    }
}

#[cfg(test)]
#[path = "profile_tests.rs"]
mod tests;
