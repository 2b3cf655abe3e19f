// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::credential::CredentialStore;

/// Profile client for a remote account service.
#[derive(Debug, Parser)]
#[command(name = "persona", version, about)]
pub struct Config {
    /// Base URL of the profile API.
    #[arg(long, env = "PERSONA_API_URL")]
    pub api_url: Option<String>,

    /// Directory for persisted session state.
    #[arg(long, env = "PERSONA_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// HTTP request timeout in seconds.
    #[arg(long, env = "PERSONA_TIMEOUT_SECS", default_value = "10")]
    pub timeout_secs: u64,

    /// Log format (json or text).
    #[arg(long, env = "PERSONA_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "PERSONA_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a session token obtained from the login flow.
    Login(LoginArgs),
    /// Clear the stored session token.
    Logout,
    /// Load and display the current profile.
    Show,
    /// Edit display fields and submit them.
    Update(UpdateArgs),
    /// Upload an avatar image.
    Avatar(AvatarArgs),
}

impl Command {
    /// Whether this subcommand talks to the remote API.
    pub fn needs_api(&self) -> bool {
        matches!(self, Self::Show | Self::Update(_) | Self::Avatar(_))
    }
}

#[derive(Debug, clap::Args)]
pub struct LoginArgs {
    /// Bearer token for the profile API.
    #[arg(long, env = "PERSONA_TOKEN")]
    pub token: String,
}

#[derive(Debug, clap::Args)]
pub struct UpdateArgs {
    /// New username. Omit to keep the current value.
    #[arg(long)]
    pub username: Option<String>,
    /// New email. Omit to keep the current value.
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Debug, clap::Args)]
pub struct AvatarArgs {
    /// Image file to upload.
    pub file: PathBuf,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(url) = &self.api_url {
            let url = url.trim();
            if url.is_empty() {
                anyhow::bail!("--api-url must not be empty");
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("--api-url must start with http:// or https://");
            }
        } else if self.command.needs_api() {
            anyhow::bail!("--api-url (or PERSONA_API_URL) is required for this command");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("--timeout-secs must be positive");
        }
        Ok(())
    }

    /// API base URL with any trailing slash removed.
    pub fn api_base(&self) -> Option<String> {
        self.api_url.as_deref().map(|u| u.trim().trim_end_matches('/').to_owned())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Credential store rooted at `--state-dir` or the default state
    /// directory.
    pub fn credential_store(&self) -> CredentialStore {
        match &self.state_dir {
            Some(dir) => CredentialStore::new(dir.clone()),
            None => CredentialStore::open_default(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
