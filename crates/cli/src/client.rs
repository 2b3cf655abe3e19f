// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the remote profile endpoint.
//!
//! The bearer credential is injected per request through [`ProfileClient`];
//! there is no process-wide default header to mutate or forget to detach.

use std::sync::Once;
use std::time::Duration;

use reqwest::Client;

use crate::profile::{Profile, ProfileEnvelope};

static CRYPTO_INIT: Once = Once::new();

/// Install the ring crypto provider for reqwest/rustls.
/// Safe to call multiple times — only the first call has effect.
pub fn ensure_crypto() {
    CRYPTO_INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// HTTP client wrapper for the profile API.
pub struct ProfileClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl ProfileClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_default();
        Self { base_url: base_url.trim_end_matches('/').to_owned(), token, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Whether a bearer credential is currently held.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Drop the held credential. Subsequent requests go out unauthenticated.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// `GET /profile` — fetch the current user's profile.
    pub async fn fetch_profile(&self) -> anyhow::Result<Profile> {
        let req = self.client.get(self.url("/profile"));
        let resp = self.apply_auth(req).send().await?.error_for_status()?;
        let envelope: ProfileEnvelope = resp.json().await?;
        Ok(envelope.user)
    }

    /// `PUT /profile` — update display fields.
    ///
    /// The response body is ignored; callers re-fetch for the visible result.
    pub async fn put_fields(&self, username: &str, email: &str) -> anyhow::Result<()> {
        let body = serde_json::json!({ "user": { "username": username, "email": email } });
        let req = self.client.put(self.url("/profile")).json(&body);
        self.apply_auth(req).send().await?.error_for_status()?;
        Ok(())
    }

    /// `PUT /profile` — upload an avatar image as the `user[avatar]`
    /// multipart part. The server derives the content type from the file.
    pub async fn put_avatar(&self, file_name: &str, bytes: Vec<u8>) -> anyhow::Result<()> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_owned());
        let form = reqwest::multipart::Form::new().part("user[avatar]", part);
        let req = self.client.put(self.url("/profile")).multipart(form);
        self.apply_auth(req).send().await?.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
