// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test harness for end-to-end binary smoke tests.
//!
//! Starts a fake profile API in-process and drives the real `persona`
//! binary against it. The binary is expected at `target/debug/persona`
//! (build the workspace before running these).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;

use persona::profile::{Profile, ProfileEnvelope};

/// Resolve the path to the compiled `persona` binary.
pub fn persona_binary() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    // tests/specs → tests → workspace root
    let workspace = manifest.parent().and_then(|p| p.parent()).unwrap_or(manifest);
    workspace.join("target").join("debug").join("persona")
}

/// Run the binary with the fake API and a private state dir, capturing output.
pub async fn run_persona(
    api_url: &str,
    state_dir: &Path,
    args: &[&str],
) -> anyhow::Result<std::process::Output> {
    let output = tokio::process::Command::new(persona_binary())
        .env("PERSONA_API_URL", api_url)
        .env("PERSONA_STATE_DIR", state_dir)
        .args(args)
        .output()
        .await?;
    Ok(output)
}

/// Shared state of the fake profile API.
pub struct FakeState {
    /// When set, `GET /profile` rejects requests without this bearer token.
    pub required_token: Option<String>,
    pub profile: Mutex<Profile>,
    pub get_count: AtomicU32,
    pub put_count: AtomicU32,
}

/// A fake profile API bound to a loopback port.
pub struct FakeProfileApi {
    pub addr: SocketAddr,
    pub state: Arc<FakeState>,
}

impl FakeProfileApi {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Start the fake API. `required_token` of `None` accepts any caller.
pub async fn start_fake_api(required_token: Option<&str>) -> FakeProfileApi {
    let state = Arc::new(FakeState {
        required_token: required_token.map(str::to_owned),
        profile: Mutex::new(Profile {
            username: "alice".to_owned(),
            email: "a@x.com".to_owned(),
            avatar_url: None,
        }),
        get_count: AtomicU32::new(0),
        put_count: AtomicU32::new(0),
    });

    let app = Router::new()
        .route("/profile", get(get_profile).put(put_profile))
        .with_state(Arc::clone(&state));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    FakeProfileApi { addr, state }
}

fn authorized(state: &FakeState, headers: &HeaderMap) -> bool {
    let Some(required) = &state.required_token else {
        return true;
    };
    headers.get("authorization").and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {required}").as_str())
}

async fn get_profile(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
) -> Result<Json<ProfileEnvelope>, StatusCode> {
    state.get_count.fetch_add(1, Ordering::Relaxed);
    if !authorized(&state, &headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let profile = state.profile.lock().expect("profile lock").clone();
    Ok(Json(ProfileEnvelope { user: profile }))
}

async fn put_profile(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ProfileEnvelope>, StatusCode> {
    state.put_count.fetch_add(1, Ordering::Relaxed);
    if !authorized(&state, &headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let content_type =
        headers.get("content-type").and_then(|v| v.to_str().ok()).unwrap_or_default();
    if content_type.starts_with("application/json") {
        let value: serde_json::Value =
            serde_json::from_slice(&body).map_err(|_| StatusCode::BAD_REQUEST)?;
        let mut profile = state.profile.lock().expect("profile lock");
        if let Some(username) = value.pointer("/user/username").and_then(|v| v.as_str()) {
            profile.username = username.to_owned();
        }
        if let Some(email) = value.pointer("/user/email").and_then(|v| v.as_str()) {
            profile.email = email.to_owned();
        }
    } else if content_type.starts_with("multipart/form-data") {
        let mut profile = state.profile.lock().expect("profile lock");
        profile.avatar_url = Some("https://cdn.example/avatars/e2e.png".to_owned());
    }

    let profile = state.profile.lock().expect("profile lock").clone();
    Ok(Json(ProfileEnvelope { user: profile }))
}
