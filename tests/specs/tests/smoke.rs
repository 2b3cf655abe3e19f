// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end smoke tests that spawn the real `persona` binary against a
//! fake profile API.

use std::sync::atomic::Ordering;

use persona_specs::{run_persona, start_fake_api};

#[tokio::test]
async fn login_then_show_prints_profile() -> anyhow::Result<()> {
    let api = start_fake_api(Some("smoke-tok")).await;
    let dir = tempfile::tempdir()?;

    let out = run_persona(&api.base_url(), dir.path(), &["login", "--token", "smoke-tok"]).await?;
    assert!(out.status.success(), "login failed: {}", String::from_utf8_lossy(&out.stderr));

    let out = run_persona(&api.base_url(), dir.path(), &["show"]).await?;
    assert!(out.status.success(), "show failed: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("alice"), "unexpected output: {stdout}");
    assert!(stdout.contains("a@x.com"), "unexpected output: {stdout}");
    Ok(())
}

#[tokio::test]
async fn show_without_login_reports_expired_session() -> anyhow::Result<()> {
    let api = start_fake_api(Some("smoke-tok")).await;
    let dir = tempfile::tempdir()?;

    let out = run_persona(&api.base_url(), dir.path(), &["show"]).await?;

    assert_eq!(out.status.code(), Some(3), "expiry should map to its own exit code");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Session expired."), "unexpected stderr: {stderr}");
    assert_eq!(api.state.get_count.load(Ordering::Relaxed), 1, "no retry");
    Ok(())
}

#[tokio::test]
async fn update_round_trips_through_refresh() -> anyhow::Result<()> {
    let api = start_fake_api(None).await;
    let dir = tempfile::tempdir()?;

    let out = run_persona(
        &api.base_url(),
        dir.path(),
        &["update", "--username", "bob", "--email", "b@x.com"],
    )
    .await?;

    assert!(out.status.success(), "update failed: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Profile updated."), "unexpected output: {stdout}");
    assert!(stdout.contains("bob"), "unexpected output: {stdout}");
    assert_eq!(api.state.put_count.load(Ordering::Relaxed), 1);
    assert_eq!(api.state.get_count.load(Ordering::Relaxed), 2, "initial load + one refresh");
    Ok(())
}

#[tokio::test]
async fn avatar_upload_round_trips() -> anyhow::Result<()> {
    let api = start_fake_api(None).await;
    let dir = tempfile::tempdir()?;
    let image = dir.path().join("pic.png");
    std::fs::write(&image, b"fake png bytes")?;

    let out = run_persona(
        &api.base_url(),
        dir.path(),
        &["avatar", image.to_str().unwrap_or("pic.png")],
    )
    .await?;

    assert!(out.status.success(), "avatar failed: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Avatar uploaded."), "unexpected output: {stdout}");
    assert!(stdout.contains("cdn.example"), "refreshed avatar URL should print: {stdout}");
    Ok(())
}
