// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI subcommand handlers. Each returns a process exit code.
//!
//! `login`/`logout` only touch the credential store; the rest activate the
//! sync controller, run one operation, and render the notices it emitted.

use tokio::sync::broadcast;

use crate::client::ProfileClient;
use crate::config::{AvatarArgs, Command, Config, LoginArgs, UpdateArgs};
use crate::notice::{self, Notice};
use crate::profile::Profile;
use crate::sync::ProfileSync;

/// Run the selected subcommand. Returns a process exit code.
pub async fn run(config: &Config) -> i32 {
    match &config.command {
        Command::Login(args) => cmd_login(config, args),
        Command::Logout => cmd_logout(config),
        Command::Show => cmd_show(config).await,
        Command::Update(args) => cmd_update(config, args).await,
        Command::Avatar(args) => cmd_avatar(config, args).await,
    }
}

fn cmd_login(config: &Config, args: &LoginArgs) -> i32 {
    let store = config.credential_store();
    match store.save(&args.token) {
        Ok(()) => {
            println!("Session token stored.");
            0
        }
        Err(e) => {
            eprintln!("error: {e}");
            1
        }
    }
}

fn cmd_logout(config: &Config) -> i32 {
    let store = config.credential_store();
    match store.clear() {
        Ok(()) => {
            println!("Session token cleared.");
            0
        }
        Err(e) => {
            eprintln!("error: {e}");
            1
        }
    }
}

async fn cmd_show(config: &Config) -> i32 {
    let (mut sync, mut rx) = build_sync(config);
    let code = match sync.activate().await {
        Ok(()) => {
            print_profile(sync.profile());
            0
        }
        Err(e) => e.exit_code(),
    };
    drain_notices(&mut rx);
    code
}

async fn cmd_update(config: &Config, args: &UpdateArgs) -> i32 {
    let (mut sync, mut rx) = build_sync(config);
    if let Err(e) = sync.activate().await {
        drain_notices(&mut rx);
        return e.exit_code();
    }
    if let Some(username) = &args.username {
        sync.set_username(username);
    }
    if let Some(email) = &args.email {
        sync.set_email(email);
    }
    let code = match sync.submit_fields().await {
        Ok(()) => {
            print_profile(sync.profile());
            0
        }
        Err(e) => e.exit_code(),
    };
    drain_notices(&mut rx);
    code
}

async fn cmd_avatar(config: &Config, args: &AvatarArgs) -> i32 {
    let (mut sync, mut rx) = build_sync(config);
    if let Err(e) = sync.activate().await {
        drain_notices(&mut rx);
        return e.exit_code();
    }
    sync.select_avatar(args.file.clone());
    let code = match sync.upload_avatar().await {
        Ok(()) => {
            print_profile(sync.profile());
            0
        }
        Err(e) => e.exit_code(),
    };
    drain_notices(&mut rx);
    code
}

fn build_sync(config: &Config) -> (ProfileSync, broadcast::Receiver<Notice>) {
    let store = config.credential_store();
    let token = store.load();
    let base = config.api_base().unwrap_or_default();
    let client = ProfileClient::new(&base, token, config.timeout());
    let (tx, rx) = notice::channel();
    (ProfileSync::new(client, store, tx), rx)
}

fn print_profile(profile: Option<&Profile>) {
    let Some(profile) = profile else { return };
    println!("{:<10} {}", "username", profile.username);
    println!("{:<10} {}", "email", profile.email);
    if let Some(url) = &profile.avatar_url {
        println!("{:<10} {url}", "avatar");
    }
}

fn drain_notices(rx: &mut broadcast::Receiver<Notice>) {
    while let Ok(n) = rx.try_recv() {
        if n.is_error() {
            eprintln!("{}", notice::render(&n));
        } else {
            println!("{}", notice::render(&n));
        }
    }
}
