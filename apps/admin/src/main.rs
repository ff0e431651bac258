mod api_client;
mod auth;
mod config;
mod console;
mod controller;
mod errors;
mod form;
mod models;
mod resume;
mod storage;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api_client::ApiClient;
use crate::auth::StaticCredentials;
use crate::config::Config;
use crate::controller::{AdminController, AuthState, NoticeLevel};
use crate::storage::FileSessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Logs go to stderr so they never interleave with the rendered views
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("portfolio_admin={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Portfolio Admin v{}", env!("CARGO_PKG_VERSION"));

    let api = ApiClient::new(
        config.api_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("Failed to build HTTP client")?;
    info!("API client initialized (base URL: {})", api.base_url());

    let store = FileSessionStore::new(&config.session_file);
    info!("Session file: {}", store.path().display());

    let auth = StaticCredentials::new(
        config.admin_username.clone(),
        config.admin_password.clone(),
    );

    let mut ctl = AdminController::new(Arc::new(api), Arc::new(auth), Arc::new(store));
    ctl.restore().await?;

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    write_out(&mut stdout, &ctl.render()).await?;
    write_out(&mut stdout, "Type 'help' for commands.").await?;

    loop {
        let prompt = match ctl.auth_state() {
            AuthState::LoggedOut => "admin (logged out)> ".to_string(),
            AuthState::LoggedIn => format!("admin:{}> ", ctl.category()),
        };
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let cmd = match console::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                write_out(&mut stdout, &e.to_string()).await?;
                continue;
            }
        };

        let outcome = console::execute(&mut ctl, cmd).await;

        for notice in ctl.take_notices() {
            let marker = match notice.level {
                NoticeLevel::Info => "✔",
                NoticeLevel::Error => "✖",
            };
            write_out(&mut stdout, &format!("{marker} {}", notice.message)).await?;
        }

        match outcome {
            Ok(outcome) => {
                if let Some(output) = outcome.output {
                    write_out(&mut stdout, &output).await?;
                }
                if outcome.quit {
                    break;
                }
            }
            Err(e) => write_out(&mut stdout, &format!("! {e}")).await?,
        }
    }

    info!("Portfolio Admin exiting");
    Ok(())
}

async fn write_out(stdout: &mut tokio::io::Stdout, text: &str) -> Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n").await?;
    }
    stdout.flush().await?;
    Ok(())
}
