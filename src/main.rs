//! `autoctl` - terminal client for a remote automation session server
//!
//! This binary wraps the session client in a small CLI: start a session,
//! submit commands one-shot, or drive the server from an interactive
//! prompt.

use anyhow::{bail, Context, Result};
use clap::Parser;
use console::Style;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use autoctl_core::config::Config;
use autoctl_core::SessionClient;

mod cli;
mod terminal;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(server) = &cli.server {
        config.server.base_url = server.clone();
    }
    tracing::debug!(base_url = %config.server.base_url, "configuration loaded");

    let client = SessionClient::new(&config.server)?;

    match cli.command {
        Some(Commands::Start) => {
            let result = client.start_session().await?;
            if !result.ok {
                bail!("failed to start session: {}", result.failure_reason());
            }
            terminal::print_result(&result);
            let blue = Style::new().blue();
            println!(
                "{} {}",
                blue.apply_to("session id:"),
                client.session_id().unwrap_or_default()
            );
        }

        Some(Commands::Exec { command, session }) => {
            match session {
                Some(id) => client.set_session_id(id),
                None => {
                    let result = client.start_session().await?;
                    if !result.ok {
                        bail!("failed to start session: {}", result.failure_reason());
                    }
                }
            }

            let result = client
                .execute_command(&command)
                .await
                .map_err(|err| anyhow::anyhow!(err.user_message()))?;
            terminal::print_result(&result);
            if !result.ok {
                std::process::exit(1);
            }
        }

        Some(Commands::Interactive) | None => {
            terminal::run(client).await?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
