//! Interactive session screen
//!
//! The terminal counterpart of the single-screen flow: one action to
//! start a session, a free-text prompt for commands, and an output area
//! that always reflects the latest result or error.

use anyhow::Result;
use autoctl_core::{OperationResult, SessionClient};
use console::Style;
use dialoguer::{theme::ColorfulTheme, Input};

pub async fn run(client: SessionClient) -> Result<()> {
    let dim = Style::new().dim();

    println!(
        "{}",
        dim.apply_to(format!("Connected to {}", client.base_url()))
    );
    println!(
        "{}",
        dim.apply_to(":start begins a session, :quit leaves, anything else is sent as a command")
    );

    loop {
        // Closed input (EOF, detached terminal) ends the screen
        let line: String = match Input::with_theme(&ColorfulTheme::default())
            .with_prompt("command")
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(_) => break,
        };

        match line.trim() {
            ":quit" | ":q" => break,
            ":start" => start_session(&client).await,
            command => execute_command(&client, command).await,
        }
    }

    Ok(())
}

async fn start_session(client: &SessionClient) {
    match client.start_session().await {
        Ok(result) if result.ok => {
            status_line(true, "Session started successfully");
            print_output(&format!(
                "Session started: {}",
                result.body.as_deref().unwrap_or_default()
            ));
        }
        Ok(result) => {
            status_line(false, "Failed to start session");
            print_output(&format!("Error: {}", result.failure_reason()));
        }
        Err(err) => {
            status_line(false, &err.user_message());
        }
    }
}

async fn execute_command(client: &SessionClient, command: &str) {
    match client.execute_command(command).await {
        Ok(result) if result.ok => {
            print_output(&format!(
                "Command executed: {}",
                result.body.as_deref().unwrap_or_default()
            ));
        }
        Ok(result) => {
            print_output(&format!(
                "Error executing command: {}",
                result.failure_reason()
            ));
        }
        Err(err) => {
            // Precondition misuse: no session yet or an empty line
            status_line(false, &err.user_message());
        }
    }
}

/// Transient one-line notice, the toast of this interface
fn status_line(ok: bool, message: &str) {
    let style = if ok {
        Style::new().green()
    } else {
        Style::new().red()
    };
    eprintln!("{}", style.apply_to(message));
}

/// The persistent output area: the latest result, verbatim
fn print_output(text: &str) {
    println!("{}", text);
}

/// Shared result printer for the one-shot subcommands
pub fn print_result(result: &OperationResult) {
    if result.ok {
        print_output(result.body.as_deref().unwrap_or_default());
    } else {
        status_line(false, &result.failure_reason());
    }
}
