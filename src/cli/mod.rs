//! CLI argument parsing using clap 4.x derive macros

use clap::{Parser, Subcommand};

/// Terminal client for a remote automation session server
///
/// Starts automation sessions and submits free-text commands over HTTP,
/// printing the server's response verbatim.
#[derive(Parser, Debug)]
#[command(name = "autoctl")]
#[command(author, about, long_about = None)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), "-", env!("GIT_HASH")))]
#[command(propagate_version = true)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server base URL (overrides the configuration file)
    #[arg(short, long)]
    pub server: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a new automation session and print the issued session id
    Start,

    /// Submit a single command to the server
    Exec {
        /// The command to submit
        command: String,

        /// Reuse an existing session id instead of starting a new session
        #[arg(long)]
        session: Option<String>,
    },

    /// Start the interactive session screen (default)
    Interactive,
}
