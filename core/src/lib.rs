//! autoctl core library
//!
//! Client-side plumbing for driving a remote automation session server:
//! session lifecycle, command submission, configuration, and the error
//! types shared with the CLI front end.

pub mod client;
pub mod config;
pub mod error;

pub use client::{OperationResult, SessionClient};
pub use config::{Config, ServerConfig};
pub use error::{ClientError, Result};
