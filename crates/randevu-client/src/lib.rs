//! randevu command-line interface.
//!
//! This crate provides the `randevu` binary: configuration loading, secret
//! references and the subcommands that drive the schedule pipeline.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod secret;

pub use cli::Cli;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
