//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use randevu_core::Language;

/// randevu - a clinic calendar with patient names hidden
#[derive(Debug, Parser)]
#[command(name = "randevu")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, global = true, env = "RANDEVU_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the public schedule as JSON
    Schedule {
        /// First civil day to compute (defaults to today)
        #[arg(long, value_name = "YYYY-MM-DD")]
        from: Option<NaiveDate>,

        /// Number of days to compute
        #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=62))]
        days: u32,

        /// Read events from an exported JSON file instead of Google Calendar
        #[arg(long, value_name = "PATH")]
        events_file: Option<PathBuf>,

        /// Language of generated titles (overrides the config)
        #[arg(long, value_name = "tr|en")]
        lang: Option<Language>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show how a single event title is classified
    Classify {
        /// Event title as written in the calendar
        title: String,

        /// Upstream color id
        #[arg(long)]
        color: Option<String>,

        /// Event duration in minutes
        #[arg(long)]
        minutes: Option<i64>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Dump,
    /// Validate the configuration
    Validate,
    /// Show the configuration file path
    Path,
}
