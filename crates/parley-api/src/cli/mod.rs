//! CLI definitions for the `parley` binary.
//!
//! Uses clap derive macros. Secrets are not flags: the Gemini key and the
//! token signing secret come from the environment only.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// LLM chat proxy with per-session conversation memory.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Which deployment to run.
        #[arg(long, value_enum, default_value_t = Mode::Ephemeral)]
        mode: Mode,

        /// Port to listen on.
        #[arg(short, long, default_value = "8000", env = "PARLEY_PORT")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1", env = "PARLEY_HOST")]
        host: String,

        /// Optional TOML config file.
        #[arg(short, long, env = "PARLEY_CONFIG")]
        config: Option<PathBuf>,

        /// Overrides `database_url` from the config file.
        #[arg(long, env = "PARLEY_DATABASE_URL")]
        database_url: Option<String>,

        /// Overrides `model` from the config file.
        #[arg(long, env = "PARLEY_MODEL")]
        model: Option<String>,

        /// Alternate Gemini endpoint, e.g. a local proxy.
        #[arg(long, env = "GEMINI_BASE_URL", hide = true)]
        gemini_base_url: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Anonymous sessions held in memory.
    Ephemeral,
    /// Registered users, bearer tokens, SQLite storage.
    Persistent,
}
