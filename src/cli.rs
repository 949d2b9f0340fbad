// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `dagmanifest`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dagmanifest",
    version,
    about = "Convert a DAG workflow description into a scheduling-simulator manifest.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the workflow description (TOML, or JSON with a `.json` extension).
    #[arg(long, value_name = "PATH")]
    pub workflow: String,

    /// Fuse all jobs with this name; `NAME:MAXCORES` caps the aggregate.
    ///
    /// May be repeated. Added to any `groups` listed under `[convert]`.
    #[arg(long = "group", value_name = "TOKEN")]
    pub groups: Vec<String>,

    /// Default core cap for fused groups (0 = unlimited).
    #[arg(long, value_name = "N")]
    pub max_cores: Option<u64>,

    /// Keep linear chains of equal-core jobs as separate tasks.
    #[arg(long)]
    pub no_sequence_fusion: bool,

    /// Seconds added to each task's runtime to form `runtime_limit`.
    #[arg(long, value_name = "SECS")]
    pub runtime_buffer: Option<u64>,

    /// Write the manifest here instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub output: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DAGMANIFEST_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse, validate and convert, but print a summary instead of the manifest.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
