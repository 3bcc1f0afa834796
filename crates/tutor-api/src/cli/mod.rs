//! CLI command definitions for the `tutor` binary.
//!
//! Uses clap derive macros for argument parsing. Tutor commands run the same
//! pipeline as the REST API; `serve` starts the API itself.

pub mod analyze;
pub mod ask;
pub mod chat;
pub mod curriculum;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Socratic AI math tutor for Arabic-speaking students.
#[derive(Parser)]
#[command(name = "tutor", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, global = true, env = "TUTOR_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to `server.port` in tutor.toml).
        #[arg(long, short)]
        port: Option<u16>,

        /// Host to bind to (defaults to `server.host` in tutor.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// Ask the tutor a single question.
    Ask {
        /// The student's message.
        message: String,

        /// Grade level (1-12).
        #[arg(long, short, default_value = "1")]
        grade: i32,
    },

    /// Get one hint for a problem without the answer.
    Hint {
        /// The problem text.
        problem: String,

        /// Grade level (1-12).
        #[arg(long, short, default_value = "1")]
        grade: i32,
    },

    /// Interactive tutoring session.
    Chat {
        /// Grade level (1-12).
        #[arg(long, short, default_value = "1")]
        grade: i32,
    },

    /// Extract a math problem from a photo.
    #[command(name = "analyze-image")]
    AnalyzeImage {
        /// Path to a PNG, JPEG, WebP or GIF image.
        path: PathBuf,

        /// Override the media type guessed from the file extension.
        #[arg(long)]
        media_type: Option<String>,
    },

    /// Import lessons from a JSON array file.
    Import {
        /// Path to the lessons JSON file.
        path: PathBuf,
    },

    /// Search curriculum content.
    Search {
        /// Search query.
        query: String,

        /// Restrict to one grade level.
        #[arg(long, short)]
        grade: Option<i32>,

        /// Maximum results.
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
