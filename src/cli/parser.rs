//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::core::SyntaxMode;
use crate::error::Result;
use crate::segment::{DecodeFailurePolicy, SegmenterConfig, WhitespacePolicy};
use crate::stream::{DEFAULT_CHUNK_DELAY_MS, DEFAULT_INITIAL_DELAY_MS};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// stream-gen: incremental entity extraction for streamed chat replies.
///
/// Splits markup-annotated model output into prose and structured
/// entities (contacts, calendar events) while the reply is still arriving.
#[derive(Parser, Debug)]
#[command(name = "stream-gen")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json, ndjson).
    #[arg(long, default_value = "text", global = true, env = "STREAM_GEN_FORMAT")]
    pub format: String,

    /// Marker syntax family (tag, delimiter, fenced).
    #[arg(
        short,
        long,
        default_value = "tag",
        global = true,
        env = "STREAM_GEN_SYNTAX"
    )]
    pub syntax: String,

    /// Omit text segments that are only whitespace.
    #[arg(long, global = true)]
    pub drop_blank: bool,

    /// What to do with markers whose payload does not decode (fallback, drop).
    #[arg(
        long,
        default_value = "fallback",
        global = true,
        env = "STREAM_GEN_ON_DECODE_ERROR"
    )]
    pub on_decode_error: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Segment a transcript file (or stdin).
    ///
    /// The input is treated as a finished stream unless `--streaming` is
    /// given, in which case a trailing open marker stays hidden.
    Segment {
        /// Path to the transcript (stdin if omitted or `-`).
        file: Option<PathBuf>,

        /// Treat the input as a stream that may still grow.
        #[arg(long)]
        streaming: bool,
    },

    /// Stream a canned reply through a session, showing every snapshot.
    Simulate {
        #[command(flatten)]
        source: ReplySource,

        /// Sleep between chunks like a real stream.
        #[arg(long)]
        realtime: bool,

        /// Delay before the first chunk, in milliseconds.
        #[arg(long, default_value_t = DEFAULT_INITIAL_DELAY_MS)]
        initial_delay_ms: u64,

        /// Delay between chunks, in milliseconds.
        #[arg(long, default_value_t = DEFAULT_CHUNK_DELAY_MS)]
        chunk_delay_ms: u64,

        /// Only print the final result.
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print a canned reply as data-stream wire lines.
    Wire {
        #[command(flatten)]
        source: ReplySource,
    },

    /// Parse data-stream wire lines from a file (or stdin).
    Replay {
        /// Path to the wire lines (stdin if omitted or `-`).
        file: Option<PathBuf>,
    },

    /// List the reply presets and the keywords that select them.
    Presets,
}

/// Which canned reply to use.
#[derive(Args, Debug, Clone, Default)]
pub struct ReplySource {
    /// User message; the preset is picked from its keywords.
    #[arg(short, long, conflicts_with = "preset")]
    pub message: Option<String>,

    /// Preset name (contact, calendar, both, text, multi).
    #[arg(short, long)]
    pub preset: Option<String>,
}

impl Cli {
    /// Returns the selected syntax family.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unknown names.
    pub fn syntax_mode(&self) -> Result<SyntaxMode> {
        SyntaxMode::parse(&self.syntax)
    }

    /// Builds the segmenter configuration from the global flags.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown decode failure policy.
    pub fn segmenter_config(&self) -> Result<SegmenterConfig> {
        let whitespace = if self.drop_blank {
            WhitespacePolicy::DropBlank
        } else {
            WhitespacePolicy::Keep
        };
        Ok(SegmenterConfig::new()
            .with_whitespace(whitespace)
            .with_decode_failure(DecodeFailurePolicy::parse(&self.on_decode_error)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::try_parse_from([
            "stream-gen",
            "segment",
            "--syntax",
            "fenced",
            "--drop-blank",
            "--on-decode-error",
            "drop",
            "reply.txt",
        ])
        .unwrap();
        assert_eq!(cli.syntax_mode().unwrap(), SyntaxMode::Fenced);
        let config = cli.segmenter_config().unwrap();
        assert_eq!(config.whitespace, WhitespacePolicy::DropBlank);
        assert_eq!(config.on_decode_error, DecodeFailurePolicy::Drop);
        assert!(matches!(
            cli.command,
            Commands::Segment { streaming: false, file: Some(_) }
        ));
    }

    #[test]
    fn test_message_conflicts_with_preset() {
        let result = Cli::try_parse_from([
            "stream-gen",
            "wire",
            "--message",
            "hi",
            "--preset",
            "text",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_syntax_name() {
        let cli = Cli::try_parse_from(["stream-gen", "--syntax", "yaml", "presets"]).unwrap();
        assert!(cli.syntax_mode().is_err());
    }
}
