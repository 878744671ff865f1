//! CLI layer for stream-gen.
//!
//! Provides the command-line interface using clap, with commands for
//! segmenting transcripts, simulating streamed replies, and replaying
//! data-stream wire lines.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::{execute, execute_to};
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
