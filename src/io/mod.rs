//! I/O utilities for stream-gen.
//!
//! Provides transcript reading from files and standard input, along with
//! Unicode utilities used by the matchers and by log previews.

pub mod reader;
pub mod unicode;

pub use reader::{read_file, read_input, read_stdin};
pub use unicode::{find_char_boundary, preview};
