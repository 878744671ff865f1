//! Input reading for the CLI.
//!
//! Transcripts are read whole: segmentation always works on the full
//! accumulated buffer, so there is nothing to gain from streaming reads.

use crate::error::{IoError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Maximum input size accepted (64MB).
const MAX_INPUT_SIZE: u64 = 64 * 1024 * 1024;

/// Reads a UTF-8 transcript from a file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the path does not exist,
/// [`IoError::ReadFailed`] if it cannot be read or is too large, and
/// [`IoError::InvalidUtf8`] if the content is not valid UTF-8.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path_ref = path.as_ref();
    let path_str = path_ref.to_string_lossy().to_string();

    if !path_ref.exists() {
        return Err(IoError::FileNotFound { path: path_str }.into());
    }

    let mut file = File::open(path_ref).map_err(|e| IoError::ReadFailed {
        path: path_str.clone(),
        reason: e.to_string(),
    })?;

    let size = file
        .metadata()
        .map_err(|e| IoError::ReadFailed {
            path: path_str.clone(),
            reason: e.to_string(),
        })?
        .len();

    if size > MAX_INPUT_SIZE {
        return Err(IoError::ReadFailed {
            path: path_str,
            reason: format!("file too large: {size} bytes (max: {MAX_INPUT_SIZE} bytes)"),
        }
        .into());
    }

    #[allow(clippy::cast_possible_truncation)]
    let mut bytes = Vec::with_capacity(size as usize);
    file.read_to_end(&mut bytes)
        .map_err(|e| IoError::ReadFailed {
            path: path_str.clone(),
            reason: e.to_string(),
        })?;

    decode(bytes, &path_str)
}

/// Reads a UTF-8 transcript from standard input.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or is not valid UTF-8.
pub fn read_stdin() -> Result<String> {
    let mut bytes = Vec::new();
    std::io::stdin()
        .read_to_end(&mut bytes)
        .map_err(|e| IoError::ReadFailed {
            path: "<stdin>".to_string(),
            reason: e.to_string(),
        })?;
    decode(bytes, "<stdin>")
}

/// Reads from `path` if given, otherwise from standard input.
///
/// A path of `-` also means standard input.
///
/// # Errors
///
/// See [`read_file`] and [`read_stdin`].
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => read_file(p),
        _ => read_stdin(),
    }
}

fn decode(bytes: Vec<u8>, source_name: &str) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        IoError::InvalidUtf8 {
            source_name: source_name.to_string(),
            offset: e.utf8_error().valid_up_to(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_read_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reply.txt");
        std::fs::write(&path, "Hi <contact name=\"Jo\"/>").unwrap();

        let content = read_file(&path).unwrap();
        assert_eq!(content, "Hi <contact name=\"Jo\"/>");
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = read_file("/nonexistent/path/reply.txt");
        assert!(matches!(
            result,
            Err(Error::Io(IoError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_read_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.txt");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"ok \xFF\xFE").unwrap();

        let result = read_file(&path);
        assert!(matches!(
            result,
            Err(Error::Io(IoError::InvalidUtf8 { offset: 3, .. }))
        ));
    }

    #[test]
    fn test_read_input_prefers_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reply.txt");
        std::fs::write(&path, "【CONTACT:{}】").unwrap();

        let content = read_input(Some(&path)).unwrap();
        assert_eq!(content, "【CONTACT:{}】");
    }
}
