//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::cli::output::{
    OutputFormat, Snapshot, format_parse_result, format_presets, format_snapshot,
};
use crate::cli::parser::{Cli, Commands, ReplySource};
use crate::core::SyntaxMode;
use crate::error::Result;
use crate::io::read_input;
use crate::segment::Segmenter;
use crate::stream::{
    ChatMessage, MockStream, MockStreamOptions, Preset, StreamSession, WirePart,
};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Executes the CLI command and returns its output.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let mut out = Vec::new();
    execute_to(cli, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Executes the CLI command, writing output as it is produced.
///
/// Streaming commands write one snapshot per chunk, so a realtime
/// simulation shows progress while it runs.
///
/// # Errors
///
/// Returns an error if the command fails or the output cannot be written.
pub fn execute_to<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let format = OutputFormat::parse(&cli.format);
    let syntax = cli.syntax_mode()?;

    match &cli.command {
        Commands::Segment { file, streaming } => {
            let segmenter = Segmenter::for_syntax(syntax).with_config(cli.segmenter_config()?);
            cmd_segment(out, &segmenter, file.as_deref(), *streaming, format)
        }
        Commands::Simulate {
            source,
            realtime,
            initial_delay_ms,
            chunk_delay_ms,
            quiet,
        } => {
            let options = MockStreamOptions {
                initial_delay: Duration::from_millis(*initial_delay_ms),
                chunk_delay: Duration::from_millis(*chunk_delay_ms),
            };
            let segmenter = Segmenter::for_syntax(syntax).with_config(cli.segmenter_config()?);
            let stream = mock_stream(source, syntax, options)?;
            cmd_simulate(out, segmenter, stream, *realtime, *quiet, format)
        }
        Commands::Wire { source } => {
            let stream = mock_stream(source, syntax, MockStreamOptions::instant())?;
            cmd_wire(out, &stream)
        }
        Commands::Replay { file } => {
            let segmenter = Segmenter::for_syntax(syntax).with_config(cli.segmenter_config()?);
            cmd_replay(out, segmenter, file.as_deref(), format)
        }
        Commands::Presets => cmd_presets(out, format),
    }
}

/// Builds the mock stream for a message or preset (default preset: both).
fn mock_stream(
    source: &ReplySource,
    syntax: SyntaxMode,
    options: MockStreamOptions,
) -> Result<MockStream> {
    if let Some(name) = &source.preset {
        let preset = Preset::parse(name)?;
        return Ok(MockStream::for_preset(preset, syntax, options));
    }
    let messages: Vec<ChatMessage> = source
        .message
        .iter()
        .map(|m| ChatMessage::user(m.as_str()))
        .collect();
    Ok(MockStream::for_messages(&messages, syntax, options))
}

// ==================== Command Implementations ====================

fn cmd_segment<W: Write>(
    out: &mut W,
    segmenter: &Segmenter,
    file: Option<&Path>,
    streaming: bool,
    format: OutputFormat,
) -> Result<()> {
    let buffer = read_input(file)?;
    debug!(bytes = buffer.len(), streaming, "segmenting input");
    let result = if streaming {
        segmenter.segment(&buffer)
    } else {
        segmenter.segment_finished(&buffer)
    };
    out.write_all(format_parse_result(&result, format).as_bytes())?;
    Ok(())
}

fn cmd_simulate<W: Write>(
    out: &mut W,
    segmenter: Segmenter,
    stream: MockStream,
    realtime: bool,
    quiet: bool,
    format: OutputFormat,
) -> Result<()> {
    let mut session = StreamSession::new(segmenter);
    debug!(tokens = stream.token_count(), realtime, "starting simulation");

    for (n, chunk) in stream.enumerate() {
        if realtime && !chunk.delay.is_zero() {
            std::thread::sleep(chunk.delay);
        }
        let result = session.push(&chunk.text)?;
        if !quiet {
            let snapshot = Snapshot::new(n + 1, &chunk.text, result);
            out.write_all(format_snapshot(&snapshot, format).as_bytes())?;
            out.flush()?;
        }
    }

    let chunks = session.chunk_count();
    let result = session.finish();
    if !quiet && format == OutputFormat::Text {
        writeln!(out, "\nFinished after {chunks} chunks.")?;
    }
    out.write_all(format_parse_result(result, format).as_bytes())?;
    Ok(())
}

fn cmd_wire<W: Write>(out: &mut W, stream: &MockStream) -> Result<()> {
    for part in stream.wire_parts() {
        writeln!(out, "{part}")?;
    }
    Ok(())
}

fn cmd_replay<W: Write>(
    out: &mut W,
    segmenter: Segmenter,
    file: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let input = read_input(file)?;
    let mut session = StreamSession::new(segmenter);
    for line in input.lines().filter(|l| !l.trim().is_empty()) {
        let part = WirePart::parse(line)?;
        if session.is_finished() && matches!(part, WirePart::Text(_)) {
            debug!("ignoring text after finish part");
            continue;
        }
        session.apply(&part)?;
    }
    // A stream cut off before its finish part still ends here.
    let result = session.finish();
    out.write_all(format_parse_result(result, format).as_bytes())?;
    Ok(())
}

fn cmd_presets<W: Write>(out: &mut W, format: OutputFormat) -> Result<()> {
    out.write_all(format_presets(format).as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn run(args: &[&str]) -> Result<String> {
        let mut argv = vec!["stream-gen"];
        argv.extend_from_slice(args);
        execute(&Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_cmd_segment_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Call 【CONTACT:{{\"name\":\"Jo\"}}】 now").unwrap();
        let path = file.path().to_str().unwrap();

        let output = run(&["--syntax", "delimiter", "segment", path]).unwrap();
        assert!(output.contains("Segments: 3 (1 entities)"));
        assert!(output.contains("name=\"Jo\""));
    }

    #[test]
    fn test_cmd_segment_missing_file() {
        let result = run(&["segment", "/definitely/not/here.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cmd_simulate_json() {
        let output = run(&[
            "--format", "ndjson", "--syntax", "fenced", "simulate", "--preset", "contact",
        ])
        .unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert!(lines.len() > 10);
        assert!(output.contains("\"type\":\"entity\""));
    }

    #[test]
    fn test_cmd_simulate_quiet() {
        let output = run(&["simulate", "--quiet", "--message", "plain text please"]).unwrap();
        assert!(output.starts_with("Segments: 1 (0 entities)"));
    }

    #[test]
    fn test_cmd_simulate_unknown_preset() {
        assert!(run(&["simulate", "--preset", "nope"]).is_err());
    }

    #[test]
    fn test_cmd_wire_and_replay() {
        let wire = run(&["--syntax", "delimiter", "wire", "--preset", "both"]).unwrap();
        assert!(wire.starts_with("0:\"Here's\""));
        let last = wire.lines().last().unwrap();
        assert!(last.starts_with(r#"d:{"finishReason":"stop","usage":{"promptTokens":10,"#));

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(wire.as_bytes()).unwrap();
        let output = run(&[
            "--syntax",
            "delimiter",
            "replay",
            file.path().to_str().unwrap(),
        ])
        .unwrap();
        assert!(output.contains("Segments: 5 (2 entities)"));
    }

    #[test]
    fn test_cmd_replay_rejects_garbage() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "0:\"ok\"\nnonsense").unwrap();
        assert!(run(&["replay", file.path().to_str().unwrap()]).is_err());
    }

    #[test]
    fn test_cmd_presets() {
        let output = run(&["presets"]).unwrap();
        assert!(output.contains("calendar"));
        assert!(output.contains("meeting, schedule, event, calendar"));
    }
}
