//! Output formatting for CLI commands.
//!
//! Supports text, JSON, and NDJSON output formats.

use crate::core::{EntityKind, ParseResult, Segment};
use crate::error::Error;
use crate::io::preview;
use crate::stream::Preset;
use serde::Serialize;
use std::fmt::Write;

/// Graphemes of prose shown per text segment in text output.
const TEXT_PREVIEW: usize = 48;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Pretty-printed JSON output.
    Json,
    /// One compact JSON value per line.
    Ndjson,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "ndjson" | "jsonl" => Self::Ndjson,
            _ => Self::Text,
        }
    }
}

/// Progress of a streamed reply after one chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// 1-based chunk number.
    pub chunk: usize,
    /// Text of the chunk.
    pub text: String,
    /// Number of visible segments.
    pub segments: usize,
    /// Number of entity segments.
    pub entities: usize,
    /// Kind of the hidden trailing marker, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<EntityKind>,
    /// End of the visible region.
    pub effective_end: usize,
}

impl Snapshot {
    /// Summarizes a session result after chunk number `chunk`.
    #[must_use]
    pub fn new(chunk: usize, text: &str, result: &ParseResult) -> Self {
        Self {
            chunk,
            text: text.to_string(),
            segments: result.segments.len(),
            entities: result.entity_count(),
            pending: result.pending.as_ref().map(|m| m.kind),
            effective_end: result.effective_end,
        }
    }
}

/// Formats a parse result.
#[must_use]
pub fn format_parse_result(result: &ParseResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_parse_result_text(result),
        OutputFormat::Json => format_json(result),
        OutputFormat::Ndjson => format_parse_result_ndjson(result),
    }
}

fn format_parse_result_text(result: &ParseResult) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Segments: {} ({} entities)",
        result.segments.len(),
        result.entity_count()
    );
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for (i, segment) in result.segments.iter().enumerate() {
        let range = segment.byte_range();
        let span = format!("{}..{}", range.start, range.end);
        match segment {
            Segment::Text { text, .. } => {
                let _ = writeln!(
                    output,
                    "[{i:<3}] {:<8} {span:<12} \"{}\"",
                    "text",
                    preview(text, TEXT_PREVIEW)
                );
            }
            Segment::Entity { entity } => {
                let fields = entity
                    .fields
                    .iter()
                    .map(|(k, v)| format!("{k}={v:?}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = writeln!(output, "[{i:<3}] {:<8} {span:<12} {fields}", entity.kind);
            }
        }
    }

    if let Some(pending) = &result.pending {
        let _ = writeln!(
            output,
            "\nPending: {} {} from byte {}",
            pending.syntax,
            pending.kind,
            pending.start()
        );
    }

    if !result.diagnostics.is_empty() {
        output.push_str("\nDiagnostics:\n");
        for diagnostic in &result.diagnostics {
            let _ = writeln!(output, "  {}", diagnostic.message());
        }
    }

    output
}

fn format_parse_result_ndjson(result: &ParseResult) -> String {
    #[derive(Serialize)]
    struct Pending<'a> {
        #[serde(rename = "type")]
        kind: &'static str,
        marker: &'a crate::core::Marker,
    }

    let mut output = String::new();
    for segment in &result.segments {
        push_line(&mut output, segment);
    }
    if let Some(marker) = &result.pending {
        push_line(
            &mut output,
            &Pending {
                kind: "pending",
                marker,
            },
        );
    }
    for diagnostic in &result.diagnostics {
        push_line(&mut output, diagnostic);
    }
    output
}

/// Formats one streaming snapshot.
#[must_use]
pub fn format_snapshot(snapshot: &Snapshot, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let pending = snapshot
                .pending
                .map_or_else(String::new, |kind| format!(" pending={kind}"));
            let chunk = format!("\"{}\"", preview(&snapshot.text, 20));
            format!(
                "#{:<4} {chunk:<24} segments={} entities={}{pending}\n",
                snapshot.chunk, snapshot.segments, snapshot.entities
            )
        }
        OutputFormat::Json | OutputFormat::Ndjson => {
            let mut output = String::new();
            push_line(&mut output, snapshot);
            output
        }
    }
}

/// Formats the preset list.
#[must_use]
pub fn format_presets(format: OutputFormat) -> String {
    #[derive(Serialize)]
    struct PresetInfo {
        name: &'static str,
        entities: usize,
        keywords: Vec<&'static str>,
    }

    let presets: Vec<PresetInfo> = Preset::all()
        .into_iter()
        .map(|p| PresetInfo {
            name: p.name(),
            entities: p.entity_count(),
            keywords: p.keywords(),
        })
        .collect();

    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "{:<10} {:<9} Keywords", "Preset", "Entities");
            output.push_str(&"-".repeat(50));
            output.push('\n');
            for p in &presets {
                let _ = writeln!(
                    output,
                    "{:<10} {:<9} {}",
                    p.name,
                    p.entities,
                    p.keywords.join(", ")
                );
            }
            output.push_str("\nMessages matching no keyword get \"both\".\n");
            output
        }
        OutputFormat::Json => format_json(&presets),
        OutputFormat::Ndjson => {
            let mut output = String::new();
            for p in &presets {
                push_line(&mut output, p);
            }
            output
        }
    }
}

/// Formats an error for output.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json | OutputFormat::Ndjson => {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }
            serde_json::to_string(&ErrorOutput {
                error: error.to_string(),
            })
            .unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    let mut json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    json.push('\n');
    json
}

/// Appends a value as one compact JSON line.
fn push_line<T: Serialize + ?Sized>(output: &mut String, value: &T) {
    output.push_str(&serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string()));
    output.push('\n');
}
