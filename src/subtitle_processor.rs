use std::collections::HashSet;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{CleanedTranscript, SubtitleContent};

// @module: Subtitle text normalization

// @const: Header and metadata lines (WEBVTT, Kind:, Language:, NOTE)
static METADATA_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(WEBVTT|Kind:|Language:|NOTE)").unwrap()
});

// @const: Bare cue sequence number
static SEQ_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+$").unwrap()
});

/// Inline patterns removed from caption lines, applied in order.
static STRIP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Markup tags: <c>, </c>, <i>, <00:00:01.000>, <font color="...">
        Regex::new(r"<[^>]*>").unwrap(),
        // Cue positioning settings leaking into caption text
        Regex::new(r"align:start position:\d+%?").unwrap(),
        // Word-level timestamps left over once tags are gone
        Regex::new(r"\b\d{2}:\d{2}:\d{2}\.\d+\b").unwrap(),
    ]
});

/// Kind of a single line of a VTT/SRT-like document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Document header or metadata (`WEBVTT`, `Kind:`, `Language:`, `NOTE`)
    Metadata,
    /// Cue timing line, anything containing `-->`
    TimestampRange,
    /// Cue sequence number
    SequenceNumber,
    /// Everything else
    Caption,
}

fn is_metadata(line: &str) -> bool {
    METADATA_REGEX.is_match(line)
}

fn is_timestamp_range(line: &str) -> bool {
    line.contains("-->")
}

fn is_sequence_number(line: &str) -> bool {
    SEQ_NUMBER_REGEX.is_match(line.trim())
}

/// Line classifiers, evaluated in order. The first match wins.
const LINE_CLASSIFIERS: [(LineKind, fn(&str) -> bool); 3] = [
    (LineKind::Metadata, is_metadata),
    (LineKind::TimestampRange, is_timestamp_range),
    (LineKind::SequenceNumber, is_sequence_number),
];

/// Classify a raw subtitle line
pub fn classify_line(line: &str) -> LineKind {
    LINE_CLASSIFIERS
        .iter()
        .find(|(_, matches)| matches(line))
        .map(|(kind, _)| *kind)
        .unwrap_or(LineKind::Caption)
}

/// Strip tags, positioning directives and inline timestamps from a caption
/// line, then trim it.
pub fn clean_caption_line(line: &str) -> String {
    let mut cleaned = line.to_string();
    for pattern in STRIP_PATTERNS.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }
    cleaned.trim().to_string()
}

/// Convert a raw subtitle document into deduplicated plain text.
///
/// Lines that survive cleaning are kept once, at their first position.
/// Deduplication is global, not only between adjacent lines, because
/// captions are routinely repeated across overlapping cue windows.
pub fn normalize_text(raw_text: &str) -> String {
    let mut seen: HashSet<String> = HashSet::new();
    let mut lines: Vec<String> = Vec::new();

    for raw_line in raw_text.lines() {
        if classify_line(raw_line) != LineKind::Caption {
            continue;
        }

        let line = clean_caption_line(raw_line);
        if line.is_empty() {
            continue;
        }

        // Stripping can expose a header or number ("<b>12</b>" -> "12")
        if classify_line(&line) != LineKind::Caption {
            continue;
        }

        if seen.contains(&line) {
            continue;
        }

        seen.insert(line.clone());
        lines.push(line);
    }

    lines.join("\n")
}

/// Normalize one subtitle document into a cleaned transcript.
pub fn normalize(content: &SubtitleContent) -> CleanedTranscript {
    let text = normalize_text(&content.raw_text);

    debug!(
        "Normalized {} subtitles: {} raw lines -> {} transcript lines",
        content.language.code,
        content.raw_text.lines().count(),
        if text.is_empty() { 0 } else { text.lines().count() }
    );

    CleanedTranscript {
        language_code: content.language.code.clone(),
        text,
    }
}

/// Alias of [`normalize`]
pub fn clean_subtitle(content: &SubtitleContent) -> CleanedTranscript {
    normalize(content)
}
