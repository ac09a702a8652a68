use serde::{Deserialize, Serialize};
use std::fmt;

// @module: Value types passed between workflow stages

/// Provenance of a subtitle track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleSource {
    /// Human-authored track
    Manual,
    /// Machine-generated captions
    Auto,
}

impl SubtitleSource {
    // @returns: Bracketed tag used in listings and status lines
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Manual => "[manual]",
            Self::Auto => "[auto]",
        }
    }
}

impl fmt::Display for SubtitleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

// @struct: One downloadable encoding of a subtitle track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleFormat {
    // @field: Format identifier (vtt, srv3, ttml, ...)
    pub ext: String,

    // @field: Fetch locator
    pub url: String,
}

impl SubtitleFormat {
    pub fn new(ext: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            ext: ext.into(),
            url: url.into(),
        }
    }
}

/// A subtitle language offered for a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleLanguage {
    /// Language code as reported by the video host (e.g. `en`, `pt-BR`)
    pub code: String,
    /// Human readable name
    pub name: String,
    /// Manual or auto-generated
    pub source: SubtitleSource,
    /// Available encodings, in the order the host lists them
    pub formats: Vec<SubtitleFormat>,
}

impl SubtitleLanguage {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        source: SubtitleSource,
        formats: Vec<SubtitleFormat>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            source,
            formats,
        }
    }
}

/// Raw subtitle document for one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleContent {
    pub language: SubtitleLanguage,
    pub raw_text: String,
}

/// Plain-text transcript produced by the normalizer
///
/// `text` holds unique, non-blank lines joined by `\n` in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedTranscript {
    pub language_code: String,
    pub text: String,
}

impl CleanedTranscript {
    /// Number of transcript lines
    pub fn line_count(&self) -> usize {
        if self.text.is_empty() {
            0
        } else {
            self.text.lines().count()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Summary text tagged with the model that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub model: String,
    pub text: String,
}
