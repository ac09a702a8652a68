/*!
 * # ytsubs - YouTube subtitles to summaries
 *
 * Downloads a subtitle track for a video, turns the raw VTT/SRT text into a
 * clean plain-text transcript, and asks a local Ollama model to summarize it.
 *
 * ## Architecture
 *
 * - `subtitle_processor`: transcript normalizer (line classification,
 *   markup stripping, order-preserving deduplication)
 * - `models`: value types shared by every stage
 * - `subtitles`: language listing through yt-dlp and subtitle download
 * - `summarizer`: summarization seam and its Ollama implementation
 * - `providers`: LLM provider clients (`providers::ollama`)
 * - `app_controller`: end-to-end workflow and the language picker
 * - `app_config`: configuration management
 * - `language_utils`: ISO language code utilities
 * - `file_utils`: file system operations
 * - `errors`: custom error types
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

#![allow(clippy::uninlined_format_args)]

pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod models;
pub mod providers;
pub mod subtitle_processor;
pub mod subtitles;
pub mod summarizer;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunOptions, RunOutcome};
pub use errors::{AppError, ProviderError, SubtitleError, SummarizationError};
pub use models::{CleanedTranscript, SubtitleContent, SubtitleFormat, SubtitleLanguage, SubtitleSource, Summary};
pub use subtitle_processor::{clean_subtitle, normalize};
pub use summarizer::{OllamaSummarizer, Summarizer};
