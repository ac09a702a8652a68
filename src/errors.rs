/*!
 * Error types for the ytsubs application.
 *
 * Each stage of the workflow has its own error enum, defined with thiserror.
 * The transcript normalizer has none: it is total over its input.
 */

use thiserror::Error;

/// Errors that can occur when talking to an HTTP provider API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that can occur while listing or fetching subtitles
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The video has no subtitle tracks at all
    #[error("no subtitles available for this video.")]
    NoSubtitlesAvailable,

    /// A language was selected but it carries no downloadable format
    #[error("No formats available for language '{language}'")]
    NoFormatsAvailable {
        /// Language code
        language: String,
    },

    /// The subtitle text could not be retrieved or decoded
    #[error("Failed to download subtitles for '{language}': {message}")]
    DownloadFailed {
        /// Language code
        language: String,
        /// Underlying cause
        message: String,
    },

    /// Video metadata could not be extracted
    #[error("{0}")]
    MetadataFailed(String),
}

/// Errors that can occur during summarization
#[derive(Error, Debug)]
pub enum SummarizationError {
    /// Error from the provider API
    #[error("Ollama summarization failed: {0}")]
    Provider(ProviderError),
}

impl From<ProviderError> for SummarizationError {
    fn from(error: ProviderError) -> Self {
        Self::Provider(error)
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Video metadata could not be listed
    #[error("failed to fetch video info: {0}")]
    VideoInfo(SubtitleError),

    /// The requested language code is not offered by the video
    #[error("no subtitles found for language '{0}'.")]
    LanguageNotFound(String),

    /// The interactive picker returned without a choice
    #[error("no language selected.")]
    NoLanguageSelected,

    /// Error from subtitle listing or fetching
    #[error(transparent)]
    Subtitle(#[from] SubtitleError),

    /// Error from summarization
    #[error(transparent)]
    Summarization(#[from] SummarizationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
