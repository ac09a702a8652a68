use anyhow::{Context, Result, anyhow};
use log::debug;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles loading, validating and overriding configuration
/// settings. Values come from built-in defaults, an optional JSON file,
/// then environment variables and command line flags.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Ollama model used for summaries
    #[serde(default = "default_model")]
    pub model: String,

    /// Ollama service endpoint URL
    #[serde(default = "default_ollama_endpoint")]
    pub ollama_endpoint: String,

    /// Language codes offered by the interactive picker, in display order
    #[serde(default = "default_preferred_languages")]
    pub preferred_languages: Vec<String>,

    /// Subtitle encoding to download when a track offers several
    #[serde(default = "default_preferred_format")]
    pub preferred_format: String,

    /// Instruction placed in front of the transcript
    #[serde(default = "default_summarization_prompt")]
    pub summarization_prompt: String,

    /// yt-dlp executable name or path
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: PathBuf,

    /// Timeout for external calls in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

pub const DEFAULT_MODEL: &str = "llama3";

pub const DEFAULT_PREFERRED_LANGS: [&str; 5] = ["en", "fa", "fr", "nl", "es"];

pub const DEFAULT_SUMMARIZATION_PROMPT: &str = "Summarize the following video transcript concisely. \
Include the key points and main takeaways:";

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_preferred_languages() -> Vec<String> {
    DEFAULT_PREFERRED_LANGS.iter().map(|code| code.to_string()).collect()
}

fn default_preferred_format() -> String {
    "vtt".to_string()
}

fn default_summarization_prompt() -> String {
    DEFAULT_SUMMARIZATION_PROMPT.to_string()
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_timeout_secs() -> u64 {
    120
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            model: default_model(),
            ollama_endpoint: default_ollama_endpoint(),
            preferred_languages: default_preferred_languages(),
            preferred_format: default_preferred_format(),
            summarization_prompt: default_summarization_prompt(),
            ytdlp_path: default_ytdlp_path(),
            timeout_secs: default_timeout_secs(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Default config file location: `<config_dir>/yt-subs/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("yt-subs").join("config.json"))
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Resolve the configuration: an explicit path must exist, the default
    /// location is used only when present, otherwise built-in defaults.
    pub fn resolve(explicit_path: Option<&Path>) -> Result<Self> {
        match explicit_path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::load(path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Apply command line / environment overrides
    pub fn apply_overrides(
        &mut self,
        model: Option<&str>,
        ollama_endpoint: Option<&str>,
        log_level: Option<LogLevel>,
    ) {
        if let Some(model) = model {
            self.model = model.to_string();
        }

        if let Some(endpoint) = ollama_endpoint {
            self.ollama_endpoint = endpoint.to_string();
        }

        if let Some(level) = log_level {
            self.log_level = level;
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(anyhow!("Model name must not be empty"));
        }

        url::Url::parse(&self.ollama_endpoint)
            .with_context(|| format!("Invalid Ollama endpoint: {}", self.ollama_endpoint))?;

        if self.preferred_format.trim().is_empty() {
            return Err(anyhow!("Preferred subtitle format must not be empty"));
        }

        for code in &self.preferred_languages {
            crate::language_utils::validate_language_code(code)
                .with_context(|| format!("Invalid preferred language: {}", code))?;
        }

        if self.timeout_secs == 0 {
            return Err(anyhow!("Timeout must be greater than zero"));
        }

        Ok(())
    }
}
