use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;
use std::fmt::Debug;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

use crate::errors::{ProviderError, SubtitleError};
use crate::language_utils;
use crate::models::{SubtitleContent, SubtitleFormat, SubtitleLanguage, SubtitleSource};

// @module: Subtitle discovery and download

/// Pseudo-language yt-dlp reports for live stream chat replays
const LIVE_CHAT_CODE: &str = "live_chat";

/// Source of video metadata (the yt-dlp info dict)
#[async_trait]
pub trait VideoInfoExtractor: Send + Sync + Debug {
    /// Extract the info dict for a video URL without downloading media
    async fn extract_info(&self, url: &str) -> Result<Value, SubtitleError>;
}

/// Fetches a subtitle document by URL
#[async_trait]
pub trait SubtitleDownloader: Send + Sync + Debug {
    /// Download and decode the document at `url`
    async fn download_text(&self, url: &str) -> Result<String, ProviderError>;
}

/// yt-dlp command line wrapper
#[derive(Debug, Clone)]
pub struct YtDlp {
    // @field: Executable name or path
    binary: PathBuf,
    // @field: Upper bound for one invocation
    timeout: Duration,
}

impl YtDlp {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }
}

#[async_trait]
impl VideoInfoExtractor for YtDlp {
    async fn extract_info(&self, url: &str) -> Result<Value, SubtitleError> {
        debug!("Running {} --dump-json for {}", self.binary.display(), url);

        let ytdlp_future = Command::new(&self.binary)
            .args([
                "--dump-json",
                "--skip-download",
                "--no-warnings",
                "--no-playlist",
                url,
            ])
            .kill_on_drop(true)
            .output();

        let output = tokio::select! {
            result = ytdlp_future => {
                result.map_err(|e| SubtitleError::MetadataFailed(
                    format!("Failed to execute {}: {}", self.binary.display(), e)
                ))?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(SubtitleError::MetadataFailed(
                    format!("yt-dlp timed out after {} seconds", self.timeout.as_secs())
                ));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp exited with {}: {}", output.status, stderr.trim());
            return Err(SubtitleError::MetadataFailed(stderr.trim().to_string()));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| SubtitleError::MetadataFailed(format!("yt-dlp returned invalid JSON: {}", e)))
    }
}

/// Plain HTTP subtitle downloader
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl SubtitleDownloader for HttpDownloader {
    async fn download_text(&self, url: &str) -> Result<String, ProviderError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown status").to_string(),
            });
        }

        let bytes = response.bytes().await?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| ProviderError::ParseError(format!("Subtitle body is not valid UTF-8: {}", e)))
    }
}

fn parse_formats(raw_formats: &Value) -> Vec<SubtitleFormat> {
    raw_formats
        .as_array()
        .map(|formats| {
            formats
                .iter()
                .filter_map(|format| {
                    let ext = format.get("ext")?.as_str()?;
                    let url = format.get("url")?.as_str()?;
                    Some(SubtitleFormat::new(ext, url))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn language_name(code: &str, raw_formats: &Value) -> String {
    raw_formats
        .as_array()
        .and_then(|formats| {
            formats
                .iter()
                .filter_map(|format| format.get("name").and_then(Value::as_str))
                .find(|name| !name.trim().is_empty())
        })
        .map(|name| name.to_string())
        .unwrap_or_else(|| language_utils::display_name(code))
}

fn parse_entries(entries: Option<&Value>, source: SubtitleSource) -> Vec<SubtitleLanguage> {
    let Some(entries) = entries.and_then(Value::as_object) else {
        return Vec::new();
    };

    // serde_json maps iterate in key order, so languages come out sorted by code
    entries
        .iter()
        .filter(|(code, _)| code.as_str() != LIVE_CHAT_CODE)
        .filter_map(|(code, raw_formats)| {
            let formats = parse_formats(raw_formats);
            if formats.is_empty() {
                debug!("Skipping {} {} subtitles without usable formats", source, code);
                return None;
            }
            Some(SubtitleLanguage::new(
                code.as_str(),
                language_name(code, raw_formats),
                source,
                formats,
            ))
        })
        .collect()
}

/// Read subtitle languages from a yt-dlp info dict.
///
/// Manual tracks (`subtitles`) come first, then auto-generated ones
/// (`automatic_captions`).
pub fn parse_languages(info: &Value) -> Vec<SubtitleLanguage> {
    let mut languages = parse_entries(info.get("subtitles"), SubtitleSource::Manual);
    languages.extend(parse_entries(info.get("automatic_captions"), SubtitleSource::Auto));
    languages
}

/// List all available subtitle languages for a video
pub async fn list_languages(
    extractor: &dyn VideoInfoExtractor,
    url: &str,
) -> Result<Vec<SubtitleLanguage>, SubtitleError> {
    let info = extractor.extract_info(url).await?;
    let languages = parse_languages(&info);
    debug!("Found {} subtitle language(s) for {}", languages.len(), url);
    Ok(languages)
}

/// Keep only languages whose code is in `preferred`
pub fn filter_preferred<S: AsRef<str>>(
    languages: &[SubtitleLanguage],
    preferred: &[S],
) -> Vec<SubtitleLanguage> {
    languages
        .iter()
        .filter(|lang| preferred.iter().any(|code| code.as_ref() == lang.code))
        .cloned()
        .collect()
}

/// Find a language by exact code, preferring a manual track over an auto one
pub fn find_language_by_code<'a>(
    languages: &'a [SubtitleLanguage],
    code: &str,
) -> Option<&'a SubtitleLanguage> {
    let find_with_source = |source: SubtitleSource| {
        languages
            .iter()
            .find(|lang| lang.code == code && lang.source == source)
    };

    find_with_source(SubtitleSource::Manual).or_else(|| find_with_source(SubtitleSource::Auto))
}

/// Pick the encoding to download: `preferred_ext` if offered, else the first one
pub fn select_format<'a>(language: &'a SubtitleLanguage, preferred_ext: &str) -> Option<&'a SubtitleFormat> {
    language
        .formats
        .iter()
        .find(|format| format.ext == preferred_ext)
        .or_else(|| language.formats.first())
}

/// Fetch the raw subtitle text for a language
pub async fn fetch_subtitle_content(
    downloader: &dyn SubtitleDownloader,
    language: &SubtitleLanguage,
    preferred_ext: &str,
) -> Result<SubtitleContent, SubtitleError> {
    let format = select_format(language, preferred_ext).ok_or_else(|| SubtitleError::NoFormatsAvailable {
        language: language.code.clone(),
    })?;

    if format.ext != preferred_ext {
        warn!("No {} subtitles for '{}', using {}", preferred_ext, language.code, format.ext);
    }

    let raw_text = downloader
        .download_text(&format.url)
        .await
        .map_err(|e| SubtitleError::DownloadFailed {
            language: language.code.clone(),
            message: e.to_string(),
        })?;

    Ok(SubtitleContent {
        language: language.clone(),
        raw_text,
    })
}
