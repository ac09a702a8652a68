use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

use crate::app_config::Config;
use crate::errors::{AppError, SubtitleError};
use crate::file_utils::FileManager;
use crate::models::{CleanedTranscript, SubtitleLanguage, SubtitleSource, Summary};
use crate::subtitle_processor;
use crate::subtitles::{self, HttpDownloader, SubtitleDownloader, VideoInfoExtractor, YtDlp};
use crate::summarizer::{OllamaSummarizer, Summarizer};

// @module: Application controller for the subtitle summary workflow

/// Per-run options coming from the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Language code to use; `None` asks the picker
    pub language: Option<String>,
    /// Stop after cleaning, do not call the summarizer
    pub transcript_only: bool,
    /// Also write the cleaned transcript here
    pub transcript_out: Option<PathBuf>,
}

/// Result of one run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub language: SubtitleLanguage,
    pub transcript: CleanedTranscript,
    /// `None` in transcript-only mode
    pub summary: Option<Summary>,
}

impl RunOutcome {
    /// Text to print on stdout: the summary, or the transcript when no summary was made
    pub fn output_text(&self) -> &str {
        match &self.summary {
            Some(summary) => &summary.text,
            None => &self.transcript.text,
        }
    }
}

/// One picker line: `[manual] en  English` (auto tag padded to the same width)
pub fn format_language_entry(language: &SubtitleLanguage) -> String {
    let source_tag = match language.source {
        SubtitleSource::Manual => "[manual]",
        SubtitleSource::Auto => "[auto]  ",
    };
    format!("{} {}  {}", source_tag, language.code, language.name)
}

/// Present a numbered menu on `output` and read the choice from `input`.
///
/// Returns `None` on EOF, read errors, non-numeric or out-of-range input.
pub fn interactive_select<R: BufRead, W: Write>(
    languages: &[SubtitleLanguage],
    mut input: R,
    mut output: W,
) -> Option<SubtitleLanguage> {
    let _ = writeln!(output, "Select subtitle language:");
    for (i, language) in languages.iter().enumerate() {
        let _ = writeln!(output, "  {}) {}", i + 1, format_language_entry(language));
    }
    let _ = writeln!(output);
    let _ = write!(output, "Enter number: ");
    let _ = output.flush();

    let mut choice = String::new();
    match input.read_line(&mut choice) {
        Ok(0) | Err(_) => return None,
        Ok(_) => {}
    }

    let index = choice.trim().parse::<usize>().ok()?;
    if index == 0 {
        return None;
    }
    languages.get(index - 1).cloned()
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    extractor: Box<dyn VideoInfoExtractor>,
    downloader: Box<dyn SubtitleDownloader>,
    summarizer: Box<dyn Summarizer>,
    // @field: Draw a spinner while summarizing
    show_progress: bool,
}

impl Controller {
    /// Create a controller backed by yt-dlp, HTTP and Ollama
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate().map_err(|e| AppError::Config(format!("{:#}", e)))?;

        let timeout = Duration::from_secs(config.timeout_secs);
        let extractor = YtDlp::new(config.ytdlp_path.clone(), timeout);
        let downloader = HttpDownloader::new(timeout);
        let summarizer = OllamaSummarizer::new(config.model.clone(), config.ollama_endpoint.clone(), timeout);

        Ok(Self::with_components(
            config,
            Box::new(extractor),
            Box::new(downloader),
            Box::new(summarizer),
        ))
    }

    /// Create a controller from explicit collaborators
    pub fn with_components(
        config: Config,
        extractor: Box<dyn VideoInfoExtractor>,
        downloader: Box<dyn SubtitleDownloader>,
        summarizer: Box<dyn Summarizer>,
    ) -> Self {
        Self {
            config,
            extractor,
            downloader,
            summarizer,
            show_progress: false,
        }
    }

    /// Enable the summarization spinner (only drawn when stderr is a terminal)
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Choose the language to download.
    ///
    /// An explicit code picks the manual track over the auto one. Without a
    /// code, `picker` chooses among the preferred languages.
    pub fn select_language<F>(
        &self,
        languages: &[SubtitleLanguage],
        code: Option<&str>,
        picker: F,
    ) -> Result<SubtitleLanguage, AppError>
    where
        F: FnOnce(&[SubtitleLanguage]) -> Option<SubtitleLanguage>,
    {
        if let Some(code) = code {
            return subtitles::find_language_by_code(languages, code)
                .cloned()
                .ok_or_else(|| AppError::LanguageNotFound(code.to_string()));
        }

        let preferred = subtitles::filter_preferred(languages, self.config.preferred_languages.as_slice());
        if preferred.is_empty() {
            return Err(SubtitleError::NoSubtitlesAvailable.into());
        }

        picker(&preferred).ok_or(AppError::NoLanguageSelected)
    }

    /// Run the whole workflow for one video URL
    pub async fn run<F>(&self, url: &str, options: &RunOptions, picker: F) -> Result<RunOutcome, AppError>
    where
        F: FnOnce(&[SubtitleLanguage]) -> Option<SubtitleLanguage>,
    {
        let start_time = std::time::Instant::now();

        let languages = subtitles::list_languages(self.extractor.as_ref(), url)
            .await
            .map_err(AppError::VideoInfo)?;

        let language = self.select_language(&languages, options.language.as_deref(), picker)?;

        eprintln!("Downloading {} subtitles ({})...", language.code, language.source.tag());

        let content = subtitles::fetch_subtitle_content(
            self.downloader.as_ref(),
            &language,
            &self.config.preferred_format,
        )
        .await?;

        let transcript = subtitle_processor::normalize(&content);
        if transcript.is_empty() {
            warn!("Transcript for '{}' is empty after cleaning", language.code);
        }

        if let Some(path) = &options.transcript_out {
            FileManager::write_to_file(path, &transcript.text)
                .map_err(|e| AppError::File(format!("{:#}", e)))?;
            info!("Transcript written to {:?}", path);
        }

        let summary = if options.transcript_only {
            None
        } else {
            Some(self.summarize(&transcript).await?)
        };

        debug!("Run finished in {:.1}s", start_time.elapsed().as_secs_f64());

        Ok(RunOutcome {
            language,
            transcript,
            summary,
        })
    }

    async fn summarize(&self, transcript: &CleanedTranscript) -> Result<Summary, AppError> {
        let spinner = self.create_spinner();
        spinner.set_message(format!("Summarizing with {}...", self.summarizer.model()));

        let result = self
            .summarizer
            .summarize(&transcript.text, &self.config.summarization_prompt)
            .await;

        spinner.finish_and_clear();
        Ok(result?)
    }

    fn create_spinner(&self) -> ProgressBar {
        if !self.show_progress || !std::io::stderr().is_terminal() {
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }
}
