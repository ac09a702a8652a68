#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use ytsubs::app_config::{self, Config};
use ytsubs::app_controller::{self, Controller, RunOptions};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for yt-subs
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_video_url(value: &str) -> Result<String, String> {
    url::Url::parse(value)
        .map(|_| value.to_string())
        .map_err(|e| format!("invalid video URL: {}", e))
}

/// yt-subs - Download YouTube subtitles and summarize with Ollama
#[derive(Parser, Debug)]
#[command(name = "yt-subs")]
#[command(version)]
#[command(about = "Download YouTube subtitles and summarize with Ollama")]
#[command(long_about = "yt-subs fetches a subtitle track with yt-dlp, cleans it into a plain transcript \
and asks a local Ollama model for a summary.

EXAMPLES:
    yt-subs https://youtube.com/watch?v=ID            # Pick a language interactively
    yt-subs -l en https://youtube.com/watch?v=ID      # English subtitles, manual track preferred
    yt-subs -l fr -m mistral URL                      # Use another Ollama model
    yt-subs -l en -t URL                              # Print the cleaned transcript only
    yt-subs completions bash > yt-subs.bash           # Generate bash completions

ENVIRONMENT:
    YT_SUBS_MODEL        Ollama model (default: llama3)
    YT_SUBS_OLLAMA_URL   Ollama endpoint (default: http://localhost:11434)")]
#[command(subcommand_negates_reqs = true, args_conflicts_with_subcommands = true)]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// YouTube video URL
    #[arg(value_name = "URL", required = true, value_parser = parse_video_url)]
    url: Option<String>,

    /// Subtitle language code (e.g. en, es, fr). If omitted, shows interactive language picker.
    #[arg(short = 'l', long = "lang", value_name = "LANG")]
    lang: Option<String>,

    /// Ollama model used for the summary
    #[arg(short, long, env = "YT_SUBS_MODEL")]
    model: Option<String>,

    /// Ollama endpoint URL
    #[arg(long, env = "YT_SUBS_OLLAMA_URL")]
    ollama_url: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write the cleaned transcript to this file
    #[arg(short = 'o', long)]
    transcript_out: Option<PathBuf>,

    /// Print the cleaned transcript and skip summarization
    #[arg(short, long)]
    transcript_only: bool,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Label and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "1;31"),
            Level::Warn => ("WARN ", "1;33"),
            Level::Info => ("INFO ", "1;32"),
            Level::Debug => ("DEBUG", "1;36"),
            Level::Trace => ("TRACE", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (label, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, label, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "yt-subs", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: CommandLineOptions) -> Result<()> {
    // Warn until the configuration says otherwise
    CustomLogger::init(LevelFilter::Warn)?;

    let url = cli.url.ok_or_else(|| anyhow::anyhow!("URL is required"))?;

    let mut config = Config::resolve(cli.config.as_deref())?;
    config.apply_overrides(
        cli.model.as_deref(),
        cli.ollama_url.as_deref(),
        cli.log_level.map(Into::into),
    );
    log::set_max_level(config.log_level.into());
    debug!("Using model {} at {}", config.model, config.ollama_endpoint);

    let controller = Controller::with_config(config)?.with_progress(true);

    let options = RunOptions {
        language: cli.lang,
        transcript_only: cli.transcript_only,
        transcript_out: cli.transcript_out,
    };

    let outcome = controller
        .run(&url, &options, |languages| {
            app_controller::interactive_select(languages, std::io::stdin().lock(), std::io::stderr())
        })
        .await?;

    println!("{}", outcome.output_text());
    Ok(())
}
