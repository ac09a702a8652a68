/*!
 * Tests running the yt-subs binary and the yt-dlp wrapper
 */

use anyhow::Result;
use std::path::Path;
use std::process::{Command, Output};
use std::time::Duration;
use ytsubs::errors::SubtitleError;
use ytsubs::subtitles::{VideoInfoExtractor, YtDlp};

use crate::common;

const VIDEO_URL: &str = "https://youtube.com/watch?v=abc123";

fn yt_subs(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_yt-subs"))
        .args(args)
        .env_remove("YT_SUBS_MODEL")
        .env_remove("YT_SUBS_OLLAMA_URL")
        .output()
        .unwrap()
}

fn write_config(dir: &Path, ytdlp_path: &str) -> Result<String> {
    let config = serde_json::json!({ "ytdlp_path": ytdlp_path });
    let path = common::create_test_file(dir, "config.json", &config.to_string())?;
    Ok(path.to_string_lossy().into_owned())
}

/// Test that help lists the main flags
#[test]
fn test_binary_withHelp_shouldListFlags() {
    let output = yt_subs(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--lang"));
    assert!(stdout.contains("--model"));
    assert!(stdout.contains("--transcript-only"));
}

/// Test that the URL is required
#[test]
fn test_binary_withoutUrl_shouldFail() {
    let output = yt_subs(&[]);
    assert!(!output.status.success());
}

/// Test that a malformed URL is rejected by argument parsing
#[test]
fn test_binary_withInvalidUrl_shouldFail() {
    let output = yt_subs(&["-l", "en", "not a url"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid video URL"));
}

/// Test shell completion generation
#[test]
fn test_binary_withCompletions_shouldPrintScript() {
    let output = yt_subs(&["completions", "bash"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("yt-subs"));
}

/// Test the failure line and exit code when yt-dlp fails
#[cfg(unix)]
#[test]
fn test_binary_withFailingYtDlp_shouldPrintErrorAndExitOne() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = write_config(temp_dir.path(), "false")?;

    let output = yt_subs(&["--config", &config, "-l", "en", VIDEO_URL]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: failed to fetch video info:"), "stderr: {}", stderr);
    Ok(())
}

/// Test that a missing explicit config file is reported
#[test]
fn test_binary_withMissingConfig_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("missing.json");

    let output = yt_subs(&["--config", &missing.to_string_lossy(), "-l", "en", VIDEO_URL]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to open config file"));
    Ok(())
}

/// Test that a missing yt-dlp executable is a metadata error
#[tokio::test]
async fn test_ytdlp_withMissingBinary_shouldReturnMetadataError() {
    let ytdlp = YtDlp::new("/nonexistent/yt-dlp", Duration::from_secs(5));

    match ytdlp.extract_info(VIDEO_URL).await {
        Err(SubtitleError::MetadataFailed(message)) => assert!(message.starts_with("Failed to execute")),
        other => panic!("unexpected result: {:?}", other),
    }
}

/// Test that non-JSON output is rejected
#[cfg(unix)]
#[tokio::test]
async fn test_ytdlp_withNonJsonOutput_shouldReturnMetadataError() {
    // echo prints its arguments back, which is not JSON
    let ytdlp = YtDlp::new("echo", Duration::from_secs(5));

    match ytdlp.extract_info(VIDEO_URL).await {
        Err(SubtitleError::MetadataFailed(message)) => assert!(message.contains("invalid JSON")),
        other => panic!("unexpected result: {:?}", other),
    }
}

/// Test that a hanging extractor is cut off
#[cfg(unix)]
#[tokio::test]
async fn test_ytdlp_withSlowBinary_shouldTimeOut() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = common::create_temp_dir()?;
    let script = common::create_test_file(temp_dir.path(), "slow-yt-dlp", "#!/bin/sh\nsleep 5\n")?;
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;

    let ytdlp = YtDlp::new(&script, Duration::from_millis(200));

    match ytdlp.extract_info(VIDEO_URL).await {
        Err(SubtitleError::MetadataFailed(message)) => assert!(message.contains("timed out")),
        other => panic!("unexpected result: {:?}", other),
    }
    Ok(())
}
