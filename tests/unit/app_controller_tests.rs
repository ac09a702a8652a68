/*!
 * Tests for the language picker and language selection
 */

use std::io::Cursor;
use ytsubs::app_config::Config;
use ytsubs::app_controller::{self, Controller};
use ytsubs::errors::{AppError, SubtitleError};
use ytsubs::models::{SubtitleLanguage, SubtitleSource};
use ytsubs::subtitles;

use crate::common;
use crate::common::mock_components::{MockDownloader, MockExtractor, MockSummarizer};

fn controller() -> Controller {
    Controller::with_components(
        Config::default(),
        Box::new(MockExtractor::with_info(common::info_with_subs())),
        Box::new(MockDownloader::new()),
        Box::new(MockSummarizer::replying("llama3", "summary")),
    )
}

fn picker_languages() -> Vec<SubtitleLanguage> {
    vec![
        SubtitleLanguage::new("en", "English", SubtitleSource::Manual, Vec::new()),
        SubtitleLanguage::new("es", "Spanish", SubtitleSource::Auto, Vec::new()),
    ]
}

fn pick(input: &str) -> (Option<SubtitleLanguage>, String) {
    let mut output = Vec::new();
    let choice = app_controller::interactive_select(&picker_languages(), Cursor::new(input.as_bytes()), &mut output);
    (choice, String::from_utf8(output).unwrap())
}

/// Test the picker line layout for both sources
#[test]
fn test_format_language_entry_shouldAlignSourceTags() {
    let languages = picker_languages();
    assert_eq!(app_controller::format_language_entry(&languages[0]), "[manual] en  English");
    assert_eq!(app_controller::format_language_entry(&languages[1]), "[auto]   es  Spanish");
}

/// Test a valid numeric choice and the rendered menu
#[test]
fn test_interactive_select_withValidNumber_shouldReturnLanguage() {
    let (choice, output) = pick("2\n");

    assert_eq!(choice.unwrap().code, "es");
    assert!(output.starts_with("Select subtitle language:\n"));
    assert!(output.contains("  1) [manual] en  English\n"));
    assert!(output.contains("  2) [auto]   es  Spanish\n"));
    assert!(output.ends_with("Enter number: "));
}

/// Test that surrounding whitespace is accepted
#[test]
fn test_interactive_select_withPaddedNumber_shouldReturnLanguage() {
    let (choice, _) = pick("  1  \n");
    assert_eq!(choice.unwrap().code, "en");
}

/// Test the inputs that mean no selection
#[test]
fn test_interactive_select_withInvalidInput_shouldReturnNone() {
    for input in ["", "0\n", "3\n", "-1\n", "english\n", "\n"] {
        let (choice, _) = pick(input);
        assert!(choice.is_none(), "input {:?} should not select", input);
    }
}

/// Test that an explicit code bypasses the picker and prefers manual tracks
#[test]
fn test_select_language_withExplicitCode_shouldNotCallPicker() {
    let languages = subtitles::parse_languages(&common::info_with_subs());

    let selected = controller()
        .select_language(&languages, Some("en"), |_| panic!("picker must not run"))
        .unwrap();

    assert_eq!(selected.code, "en");
    assert_eq!(selected.source, SubtitleSource::Manual);
}

/// Test the unknown code error
#[test]
fn test_select_language_withUnknownCode_shouldReturnLanguageNotFound() {
    let languages = subtitles::parse_languages(&common::info_with_subs());

    let error = controller()
        .select_language(&languages, Some("xx"), |_| None)
        .unwrap_err();

    assert_eq!(error.to_string(), "no subtitles found for language 'xx'.");
}

/// Test that the picker only sees preferred languages
#[test]
fn test_select_language_withoutCode_shouldOfferPreferredLanguages() {
    let languages = subtitles::parse_languages(&common::info_with_subs());

    let selected = controller()
        .select_language(&languages, None, |offered| {
            let codes: Vec<&str> = offered.iter().map(|lang| lang.code.as_str()).collect();
            assert_eq!(codes, vec!["en", "fr", "en", "es", "fa", "nl"]);
            offered.get(1).cloned()
        })
        .unwrap();

    assert_eq!(selected.code, "fr");
}

/// Test that an empty preferred list fails before prompting
#[test]
fn test_select_language_withNoPreferredLanguages_shouldReturnNoSubtitles() {
    let languages = vec![common::language("ja", SubtitleSource::Auto, "https://example.com/ja.vtt")];

    let error = controller()
        .select_language(&languages, None, |_| panic!("picker must not run"))
        .unwrap_err();

    assert!(matches!(error, AppError::Subtitle(SubtitleError::NoSubtitlesAvailable)));
}

/// Test that a cancelled picker is reported
#[test]
fn test_select_language_withCancelledPicker_shouldReturnNoLanguageSelected() {
    let languages = subtitles::parse_languages(&common::info_with_subs());

    let error = controller()
        .select_language(&languages, None, |_| None)
        .unwrap_err();

    assert!(matches!(error, AppError::NoLanguageSelected));
}

/// Test that a valid configuration builds the production controller
#[test]
fn test_with_config_withInvalidEndpoint_shouldReturnConfigError() {
    assert!(Controller::with_config(Config::default()).is_ok());

    let config = Config {
        ollama_endpoint: "::nope::".to_string(),
        ..Config::default()
    };
    assert!(matches!(Controller::with_config(config), Err(AppError::Config(_))));
}
