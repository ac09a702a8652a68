/*!
 * HTTP downloader and Ollama summarizer against a local stub server
 */

use serde_json::{Value, json};
use std::time::Duration;
use ytsubs::app_config::Config;
use ytsubs::app_controller::{Controller, RunOptions};
use ytsubs::errors::ProviderError;
use ytsubs::subtitles::{HttpDownloader, SubtitleDownloader};
use ytsubs::summarizer::OllamaSummarizer;

use crate::common;
use crate::common::mock_components::MockExtractor;
use crate::common::stub_server::StubServer;

const GENERATE_REPLY: &str = r#"{"model":"llama3","response":"Greeting and a test.","done":true}"#;

/// Test a successful subtitle download
#[tokio::test]
async fn test_http_downloader_withDocument_shouldReturnBody() {
    let server = StubServer::with_routes(&[("/subs/en.vtt", 200, common::SAMPLE_VTT)]).await;
    let downloader = HttpDownloader::new(Duration::from_secs(5));

    let body = downloader.download_text(&server.url("/subs/en.vtt")).await.unwrap();

    assert_eq!(body, common::SAMPLE_VTT);
    assert_eq!(server.requests()[0].method, "GET");
}

/// Test that a missing document is an API error
#[tokio::test]
async fn test_http_downloader_withMissingDocument_shouldReturnApiError() {
    let server = StubServer::with_routes(&[]).await;
    let downloader = HttpDownloader::new(Duration::from_secs(5));

    let result = downloader.download_text(&server.url("/subs/xx.vtt")).await;

    assert!(matches!(result, Err(ProviderError::ApiError { status_code: 404, .. })));
}

fn info_served_by(server: &StubServer) -> Value {
    json!({
        "id": "abc123",
        "subtitles": {
            "en": [
                {"ext": "ttml", "url": server.url("/subs/en.ttml")},
                {"ext": "vtt", "url": server.url("/subs/en.vtt")}
            ]
        },
        "automatic_captions": {}
    })
}

/// Test the whole pipeline over HTTP with an overridden model
#[tokio::test]
async fn test_controller_withHttpCollaborators_shouldSummarizeDownloadedTranscript() {
    let server = StubServer::with_routes(&[
        ("/subs/en.vtt", 200, common::SAMPLE_VTT),
        ("/api/generate", 200, GENERATE_REPLY),
    ])
    .await;

    let mut config = Config::default();
    config.apply_overrides(Some("mistral"), Some(server.base_url()), None);
    let timeout = Duration::from_secs(5);
    let controller = Controller::with_components(
        config.clone(),
        Box::new(MockExtractor::with_info(info_served_by(&server))),
        Box::new(HttpDownloader::new(timeout)),
        Box::new(OllamaSummarizer::new(config.model.clone(), config.ollama_endpoint.clone(), timeout)),
    );

    let options = RunOptions {
        language: Some("en".to_string()),
        ..RunOptions::default()
    };
    let outcome = controller.run("https://youtube.com/watch?v=abc123", &options, |_| None).await.unwrap();

    assert_eq!(outcome.output_text(), "Greeting and a test.");

    let requests = server.requests();
    let paths: Vec<&str> = requests.iter().map(|request| request.path.as_str()).collect();
    assert_eq!(paths, vec!["/subs/en.vtt", "/api/generate"]);

    let body: Value = serde_json::from_str(&requests[1].body).unwrap();
    assert_eq!(body["model"], "mistral");
    assert_eq!(body["stream"], false);
    assert!(body["prompt"].as_str().unwrap().ends_with("\n\nHello and welcome\nThis is a test"));
}
