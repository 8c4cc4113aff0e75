//! HTTP-level tests for the OpenAI transcription client, backed by wiremock.
//!
//! The client is pointed at a local mock server, so these tests exercise the
//! real request building and response handling without touching the network.

use mediascribe::error::MediascribeError;
use mediascribe::media::cut::ChunkArtifact;
use mediascribe::transcribe::openai::{OpenAiClient, TranscribeModel};
use mediascribe::transcribe::Transcriber;
use std::path::Path;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chunk_fixture(dir: &Path, index: usize) -> ChunkArtifact {
    let payload = b"ID3 fake mp3 audio payload";
    let chunk_path = dir.join(format!("chunk-{}.mp3", index));
    std::fs::write(&chunk_path, payload).unwrap();
    ChunkArtifact {
        segment_index: index,
        path: chunk_path,
        size_bytes: payload.len() as u64,
    }
}

fn client_for(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new("test-key".to_string())
        .with_endpoint(format!("{}/v1/audio/transcriptions", server.uri()))
}

// ============================================================================
// Success Responses
// ============================================================================

mod success_tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_text_response_is_trimmed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  Hello from chunk zero.\n"))
            .mount(&server)
            .await;

        let scratch = tempfile::tempdir().unwrap();
        let chunk = chunk_fixture(scratch.path(), 0);

        let text = client_for(&server).transcribe(&chunk).await.unwrap();
        assert_eq!(text, "Hello from chunk zero.");
    }

    #[tokio::test]
    async fn test_request_carries_model_and_text_format() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .and(body_string_contains("gpt-4o-transcribe"))
            .and(body_string_contains("response_format"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let scratch = tempfile::tempdir().unwrap();
        let chunk = chunk_fixture(scratch.path(), 0);

        let text = client_for(&server).transcribe(&chunk).await.unwrap();
        assert_eq!(text, "ok");
    }

    #[tokio::test]
    async fn test_selected_model_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .and(body_string_contains("whisper-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let scratch = tempfile::tempdir().unwrap();
        let chunk = chunk_fixture(scratch.path(), 0);

        let client = client_for(&server).with_model(TranscribeModel::Whisper1);
        let text = client.transcribe(&chunk).await.unwrap();
        assert_eq!(text, "ok");
    }
}

// ============================================================================
// Error Responses
// ============================================================================

mod error_tests {
    use super::*;

    #[tokio::test]
    async fn test_api_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                r#"{"error":{"message":"Invalid file format.","type":"invalid_request_error","code":null}}"#,
            ))
            .mount(&server)
            .await;

        let scratch = tempfile::tempdir().unwrap();
        let chunk = chunk_fixture(scratch.path(), 0);

        let result = client_for(&server).transcribe(&chunk).await;
        match result {
            Err(MediascribeError::Api(message)) => {
                assert!(message.contains("Invalid file format."));
                assert!(message.contains("invalid_request_error"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_reports_the_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let scratch = tempfile::tempdir().unwrap();
        let chunk = chunk_fixture(scratch.path(), 0);

        let result = client_for(&server).transcribe(&chunk).await;
        match result {
            Err(MediascribeError::Api(message)) => {
                assert!(message.contains("500"));
                assert!(message.contains("upstream exploded"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}

// ============================================================================
// Pre-flight Checks
// ============================================================================

mod preflight_tests {
    use super::*;

    #[tokio::test]
    async fn test_oversized_chunk_never_reaches_the_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(0)
            .mount(&server)
            .await;

        let scratch = tempfile::tempdir().unwrap();
        let mut chunk = chunk_fixture(scratch.path(), 0);
        chunk.size_bytes = 26 * 1024 * 1024;

        let result = client_for(&server).transcribe(&chunk).await;
        assert!(matches!(result, Err(MediascribeError::Transcription(_))));
    }

    #[tokio::test]
    async fn test_missing_chunk_file_is_an_io_error() {
        let server = MockServer::start().await;

        let chunk = ChunkArtifact {
            segment_index: 0,
            path: Path::new("/nonexistent/chunk-0.mp3").to_path_buf(),
            size_bytes: 10,
        };

        let result = client_for(&server).transcribe(&chunk).await;
        assert!(matches!(result, Err(MediascribeError::Io(_))));
    }
}
