#![expect(
    clippy::tests_outside_test_module,
    reason = "integration tests are only compiled in test mode"
)]

// HTTP client tests against a wiremock server. The clients are synchronous,
// so each call runs in spawn_blocking while the mock server lives on the
// tokio runtime.

use ragline::RagError;
use ragline::config::ServiceConfig;
use ragline::embeddings::{EmbeddingService, OpenAiEmbeddings};
use ragline::generation::{GenerationParams, GenerationService, OpenAiChat};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_config(base_url: String) -> ServiceConfig {
    ServiceConfig {
        base_url,
        embedding_model: "test-embedding-model".to_string(),
        generation_model: "test-generation-model".to_string(),
        batch_size: 16,
        timeout_seconds: 5,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn embeddings_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({ "model": "test-embedding-model" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                // Deliberately out of order: the client must sort by index
                { "index": 1, "embedding": [0.0, 1.0] },
                { "index": 0, "embedding": [1.0, 0.0] }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiEmbeddings::new(&service_config(server.uri()), "sk-test".to_string())
        .expect("client construction succeeds");

    let vectors = tokio::task::spawn_blocking(move || {
        client.embed_batch(&["first".to_string(), "second".to_string()])
    })
    .await
    .expect("task completes")
    .expect("embedding succeeds");

    assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
}

#[tokio::test(flavor = "multi_thread")]
async fn embeddings_server_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiEmbeddings::new(&service_config(server.uri()), "sk-test".to_string())
        .expect("client construction succeeds");

    let err = tokio::task::spawn_blocking(move || client.embed("some text"))
        .await
        .expect("task completes")
        .expect_err("server error must surface");

    assert!(matches!(err, RagError::EmbeddingService(_)));
    // expect(1) on the mock verifies exactly one attempt was made
}

#[tokio::test(flavor = "multi_thread")]
async fn embeddings_count_mismatch_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [ { "index": 0, "embedding": [1.0] } ]
        })))
        .mount(&server)
        .await;

    let client = OpenAiEmbeddings::new(&service_config(server.uri()), "sk-test".to_string())
        .expect("client construction succeeds");

    let err = tokio::task::spawn_blocking(move || {
        client.embed_batch(&["first".to_string(), "second".to_string()])
    })
    .await
    .expect("task completes")
    .expect_err("count mismatch must surface");

    assert!(matches!(err, RagError::EmbeddingService(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn chat_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "test-generation-model",
            "messages": [
                { "role": "system", "content": "system prompt" },
                { "role": "user", "content": "user prompt" }
            ],
            "max_tokens": 256
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "a grounded answer" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiChat::new(&service_config(server.uri()), "sk-test".to_string())
        .expect("client construction succeeds");

    let params = GenerationParams {
        temperature: 0.3,
        max_output_tokens: 256,
    };
    let answer =
        tokio::task::spawn_blocking(move || client.generate("system prompt", "user prompt", &params))
            .await
            .expect("task completes")
            .expect("generation succeeds");

    assert_eq!(answer, "a grounded answer");
}

#[tokio::test(flavor = "multi_thread")]
async fn chat_server_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiChat::new(&service_config(server.uri()), "sk-test".to_string())
        .expect("client construction succeeds");

    let err = tokio::task::spawn_blocking(move || {
        client.generate("system", "user", &GenerationParams::default())
    })
    .await
    .expect("task completes")
    .expect_err("server error must surface");

    assert!(matches!(err, RagError::GenerationService(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn chat_without_choices_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = OpenAiChat::new(&service_config(server.uri()), "sk-test".to_string())
        .expect("client construction succeeds");

    let err = tokio::task::spawn_blocking(move || {
        client.generate("system", "user", &GenerationParams::default())
    })
    .await
    .expect("task completes")
    .expect_err("empty choices must surface");

    assert!(matches!(err, RagError::GenerationService(_)));
}
