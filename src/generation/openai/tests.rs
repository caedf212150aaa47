use super::*;
use crate::config::ServiceConfig;

fn test_config() -> ServiceConfig {
    ServiceConfig {
        base_url: "http://chat.test:9000".to_string(),
        embedding_model: "test-embedding-model".to_string(),
        generation_model: "test-generation-model".to_string(),
        batch_size: 8,
        timeout_seconds: 5,
    }
}

#[test]
fn client_configuration() {
    let client = OpenAiChat::new(&test_config(), "sk-test".to_string())
        .expect("client construction succeeds");

    assert_eq!(client.model, "test-generation-model");
    assert_eq!(client.base_url.host_str(), Some("chat.test"));
}

#[test]
fn request_serialization_shape() {
    let request = ChatRequest {
        model: "test-generation-model",
        messages: vec![
            ChatMessage {
                role: "system",
                content: "be helpful",
            },
            ChatMessage {
                role: "user",
                content: "a question",
            },
        ],
        temperature: 0.3,
        max_tokens: 512,
    };

    let json = serde_json::to_value(&request).expect("request serializes");
    assert_eq!(json["messages"][0]["role"], "system");
    assert_eq!(json["messages"][1]["content"], "a question");
    assert_eq!(json["max_tokens"], 512);
}

#[test]
fn response_content_is_extracted() {
    let body = r#"{"choices":[{"message":{"role":"assistant","content":"an answer"}}]}"#;
    let response: ChatResponse = serde_json::from_str(body).expect("response parses");

    assert_eq!(response.choices[0].message.content, "an answer");
}
