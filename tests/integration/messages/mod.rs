//! Message endpoint integration tests

use axum::http::Method;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatrelay_llm::{GENERIC_FAILURE_REPLY, NOT_CONFIGURED_REPLY};

use crate::common::TestApp;

fn openai_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "model": "gpt-3.5-turbo-0125",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}],
        "usage": {"prompt_tokens": 5, "completion_tokens": 1, "total_tokens": 6}
    }))
}

mod test_list_messages {
    use super::*;

    #[tokio::test]
    async fn test_empty_log() {
        let app = TestApp::with_reply("pong").await.unwrap();
        let (status, body) = app.request(Method::GET, "/api/messages", None).await;

        assert_eq!(status, 200);
        assert_eq!(body, json!({"success": true, "messages": []}));
    }

    #[tokio::test]
    async fn test_messages_carry_wire_fields() {
        let app = TestApp::with_reply("pong").await.unwrap();
        app.post_message("ping").await;

        let messages = app.get_messages().await;
        assert_eq!(messages.len(), 2);
        for message in &messages {
            assert!(message["id"].is_i64());
            assert!(message["role"].is_string());
            assert!(message["content"].is_string());
            assert!(message["timestamp"].is_string());
        }
    }
}

mod test_send_message {
    use super::*;

    #[tokio::test]
    async fn test_ping_pong() {
        let app = TestApp::with_reply("pong").await.unwrap();
        let (status, body) = app.post_message("ping").await;

        assert_eq!(status, 200);
        assert_eq!(body["success"], true);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "ping");
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[1]["content"], "pong");

        assert_eq!(&app.get_messages().await, messages);
    }

    #[tokio::test]
    async fn test_blank_message_rejected_without_side_effects() {
        let app = TestApp::with_reply("pong").await.unwrap();
        app.post_message("first").await;
        let before = app.get_messages().await;

        let (status, body) = app.post_message("   ").await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"success": false, "error": "Message is required"}));

        let (status, _) = app
            .request(Method::POST, "/api/messages", Some(json!({"text": "hi"})))
            .await;
        assert_eq!(status, 400);

        assert_eq!(app.get_messages().await, before);
    }

    #[tokio::test]
    async fn test_missing_credential_still_records_turn() {
        let app = TestApp::unconfigured().await.unwrap();
        let (status, body) = app.post_message("hi").await;

        assert_eq!(status, 200);
        assert_eq!(body["messages"][0]["content"], "hi");
        assert_eq!(body["messages"][1]["content"], NOT_CONFIGURED_REPLY);
        assert_eq!(app.get_messages().await.len(), 2);
    }

    #[tokio::test]
    async fn test_provider_reply_is_trimmed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(openai_reply("\n  Hello from the model.  "))
            .expect(1)
            .mount(&server)
            .await;

        let app = TestApp::with_openai_server(&server.uri()).await.unwrap();
        let (_, body) = app.post_message("hello").await;
        assert_eq!(body["messages"][1]["content"], "Hello from the model.");
    }

    #[tokio::test]
    async fn test_provider_server_error_becomes_apology() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream exploded at 10.1.2.3"))
            .mount(&server)
            .await;

        let app = TestApp::with_openai_server(&server.uri()).await.unwrap();
        let (status, body) = app.post_message("hello").await;

        assert_eq!(status, 200);
        assert_eq!(body["messages"][1]["content"], GENERIC_FAILURE_REPLY);
        assert!(!body.to_string().contains("10.1.2.3"));
    }

    #[tokio::test]
    async fn test_rejected_credential_becomes_not_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Invalid API Key", "type": "invalid_request_error", "code": "invalid_api_key"}
            })))
            .mount(&server)
            .await;

        let app = TestApp::with_openai_server(&server.uri()).await.unwrap();
        let (_, body) = app.post_message("hello").await;
        assert_eq!(body["messages"][1]["content"], NOT_CONFIGURED_REPLY);
    }

    #[tokio::test]
    async fn test_malformed_provider_body_becomes_apology() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let app = TestApp::with_openai_server(&server.uri()).await.unwrap();
        let (_, body) = app.post_message("hello").await;
        assert_eq!(body["messages"][1]["content"], GENERIC_FAILURE_REPLY);
    }
}

mod test_clear_messages {
    use super::*;

    #[tokio::test]
    async fn test_clear_twice() {
        let app = TestApp::with_reply("pong").await.unwrap();
        app.post_message("ping").await;

        for _ in 0..2 {
            let (status, body) = app.request(Method::DELETE, "/api/messages", None).await;
            assert_eq!(status, 200);
            assert_eq!(
                body,
                json!({"success": true, "message": "All messages cleared"})
            );
            assert!(app.get_messages().await.is_empty());
        }
    }
}
