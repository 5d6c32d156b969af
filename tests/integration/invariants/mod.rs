//! Ordering and durability invariants of the message log

use std::sync::Arc;

use chatrelay_llm::{ChatProvider, LlmMessage, LlmRole};

use crate::common::TestApp;

/// Provider that replies with the number of messages it was shown
struct CountingProvider;

#[async_trait::async_trait]
impl ChatProvider for CountingProvider {
    async fn complete(&self, history: &[LlmMessage]) -> String {
        assert_eq!(history.last().map(|m| m.role), Some(LlmRole::User));
        format!("seen {}", history.len())
    }
}

#[tokio::test]
async fn test_full_history_is_resent_every_turn() {
    let app = TestApp::with_provider(Arc::new(CountingProvider)).await.unwrap();

    for expected in [1, 3, 5] {
        let (_, body) = app.post_message("again").await;
        assert_eq!(body["messages"][1]["content"], format!("seen {}", expected));
    }
}

#[tokio::test]
async fn test_roles_alternate_and_ids_increase() {
    let app = TestApp::with_reply("ack").await.unwrap();
    for i in 0..4 {
        app.post_message(&format!("turn {}", i)).await;
    }

    let messages = app.get_messages().await;
    assert_eq!(messages.len(), 8);
    for (i, message) in messages.iter().enumerate() {
        let role = if i % 2 == 0 { "user" } else { "assistant" };
        assert_eq!(message["role"], role);
    }
    let ids: Vec<i64> = messages.iter().filter_map(|m| m["id"].as_i64()).collect();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[tokio::test]
async fn test_concurrent_posts_keep_turns_adjacent() {
    let app = Arc::new(TestApp::with_reply("ack").await.unwrap());

    let mut handles = Vec::new();
    for i in 0..6 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            app.post_message(&format!("parallel {}", i)).await
        }));
    }
    for handle in handles {
        let (status, _) = handle.await.unwrap();
        assert_eq!(status, 200);
    }

    let messages = app.get_messages().await;
    assert_eq!(messages.len(), 12);
    for pair in messages.chunks(2) {
        assert_eq!(pair[0]["role"], "user");
        assert_eq!(pair[1]["role"], "assistant");
    }
}

#[tokio::test]
async fn test_history_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let first = TestApp::on_disk(dir.path(), "pong").await.unwrap();
    first.post_message("one").await;
    first.post_message("two").await;
    let before = first.get_messages().await;
    drop(first);

    let second = TestApp::on_disk(dir.path(), "pong").await.unwrap();
    assert_eq!(second.get_messages().await, before);
    assert_eq!(before.len(), 4);
}
