use std::sync::{Arc, Mutex};
use std::time::Duration;

use policy_config::RetryConfig;
use policy_domain::{AnswerSource, ChatMessage, Role};
use policy_provider::HttpChatSource;
use policy_server::ChatService;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Echoes the question back, or fails when asked to.
#[derive(Default)]
struct EchoSource {
    histories: Mutex<Vec<Vec<ChatMessage>>>,
}

#[async_trait::async_trait]
impl AnswerSource for EchoSource {
    async fn answer(&self, question: &str, history: &[ChatMessage]) -> anyhow::Result<String> {
        self.histories.lock().unwrap().push(history.to_vec());
        if question == "fail" {
            anyhow::bail!("upstream unavailable");
        }
        Ok(format!("You asked: {question}"))
    }
}

async fn spawn(source: Arc<EchoSource>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(ChatService::new(source, "claude-test").serve(listener));
    format!("http://{addr}")
}

async fn post_chat(base: &str, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{base}/chat"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_health_reports_model() {
    let base = spawn(Arc::default()).await;

    let actual: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(actual, json!({"status": "healthy", "model": "claude-test"}));
}

#[tokio::test]
async fn test_chat_answers_trimmed_message_with_mapped_history() {
    let source = Arc::new(EchoSource::default());
    let base = spawn(source.clone()).await;

    let actual = post_chat(
        &base,
        json!({
            "message": "  What is CPLV?  ",
            "history": [
                {"role": "user", "content": "hi"},
                {"role": "bot", "content": "hello"}
            ]
        }),
    )
    .await;

    assert_eq!(actual, (200, json!({"response": "You asked: What is CPLV?"})));
    let roles: Vec<Role> = source.histories.lock().unwrap()[0]
        .iter()
        .map(|message| message.role)
        .collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant]);
}

#[tokio::test]
async fn test_chat_rejects_empty_message() {
    let base = spawn(Arc::default()).await;

    let actual = post_chat(&base, json!({"message": "   ", "history": []})).await;

    assert_eq!(actual, (400, json!({"error": "Empty message"})));
}

#[tokio::test]
async fn test_chat_treats_unreadable_body_as_failure() {
    let base = spawn(Arc::default()).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/chat"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    let actual = (response.status().as_u16(), response.json::<Value>().await.unwrap());

    assert_eq!(
        actual,
        (500, json!({"error": "Something went wrong. Please try again."}))
    );
}

#[tokio::test]
async fn test_chat_hides_upstream_failure() {
    let base = spawn(Arc::default()).await;

    let actual = post_chat(&base, json!({"message": "fail"})).await;

    assert_eq!(
        actual,
        (500, json!({"error": "Something went wrong. Please try again."}))
    );
}

#[tokio::test]
async fn test_http_chat_source_round_trip() {
    let base = spawn(Arc::default()).await;
    let source = HttpChatSource::new(
        &base,
        Duration::from_secs(5),
        RetryConfig::default().max_retry_attempts(0usize),
    )
    .unwrap();

    let answer = source.answer("Can I take car lease?", &[]).await.unwrap();
    assert_eq!(answer, "You asked: Can I take car lease?");

    let error = source.answer("fail", &[]).await.unwrap_err();
    assert!(format!("{error:#}").contains("500"));
}
