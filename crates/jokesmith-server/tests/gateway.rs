use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use futures::StreamExt;
use futures::channel::mpsc;
use serde_json::{Value, json};
use tower::ServiceExt;

use jokesmith_bedrock::backend::ChatBackend;
use jokesmith_bedrock::chat::{ChatRequest, TextStream};
use jokesmith_bedrock::error::BedrockError;
use jokesmith_core::models::message::{MessageKind, Role};
use jokesmith_server::router;
use jokesmith_server::state::AppState;

const VALID_EVALUATION: &str = r#"{"humor":"Very Funny","appropriateness":"Appropriate","relevance":"On Topic","creativity":"Original","summary":"Clever and on theme."}"#;

/// A backend that replays canned output and records every request.
#[derive(Default)]
struct ScriptedBackend {
    chunks: Vec<&'static str>,
    reply: &'static str,
    refuse: bool,
    fail_mid_stream: bool,
    calls: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    fn streaming(chunks: &[&'static str]) -> Self {
        Self {
            chunks: chunks.to_vec(),
            ..Self::default()
        }
    }

    fn replying(reply: &'static str) -> Self {
        Self {
            reply,
            ..Self::default()
        }
    }

    fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<ChatRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn stream(&self, request: ChatRequest) -> Result<TextStream, BedrockError> {
        self.calls.lock().unwrap().push(request);
        if self.refuse {
            return Err(BedrockError::Invocation("ThrottlingException".into()));
        }
        let mut items: Vec<Result<String, BedrockError>> =
            self.chunks.iter().map(|c| Ok(c.to_string())).collect();
        if self.fail_mid_stream {
            items.push(Err(BedrockError::Stream("connection reset".into())));
        }
        Ok(Box::pin(futures::stream::iter(items)))
    }

    async fn complete(&self, request: ChatRequest) -> Result<String, BedrockError> {
        self.calls.lock().unwrap().push(request);
        if self.refuse {
            return Err(BedrockError::Invocation("ThrottlingException".into()));
        }
        Ok(self.reply.to_string())
    }
}

fn app(backend: Arc<dyn ChatBackend>) -> axum::Router {
    router(AppState {
        backend,
        evaluation_temperature: 0.3,
    })
}

async fn post(app: axum::Router, uri: &str, body: impl Into<Body>) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ── /api/chat ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn valid_parameters_stream_the_reply() {
    let backend = Arc::new(ScriptedBackend::streaming(&["Why did the dog ", "sit in the shade? ", "Hot dog."]));
    let body = json!({"topic": "Animals", "tone": "Goofy", "type": "Pun", "temperature": 0.7});

    let response = post(app(backend.clone()), "/api/chat", body.to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; charset=utf-8"
    );
    assert_eq!(body_text(response).await, "Why did the dog sit in the shade? Hot dog.");

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert!((calls[0].temperature - 0.7).abs() < f32::EPSILON);
    assert_eq!(calls[0].messages.len(), 1);
    assert_eq!(calls[0].messages[0].kind, Some(MessageKind::GenerationRequest));
    assert_eq!(
        calls[0].messages[0].content,
        "Generate a Pun joke on Animals in a Goofy tone with a creativity level of 0.7"
    );
}

#[tokio::test]
async fn missing_fields_use_defaults() {
    let backend = Arc::new(ScriptedBackend::streaming(&["ok"]));
    let response = post(app(backend.clone()), "/api/chat", "{}").await;

    assert_eq!(response.status(), StatusCode::OK);
    let calls = backend.calls();
    assert_eq!(
        calls[0].messages[0].content,
        "Generate a pun joke on general in a funny tone with a creativity level of 0.7"
    );
}

#[tokio::test]
async fn malformed_json_is_rejected_without_calling_the_model() {
    let backend = Arc::new(ScriptedBackend::streaming(&["never"]));
    for body in ["{topic: Animals", "", "not json at all", "[1, 2]"] {
        let response = post(app(backend.clone()), "/api/chat", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(body_text(response).await, "Invalid JSON format");
    }
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn explicit_null_parameters_are_rejected() {
    let backend = Arc::new(ScriptedBackend::streaming(&["never"]));
    for key in ["topic", "tone", "type"] {
        let mut body = json!({"topic": "Food", "tone": "Dark", "type": "Story"});
        body[key] = Value::Null;
        let response = post(app(backend.clone()), "/api/chat", body.to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Missing required joke parameters");
    }
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn out_of_range_temperature_is_rejected() {
    let backend = Arc::new(ScriptedBackend::streaming(&["never"]));
    let response = post(app(backend.clone()), "/api/chat", r#"{"temperature": 3}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Temperature must be between 0 and 1");
}

#[tokio::test]
async fn non_numeric_temperature_is_rejected_on_both_body_shapes() {
    let backend = Arc::new(ScriptedBackend::streaming(&["never"]));
    let bodies = [
        json!({"topic": "Food", "temperature": "hot"}),
        json!({
            "messages": [{"role": "user", "content": "A food pun"}],
            "temperature": "hot"
        }),
    ];
    for body in bodies {
        let response = post(app(backend.clone()), "/api/chat", body.to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Temperature must be between 0 and 1");
    }
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn upstream_refusal_is_a_bad_gateway() {
    let backend = Arc::new(ScriptedBackend::refusing());
    let response = post(app(backend), "/api/chat", "{}").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_text(response).await, "Upstream model call failed");
}

#[tokio::test]
async fn mid_stream_failure_aborts_the_body() {
    let backend = Arc::new(ScriptedBackend {
        chunks: vec!["partial "],
        fail_mid_stream: true,
        ..ScriptedBackend::default()
    });
    let response = post(app(backend), "/api/chat", "{}").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(axum::body::to_bytes(response.into_body(), usize::MAX).await.is_err());
}

/// A backend whose stream is fed by the test, to observe chunk timing.
struct ChannelBackend {
    receiver: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
}

#[async_trait]
impl ChatBackend for ChannelBackend {
    async fn stream(&self, _request: ChatRequest) -> Result<TextStream, BedrockError> {
        let receiver = self.receiver.lock().unwrap().take().expect("single use");
        Ok(Box::pin(receiver.map(Ok::<String, BedrockError>)))
    }

    async fn complete(&self, _request: ChatRequest) -> Result<String, BedrockError> {
        unreachable!("generation only")
    }
}

#[tokio::test]
async fn first_chunk_arrives_before_the_model_finishes() {
    let (sender, receiver) = mpsc::unbounded();
    let backend = Arc::new(ChannelBackend {
        receiver: Mutex::new(Some(receiver)),
    });

    let response = post(app(backend), "/api/chat", "{}").await;
    assert_eq!(response.status(), StatusCode::OK);
    let mut data = response.into_body().into_data_stream();

    sender.unbounded_send("Knock knock.".to_string()).unwrap();
    let first = data.next().await.unwrap().unwrap();
    assert_eq!(&first[..], b"Knock knock.");

    sender.unbounded_send(" Who's there?".to_string()).unwrap();
    drop(sender);
    let second = data.next().await.unwrap().unwrap();
    assert_eq!(&second[..], b" Who's there?");
    assert!(data.next().await.is_none());
}

#[tokio::test]
async fn message_list_is_forwarded_without_evaluation_traffic() {
    let backend = Arc::new(ScriptedBackend::streaming(&["Another one."]));
    let body = json!({
        "temperature": 0.4,
        "messages": [
            {"role": "user", "kind": "generation_request", "content": "Generate a Pun joke on Food"},
            {"role": "assistant", "kind": "generation_reply", "content": "Lettuce celebrate."},
            {"role": "user", "kind": "evaluation_request", "content": "Evaluate this joke: Lettuce celebrate."},
            {"role": "assistant", "kind": "evaluation_reply", "content": "{}"},
            {"role": "user", "content": "Another, please"}
        ]
    });

    let response = post(app(backend.clone()), "/api/chat", body.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let call = &backend.calls()[0];
    assert!((call.temperature - 0.4).abs() < f32::EPSILON);
    let contents: Vec<&str> = call.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        ["Generate a Pun joke on Food", "Lettuce celebrate.", "Another, please"]
    );
    assert_eq!(call.messages.last().unwrap().role, Role::User);
}

#[tokio::test]
async fn message_list_ending_in_evaluation_request_is_refused() {
    let backend = Arc::new(ScriptedBackend::streaming(&["never"]));
    let body = json!({"messages": [
        {"role": "user", "kind": "evaluation_request", "content": "Evaluate this joke: ..."}
    ]});
    let response = post(app(backend.clone()), "/api/chat", body.to_string()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "Evaluation requests must be sent to /api/evaluate"
    );
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn message_list_must_end_with_user() {
    let backend = Arc::new(ScriptedBackend::streaming(&["never"]));
    for messages in [json!([]), json!([{"role": "assistant", "content": "hi"}])] {
        let body = json!({ "messages": messages });
        let response = post(app(backend.clone()), "/api/chat", body.to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Message list must end with a user message");
    }
}

// ── /api/evaluate ────────────────────────────────────────────────────────────

#[tokio::test]
async fn evaluation_returns_the_five_keys() {
    let backend = Arc::new(ScriptedBackend::replying(VALID_EVALUATION));
    let body = json!({
        "joke": "Why did the scarecrow win an award? He was outstanding in his field.",
        "parameters": {"topic": "Work", "tone": "Witty", "type": "Pun", "temperature": 0.9}
    });

    let response = post(app(backend.clone()), "/api/evaluate", body.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let value: Value = serde_json::from_str(&body_text(response).await).unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 5);
    assert_eq!(value["humor"], "Very Funny");

    let call = &backend.calls()[0];
    assert!((call.temperature - 0.3).abs() < f32::EPSILON);
    assert_eq!(call.messages[0].kind, Some(MessageKind::EvaluationRequest));
    assert!(call.messages[0].content.contains("outstanding in his field"));
    assert!(call.messages[0].content.contains("Requested topic: Work"));
    assert!(!call.system.contains("outstanding in his field"));
}

#[tokio::test]
async fn prose_wrapped_evaluation_is_unprocessable() {
    let backend = Arc::new(ScriptedBackend::replying(
        "Here is the evaluation you asked for:\n{\"humor\":\"Funny\"}",
    ));
    let response = post(app(backend), "/api/evaluate", r#"{"joke":"A joke."}"#).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_text(response).await, "Evaluation response was not valid JSON");
}

#[tokio::test]
async fn evaluation_upstream_failure_is_distinct_from_format_failure() {
    let backend = Arc::new(ScriptedBackend::refusing());
    let response = post(app(backend), "/api/evaluate", r#"{"joke":"A joke."}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn evaluation_needs_a_joke() {
    let backend = Arc::new(ScriptedBackend::replying(VALID_EVALUATION));
    for body in [r#"{}"#, r#"{"joke": "  "}"#, r#"{"joke": 7}"#] {
        let response = post(app(backend.clone()), "/api/evaluate", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(body_text(response).await, "Missing joke text");
    }
    let response = post(app(backend.clone()), "/api/evaluate", "{oops").await;
    assert_eq!(body_text(response).await, "Invalid JSON format");
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn evaluation_parameters_without_temperature_are_accepted() {
    let backend = Arc::new(ScriptedBackend::replying(VALID_EVALUATION));
    let body = json!({
        "joke": "Why did the cat sit on the keyboard? To keep an eye on the mouse.",
        "parameters": {"topic": "Animals", "tone": "Goofy", "type": "Pun"}
    });

    let response = post(app(backend.clone()), "/api/evaluate", body.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].messages[0].content.contains("Requested topic: Animals"));
}

#[tokio::test]
async fn bad_evaluation_parameters_are_not_reported_as_a_missing_joke() {
    let backend = Arc::new(ScriptedBackend::replying(VALID_EVALUATION));
    for parameters in [json!({"topic": null}), json!("Animals")] {
        let body = json!({"joke": "A joke.", "parameters": parameters});
        let response = post(app(backend.clone()), "/api/evaluate", body.to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Missing required joke parameters");
    }
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn health_reports_ok() {
    let backend = Arc::new(ScriptedBackend::default());
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app(backend).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let value: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(value["status"], "ok");
}
