use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use futures::TryStreamExt;
use serde_json::{Map, Value};

use jokesmith_bedrock::chat::ChatRequest;
use jokesmith_core::models::message::{Message, MessageKind, Role};
use jokesmith_core::models::parameters::{self, JokeParameters};
use jokesmith_core::prompt;

use crate::error::{ApiError, EVALUATION_NOT_ALLOWED, MESSAGES_MUST_END_WITH_USER};
use crate::routes::json_object;
use crate::state::AppState;

/// Generate a joke and stream it back as plain text.
///
/// Accepts either `{topic, tone, type, temperature}` or
/// `{messages, temperature}`. Chunks are written to the response as the model
/// produces them.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let object = json_object(&body)?;
    let request = generation_request(&object)?;

    let stream = state
        .backend
        .stream(request)
        .await?
        .inspect_err(|e| tracing::warn!(error = %e, "generation stream aborted"));

    Ok((
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response())
}

/// Build the model call for a generation body.
pub fn generation_request(object: &Map<String, Value>) -> Result<ChatRequest, ApiError> {
    match object.get("messages") {
        Some(messages) => from_messages(messages, object.get("temperature")),
        None => {
            let params = JokeParameters::from_request(object)?;
            let pair = prompt::generation_prompt(&params);
            Ok(ChatRequest {
                system: pair.system,
                messages: vec![Message::new(
                    Role::User,
                    MessageKind::GenerationRequest,
                    pair.user,
                )],
                temperature: params.temperature,
            })
        }
    }
}

fn from_messages(messages: &Value, temperature: Option<&Value>) -> Result<ChatRequest, ApiError> {
    let messages: Vec<Message> = serde_json::from_value(messages.clone())
        .map_err(|_| ApiError::BadRequest(MESSAGES_MUST_END_WITH_USER))?;

    match messages.last() {
        Some(last) if !last.is_generation_traffic() => {
            return Err(ApiError::BadRequest(EVALUATION_NOT_ALLOWED));
        }
        Some(last) if last.role == Role::User => {}
        _ => return Err(ApiError::BadRequest(MESSAGES_MUST_END_WITH_USER)),
    }

    let temperature = parameters::temperature_from(temperature)?;

    // Earlier evaluation exchanges are not joke context.
    let messages = messages
        .into_iter()
        .filter(Message::is_generation_traffic)
        .collect();

    Ok(ChatRequest {
        system: prompt::generation_system_prompt().to_string(),
        messages,
        temperature,
    })
}
