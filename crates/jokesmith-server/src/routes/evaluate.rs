use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde_json::Value;

use jokesmith_bedrock::chat::ChatRequest;
use jokesmith_core::models::evaluation::EvaluationResult;
use jokesmith_core::models::message::{Message, MessageKind, Role};
use jokesmith_core::models::parameters::JokeParameters;
use jokesmith_core::prompt;

use crate::error::{ApiError, MISSING_JOKE, MISSING_PARAMETERS};
use crate::routes::json_object;
use crate::state::AppState;

/// Rate a joke. Non-streaming: the whole reply must be parsed as one JSON
/// document before anything is returned.
///
/// Body is `{joke, parameters?}`. `parameters` is read the same way as a
/// generation body, so absent fields take their defaults.
pub async fn evaluate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<EvaluationResult>, ApiError> {
    let object = json_object(&body)?;

    let joke = object
        .get("joke")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|j| !j.is_empty())
        .ok_or(ApiError::BadRequest(MISSING_JOKE))?;
    let parameters = match object.get("parameters") {
        None | Some(Value::Null) => None,
        Some(Value::Object(fields)) => Some(JokeParameters::from_request(fields)?),
        Some(_) => return Err(ApiError::BadRequest(MISSING_PARAMETERS)),
    };

    let pair = prompt::evaluation_prompt(joke, parameters.as_ref());
    let request = ChatRequest {
        system: pair.system,
        messages: vec![Message::new(
            Role::User,
            MessageKind::EvaluationRequest,
            pair.user,
        )],
        temperature: state.evaluation_temperature,
    };

    let raw = state.backend.complete(request).await?;

    match EvaluationResult::parse_strict(&raw) {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            tracing::warn!(raw = %e.raw, error = %e.source, "evaluation output rejected");
            Err(ApiError::EvaluationFormat)
        }
    }
}
