use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

use jokesmith_bedrock::error::BedrockError;
use jokesmith_core::error::CoreError;

pub const INVALID_JSON: &str = "Invalid JSON format";
pub const MISSING_PARAMETERS: &str = "Missing required joke parameters";
pub const TEMPERATURE_RANGE: &str = "Temperature must be between 0 and 1";
pub const MESSAGES_MUST_END_WITH_USER: &str = "Message list must end with a user message";
pub const EVALUATION_NOT_ALLOWED: &str = "Evaluation requests must be sent to /api/evaluate";
pub const MISSING_JOKE: &str = "Missing joke text";
pub const UPSTREAM_FAILED: &str = "Upstream model call failed";
pub const EVALUATION_NOT_JSON: &str = "Evaluation response was not valid JSON";

/// Unified API error type for all route handlers.
///
/// Bodies are plain text; callers match on the status code and the fixed
/// messages above.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(&'static str),
    /// The model provider failed or refused the call.
    Upstream(String),
    /// The model answered, but not with a strict evaluation object.
    EvaluationFormat,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Upstream(msg) => {
                tracing::error!("upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, UPSTREAM_FAILED)
            }
            ApiError::EvaluationFormat => (StatusCode::UNPROCESSABLE_ENTITY, EVALUATION_NOT_JSON),
        };

        (status, [(CONTENT_TYPE, "text/plain; charset=utf-8")], message).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::MissingParameters => ApiError::BadRequest(MISSING_PARAMETERS),
            CoreError::TemperatureOutOfRange(_) => ApiError::BadRequest(TEMPERATURE_RANGE),
            CoreError::Serialization(_) => ApiError::BadRequest(INVALID_JSON),
        }
    }
}

impl From<BedrockError> for ApiError {
    fn from(e: BedrockError) -> Self {
        match e {
            BedrockError::InvalidConversation(_) => ApiError::BadRequest(MESSAGES_MUST_END_WITH_USER),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}
