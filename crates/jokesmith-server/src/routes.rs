use serde_json::{Map, Value};

use crate::error::{ApiError, INVALID_JSON};

pub mod chat;
pub mod evaluate;
pub mod health;

/// Parse a request body as a JSON object.
///
/// Bodies are read as raw bytes rather than through `Json<T>` so malformed
/// input gets the fixed `Invalid JSON format` message instead of the
/// extractor's rejection text.
pub(crate) fn json_object(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Ok(object),
        _ => Err(ApiError::BadRequest(INVALID_JSON)),
    }
}
