use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::error::CoreError;

pub const DEFAULT_TOPIC: &str = "general";
pub const DEFAULT_TONE: &str = "funny";
pub const DEFAULT_TYPE: &str = "pun";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// The knobs a user turns before asking for a joke.
///
/// Validated on construction: topic, tone and type are non-blank and the
/// temperature lies in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JokeParameters {
    pub topic: String,
    pub tone: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub temperature: f32,
}

impl JokeParameters {
    pub fn new(
        topic: impl Into<String>,
        tone: impl Into<String>,
        kind: impl Into<String>,
        temperature: f32,
    ) -> Result<Self, CoreError> {
        let params = Self {
            topic: topic.into(),
            tone: tone.into(),
            kind: kind.into(),
            temperature,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check the invariants. Deserialized values skip `new`, so callers that
    /// accept parameters over the wire run this explicitly.
    pub fn validate(&self) -> Result<(), CoreError> {
        if [&self.topic, &self.tone, &self.kind]
            .iter()
            .any(|s| s.trim().is_empty())
        {
            return Err(CoreError::MissingParameters);
        }
        if !self.temperature.is_finite() || !(0.0..=1.0).contains(&self.temperature) {
            return Err(CoreError::TemperatureOutOfRange(self.temperature));
        }
        Ok(())
    }

    /// Resolve a raw JSON request object into parameters.
    ///
    /// Absent keys and values of the wrong JSON type fall back to the
    /// defaults. An explicit `null` or a blank string for topic, tone or type
    /// is treated as missing and rejected. Temperature follows
    /// [`temperature_from`].
    pub fn from_request(body: &Map<String, Value>) -> Result<Self, CoreError> {
        let topic = text_field(body, "topic", DEFAULT_TOPIC)?;
        let tone = text_field(body, "tone", DEFAULT_TONE)?;
        let kind = text_field(body, "type", DEFAULT_TYPE)?;
        let temperature = temperature_from(body.get("temperature"))?;

        Self::new(topic, tone, kind, temperature)
    }
}

/// Resolve a raw `temperature` value.
///
/// Absent or `null` means [`DEFAULT_TEMPERATURE`]. Anything that is not a
/// number in `[0, 1]` is rejected.
pub fn temperature_from(value: Option<&Value>) -> Result<f32, CoreError> {
    let temperature = match value {
        None | Some(Value::Null) => return Ok(DEFAULT_TEMPERATURE),
        Some(v) => v.as_f64().map(|t| t as f32).unwrap_or(f32::NAN),
    };
    if !temperature.is_finite() || !(0.0..=1.0).contains(&temperature) {
        return Err(CoreError::TemperatureOutOfRange(temperature));
    }
    Ok(temperature)
}

fn text_field(body: &Map<String, Value>, key: &str, default: &str) -> Result<String, CoreError> {
    match body.get(key) {
        None => Ok(default.to_string()),
        Some(Value::Null) => Err(CoreError::MissingParameters),
        Some(Value::String(s)) if s.trim().is_empty() => Err(CoreError::MissingParameters),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Ok(default.to_string()),
    }
}
