use jokesmith_core::error::CoreError;
use jokesmith_core::models::catalog::{self, Choice, TONES, TOPICS, TYPES};
use jokesmith_core::models::parameters::{DEFAULT_TEMPERATURE, JokeParameters};

/// Parameters as the user is filling them in. Generation stays disabled until
/// topic, tone and type are all chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterForm {
    pub topic: Option<String>,
    pub tone: Option<String>,
    pub kind: Option<String>,
    pub temperature: f32,
}

impl Default for ParameterForm {
    fn default() -> Self {
        Self {
            topic: None,
            tone: None,
            kind: None,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl ParameterForm {
    /// Set a field from user input, snapping to a preset's spelling when the
    /// input names one.
    pub fn set(&mut self, field: Field, value: &str) {
        let choices = match field {
            Field::Topic => TOPICS,
            Field::Tone => TONES,
            Field::Type => TYPES,
        };
        let value = normalize(choices, value);
        match field {
            Field::Topic => self.topic = value,
            Field::Tone => self.tone = value,
            Field::Type => self.kind = value,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.topic.is_some() && self.tone.is_some() && self.kind.is_some()
    }

    pub fn to_parameters(&self) -> Result<JokeParameters, CoreError> {
        match (&self.topic, &self.tone, &self.kind) {
            (Some(topic), Some(tone), Some(kind)) => {
                JokeParameters::new(topic.as_str(), tone.as_str(), kind.as_str(), self.temperature)
            }
            _ => Err(CoreError::MissingParameters),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Topic,
    Tone,
    Type,
}

fn normalize(choices: &[Choice], value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some(
        catalog::find(choices, value)
            .map(|c| c.value.to_string())
            .unwrap_or_else(|| value.to_string()),
    )
}
