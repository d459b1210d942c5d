use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("missing required joke parameters")]
    MissingParameters,

    #[error("temperature must be between 0 and 1, got {0}")]
    TemperatureOutOfRange(f32),
}
