use thiserror::Error;

#[derive(Debug, Error)]
pub enum BedrockError {
    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("response stream failed: {0}")]
    Stream(String),

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("conversation is not valid for the model: {0}")]
    InvalidConversation(String),
}
