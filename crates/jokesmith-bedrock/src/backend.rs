use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;

use crate::chat::{self, ChatRequest, TextStream};
use crate::error::BedrockError;

/// The text-generation capability the gateway relies on.
///
/// Only the model id, temperature, system prompt and role-tagged messages
/// cross this boundary; streaming or one-shot is chosen per call.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Open a streaming call. Errors returned here happened before any text
    /// was produced.
    async fn stream(&self, request: ChatRequest) -> Result<TextStream, BedrockError>;

    /// Run a call to completion and return the whole reply.
    async fn complete(&self, request: ChatRequest) -> Result<String, BedrockError>;
}

/// [`ChatBackend`] over the Bedrock Converse API.
#[derive(Clone)]
pub struct BedrockBackend {
    client: Client,
    model_id: String,
}

impl BedrockBackend {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[async_trait]
impl ChatBackend for BedrockBackend {
    async fn stream(&self, request: ChatRequest) -> Result<TextStream, BedrockError> {
        chat::chat_converse_stream(&self.client, &self.model_id, &request).await
    }

    async fn complete(&self, request: ChatRequest) -> Result<String, BedrockError> {
        chat::chat_converse(&self.client, &self.model_id, &request).await
    }
}
