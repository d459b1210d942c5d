//! HTTP client for the jokesmith gateway.

use std::pin::Pin;

use futures::{Stream, StreamExt};
use jokesmith_core::models::parameters::JokeParameters;
use reqwest::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::decode::Utf8Decoder;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request rejected ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("the gateway could not reach the model ({status})")]
    Upstream { status: StatusCode },

    #[error("the model's evaluation was not valid JSON")]
    MalformedEvaluation,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Reply text in arrival order, decoded on character boundaries.
pub type ReplyStream = Pin<Box<dyn Stream<Item = Result<String, ClientError>> + Send>>;

#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base: String,
}

impl GatewayClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Start a generation. Resolves once the gateway has answered with a
    /// status; the reply text then arrives through the returned stream.
    pub async fn generate(&self, params: &JokeParameters) -> Result<ReplyStream, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/chat", self.base))
            .json(params)
            .send()
            .await?;
        let response = check_status(response).await?;

        let bytes = Box::pin(response.bytes_stream());
        let stream = futures::stream::unfold(
            Some((bytes, Utf8Decoder::default())),
            |state| async move {
                let (mut bytes, mut decoder) = state?;
                loop {
                    match bytes.next().await {
                        Some(Ok(chunk)) => {
                            let text = decoder.push(&chunk);
                            if !text.is_empty() {
                                return Some((Ok(text), Some((bytes, decoder))));
                            }
                        }
                        Some(Err(e)) => return Some((Err(ClientError::from(e)), None)),
                        None => {
                            let rest = decoder.finish();
                            return (!rest.is_empty()).then_some((Ok(rest), None));
                        }
                    }
                }
            },
        );

        Ok(Box::pin(stream))
    }

    /// Ask for a rating and return the gateway's JSON text unparsed; the
    /// session does the strict parse.
    pub async fn evaluate(&self, joke: &str, params: &JokeParameters) -> Result<String, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/evaluate", self.base))
            .json(&json!({ "joke": joke, "parameters": params }))
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.text().await?)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status {
        StatusCode::UNPROCESSABLE_ENTITY => Err(ClientError::MalformedEvaluation),
        StatusCode::BAD_GATEWAY => Err(ClientError::Upstream { status }),
        _ => {
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::Rejected { status, message })
        }
    }
}
