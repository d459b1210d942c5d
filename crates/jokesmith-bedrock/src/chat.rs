//! Chat-oriented Bedrock operations: one-shot and streaming conversation
//! through the Converse API.
//!
//! The Converse API takes the system prompt separately from the turns, and
//! the turns must alternate between user and assistant starting with a user
//! turn. [`prepare_turns`] folds an arbitrary message list into that shape
//! before anything is sent.

use std::pin::Pin;

use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ContentBlockDelta, ConversationRole, ConverseStreamOutput as StreamEvent,
    InferenceConfiguration, Message, SystemContentBlock,
};
use aws_smithy_types::error::display::DisplayErrorContext;
use futures::Stream;
use jokesmith_core::models::message::{Message as ChatMessage, Role};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::BedrockError;

// ── Types ────────────────────────────────────────────────────────────────────

/// Everything the model needs for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

/// Text chunks in arrival order. Ends after the last chunk, or after the
/// first error.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, BedrockError>> + Send>>;

/// A user or assistant turn in Converse order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// The system prompt plus alternating turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTurns {
    pub system: String,
    pub turns: Vec<Turn>,
}

// ── Conversation shaping ─────────────────────────────────────────────────────

/// Fold `messages` into Converse shape.
///
/// System-role messages are appended to `system`. Consecutive turns from the
/// same speaker are joined with a blank line. Assistant turns before the first
/// user turn are dropped, and the result must end with a user turn.
pub fn prepare_turns(system: &str, messages: &[ChatMessage]) -> Result<PreparedTurns, BedrockError> {
    let mut system = system.trim().to_string();
    let mut turns: Vec<Turn> = Vec::new();

    for msg in messages {
        if msg.role == Role::System {
            if !system.is_empty() {
                system.push_str("\n\n");
            }
            system.push_str(msg.content.trim());
            continue;
        }
        match turns.last_mut() {
            Some(last) if last.role == msg.role => {
                last.content.push_str("\n\n");
                last.content.push_str(&msg.content);
            }
            _ => turns.push(Turn {
                role: msg.role,
                content: msg.content.clone(),
            }),
        }
    }

    // Converse requires the first turn to be a user turn.
    let leading = turns.iter().take_while(|t| t.role == Role::Assistant).count();
    turns.drain(..leading);

    match turns.last() {
        Some(last) if last.role == Role::User => Ok(PreparedTurns { system, turns }),
        Some(_) => Err(BedrockError::InvalidConversation(
            "conversation must end with a user turn".to_string(),
        )),
        None => Err(BedrockError::InvalidConversation(
            "no user turns".to_string(),
        )),
    }
}

fn to_converse_messages(turns: &[Turn]) -> Result<Vec<Message>, BedrockError> {
    turns
        .iter()
        .map(|turn| {
            let role = match turn.role {
                Role::Assistant => ConversationRole::Assistant,
                _ => ConversationRole::User,
            };
            Message::builder()
                .role(role)
                .content(ContentBlock::Text(turn.content.clone()))
                .build()
                .map_err(|e| BedrockError::Invocation(e.to_string()))
        })
        .collect()
}

fn system_blocks(system: &str) -> Option<Vec<SystemContentBlock>> {
    if system.is_empty() {
        None
    } else {
        Some(vec![SystemContentBlock::Text(system.to_string())])
    }
}

fn inference_config(temperature: f32) -> InferenceConfiguration {
    InferenceConfiguration::builder().temperature(temperature).build()
}

// ── Chat conversation ────────────────────────────────────────────────────────

/// Send a conversation to Bedrock and return the assistant's whole reply.
pub async fn chat_converse(
    client: &Client,
    model_id: &str,
    request: &ChatRequest,
) -> Result<String, BedrockError> {
    let call_id = Uuid::new_v4();
    let prepared = prepare_turns(&request.system, &request.messages)?;
    let messages = to_converse_messages(&prepared.turns)?;

    info!(
        call_id = %call_id,
        model = model_id,
        temperature = request.temperature,
        turns = messages.len(),
        "starting converse"
    );

    let response = client
        .converse()
        .model_id(model_id)
        .set_system(system_blocks(&prepared.system))
        .set_messages(Some(messages))
        .inference_config(inference_config(request.temperature))
        .send()
        .await
        .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

    let output_message = response
        .output()
        .and_then(|o| o.as_message().ok())
        .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

    let response_text = output_message
        .content()
        .iter()
        .filter_map(|block| {
            if let ContentBlock::Text(text) = block {
                Some(text.as_str())
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join("");

    if let Some(usage) = response.usage() {
        info!(
            call_id = %call_id,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "converse complete"
        );
    }

    Ok(response_text)
}

/// Open a streaming conversation and return its text deltas.
///
/// Returns once Bedrock has accepted the request, so a rejected call surfaces
/// here rather than as the first stream item. Chunks are yielded as Bedrock
/// delivers them, without buffering.
pub async fn chat_converse_stream(
    client: &Client,
    model_id: &str,
    request: &ChatRequest,
) -> Result<TextStream, BedrockError> {
    let call_id = Uuid::new_v4();
    let prepared = prepare_turns(&request.system, &request.messages)?;
    let messages = to_converse_messages(&prepared.turns)?;

    info!(
        call_id = %call_id,
        model = model_id,
        temperature = request.temperature,
        turns = messages.len(),
        "starting converse stream"
    );

    let output = client
        .converse_stream()
        .model_id(model_id)
        .set_system(system_blocks(&prepared.system))
        .set_messages(Some(messages))
        .inference_config(inference_config(request.temperature))
        .send()
        .await
        .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

    let stream = futures::stream::unfold(Some(output.stream), move |state| async move {
        let mut receiver = state?;
        loop {
            match receiver.recv().await {
                Ok(Some(StreamEvent::ContentBlockDelta(event))) => {
                    if let Some(ContentBlockDelta::Text(text)) = event.delta()
                        && !text.is_empty()
                    {
                        return Some((Ok(text.clone()), Some(receiver)));
                    }
                }
                Ok(Some(StreamEvent::Metadata(meta))) => {
                    if let Some(usage) = meta.usage() {
                        info!(
                            call_id = %call_id,
                            input_tokens = usage.input_tokens,
                            output_tokens = usage.output_tokens,
                            "converse stream complete"
                        );
                    }
                }
                Ok(Some(other)) => debug!(call_id = %call_id, event = ?other, "stream event"),
                Ok(None) => return None,
                Err(e) => {
                    let message = DisplayErrorContext(&e).to_string();
                    return Some((Err(BedrockError::Stream(message)), None));
                }
            }
        }
    });

    Ok(Box::pin(stream))
}
