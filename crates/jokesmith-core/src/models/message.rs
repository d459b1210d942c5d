use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Message {
    pub role: Role,
    /// What the message is for. Optional on the wire so plain
    /// `{role, content}` lists are accepted; untagged messages are treated
    /// as generation traffic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MessageKind>,
    pub content: String,
}

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    User,
    Assistant,
    System,
}

/// Explicit tag carried by every message the session creates, so joke text
/// and instructions are never told apart by their content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MessageKind {
    GenerationRequest,
    GenerationReply,
    EvaluationRequest,
    EvaluationReply,
}

impl Message {
    pub fn new(role: Role, kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            role,
            kind: Some(kind),
            content: content.into(),
        }
    }

    pub fn is(&self, kind: MessageKind) -> bool {
        self.kind == Some(kind)
    }

    /// Whether this message belongs to the joke-generation exchange.
    pub fn is_generation_traffic(&self) -> bool {
        matches!(
            self.kind,
            None | Some(MessageKind::GenerationRequest | MessageKind::GenerationReply)
        )
    }

    /// Transcript line with the speaker prefix, e.g. `AI: ...`.
    pub fn transcript_line(&self) -> String {
        let speaker = match self.role {
            Role::User => "User",
            Role::Assistant => "AI",
            Role::System => "System",
        };
        format!("{speaker}: {}", self.content)
    }
}
