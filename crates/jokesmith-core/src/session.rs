//! Client-side conversation state and the reducer that drives it.
//!
//! A [`Session`] is owned by one user. Every change goes through
//! [`Session::apply`], which is pure: it takes an [`Action`], updates the
//! state, and hands back the [`Effect`] the caller should perform (a network
//! request, usually). Rendering layers read the state and call
//! [`Session::control`]; they never inspect message text to decide what to
//! show.
//!
//! ```text
//! AwaitingParameters --Generate--> Generating --ReplyComplete--> JokeDisplayed
//!        ^                             |                            |     ^
//!        +-------GenerationFailed------+                    Evaluate|     |format or
//!                                                                   v     |upstream failure
//! EvaluationDisplayed <--EvaluationReceived(valid)-- EvaluationPending ---+
//! ```
//!
//! `Generate` is also accepted from `JokeDisplayed` and `EvaluationDisplayed`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CoreError;
use crate::models::evaluation::EvaluationResult;
use crate::models::history::{EvaluationHistory, EvaluationHistoryEntry};
use crate::models::message::{Message, MessageKind, Role};
use crate::models::parameters::JokeParameters;
use crate::prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    AwaitingParameters,
    Generating,
    JokeDisplayed,
    EvaluationPending,
    EvaluationDisplayed,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::AwaitingParameters => "awaiting parameters",
            Mode::Generating => "generating",
            Mode::JokeDisplayed => "showing a joke",
            Mode::EvaluationPending => "waiting for an evaluation",
            Mode::EvaluationDisplayed => "showing an evaluation",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The one control a rendering layer should offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Generate,
    Evaluate,
    Loading,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Generate(JokeParameters),
    ReplyChunk(String),
    ReplyComplete,
    GenerationFailed(String),
    Evaluate,
    EvaluationReceived { raw: String, at: jiff::Timestamp },
    /// The gateway itself refused the model's evaluation as malformed.
    EvaluationRejected(String),
    EvaluationFailed(String),
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::Generate(_) => "generate",
            Action::ReplyChunk(_) => "append a reply chunk",
            Action::ReplyComplete => "complete a reply",
            Action::GenerationFailed(_) => "fail a generation",
            Action::Evaluate => "evaluate",
            Action::EvaluationReceived { .. } => "receive an evaluation",
            Action::EvaluationRejected(_) => "reject an evaluation",
            Action::EvaluationFailed(_) => "fail an evaluation",
        }
    }
}

/// Work the caller must carry out after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    RequestGeneration(JokeParameters),
    RequestEvaluation {
        joke: String,
        parameters: JokeParameters,
    },
}

/// A failure recorded on the session for display. Cleared by the next
/// `Generate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionFailure {
    Generation(String),
    Evaluation(String),
    /// The evaluation reply was not a strict evaluation object. `raw` is
    /// absent when the gateway rejected it before it reached the session.
    EvaluationFormat { raw: Option<String>, reason: String },
}

impl fmt::Display for SessionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionFailure::Generation(reason) => write!(f, "joke generation failed: {reason}"),
            SessionFailure::Evaluation(reason) => write!(f, "evaluation failed: {reason}"),
            SessionFailure::EvaluationFormat { reason, .. } => {
                write!(f, "evaluation was not valid JSON: {reason}")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot {action} while {mode}")]
    InvalidTransition { action: &'static str, mode: Mode },

    #[error(transparent)]
    InvalidParameters(#[from] CoreError),

    #[error("no joke is on display")]
    NoJoke,
}

#[derive(Debug, Clone)]
pub struct Session {
    mode: Mode,
    messages: Vec<Message>,
    partial_reply: String,
    parameters: Option<JokeParameters>,
    /// Index into `messages` of the reply on display.
    joke_index: Option<usize>,
    evaluation: Option<EvaluationResult>,
    history: EvaluationHistory,
    last_failure: Option<SessionFailure>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            mode: Mode::AwaitingParameters,
            messages: Vec::new(),
            partial_reply: String::new(),
            parameters: None,
            joke_index: None,
            evaluation: None,
            history: EvaluationHistory::default(),
            last_failure: None,
        }
    }

    pub fn apply(&mut self, action: Action) -> Result<Effect, SessionError> {
        let name = action.name();

        match (self.mode, action) {
            (
                Mode::AwaitingParameters | Mode::JokeDisplayed | Mode::EvaluationDisplayed,
                Action::Generate(params),
            ) => {
                params.validate()?;
                self.evaluation = None;
                self.last_failure = None;
                self.joke_index = None;
                self.partial_reply.clear();
                self.messages.push(Message::new(
                    Role::User,
                    MessageKind::GenerationRequest,
                    prompt::generation_instruction(&params),
                ));
                self.parameters = Some(params.clone());
                self.mode = Mode::Generating;
                Ok(Effect::RequestGeneration(params))
            }

            (Mode::Generating, Action::ReplyChunk(chunk)) => {
                self.partial_reply.push_str(&chunk);
                Ok(Effect::None)
            }

            (Mode::Generating, Action::ReplyComplete) => {
                let reply = std::mem::take(&mut self.partial_reply);
                if reply.trim().is_empty() {
                    self.fail_generation("the model returned an empty reply".to_string());
                    return Ok(Effect::None);
                }
                self.messages
                    .push(Message::new(Role::Assistant, MessageKind::GenerationReply, reply));
                self.joke_index = Some(self.messages.len() - 1);
                self.mode = Mode::JokeDisplayed;
                Ok(Effect::None)
            }

            (Mode::Generating, Action::GenerationFailed(reason)) => {
                self.fail_generation(reason);
                Ok(Effect::None)
            }

            (Mode::JokeDisplayed, Action::Evaluate) => {
                let joke = self.current_joke().ok_or(SessionError::NoJoke)?.to_string();
                let parameters = self.parameters.clone().ok_or(SessionError::NoJoke)?;
                let request = prompt::evaluation_prompt(&joke, Some(&parameters));
                self.last_failure = None;
                self.messages.push(Message::new(
                    Role::User,
                    MessageKind::EvaluationRequest,
                    request.user,
                ));
                self.mode = Mode::EvaluationPending;
                Ok(Effect::RequestEvaluation { joke, parameters })
            }

            (Mode::EvaluationPending, Action::EvaluationReceived { raw, at }) => {
                match EvaluationResult::parse_strict(&raw) {
                    Ok(evaluation) => {
                        let joke = self.current_joke().ok_or(SessionError::NoJoke)?.to_string();
                        let parameters = self.parameters.clone().ok_or(SessionError::NoJoke)?;
                        self.messages.push(Message::new(
                            Role::Assistant,
                            MessageKind::EvaluationReply,
                            raw.trim(),
                        ));
                        self.history.record(EvaluationHistoryEntry {
                            joke,
                            parameters,
                            evaluation: evaluation.clone(),
                            timestamp: at,
                        });
                        self.evaluation = Some(evaluation);
                        self.mode = Mode::EvaluationDisplayed;
                    }
                    Err(e) => {
                        self.last_failure = Some(SessionFailure::EvaluationFormat {
                            reason: e.source.to_string(),
                            raw: Some(e.raw),
                        });
                        self.mode = Mode::JokeDisplayed;
                    }
                }
                Ok(Effect::None)
            }

            (Mode::EvaluationPending, Action::EvaluationRejected(reason)) => {
                self.last_failure = Some(SessionFailure::EvaluationFormat { raw: None, reason });
                self.mode = Mode::JokeDisplayed;
                Ok(Effect::None)
            }

            (Mode::EvaluationPending, Action::EvaluationFailed(reason)) => {
                self.last_failure = Some(SessionFailure::Evaluation(reason));
                self.mode = Mode::JokeDisplayed;
                Ok(Effect::None)
            }

            (mode, _) => Err(SessionError::InvalidTransition { action: name, mode }),
        }
    }

    fn fail_generation(&mut self, reason: String) {
        self.partial_reply.clear();
        self.joke_index = None;
        self.last_failure = Some(SessionFailure::Generation(reason));
        self.mode = Mode::AwaitingParameters;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The control to render, derived from the mode alone.
    pub fn control(&self) -> Control {
        match self.mode {
            Mode::AwaitingParameters | Mode::EvaluationDisplayed => Control::Generate,
            Mode::JokeDisplayed => Control::Evaluate,
            Mode::Generating | Mode::EvaluationPending => Control::Loading,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.mode, Mode::Generating | Mode::EvaluationPending)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Reply text received so far while generating.
    pub fn partial_reply(&self) -> &str {
        &self.partial_reply
    }

    /// The joke currently on display, located by index and kind.
    pub fn current_joke(&self) -> Option<&str> {
        self.joke_index
            .and_then(|i| self.messages.get(i))
            .filter(|m| m.is(MessageKind::GenerationReply))
            .map(|m| m.content.as_str())
    }

    pub fn parameters(&self) -> Option<&JokeParameters> {
        self.parameters.as_ref()
    }

    pub fn evaluation(&self) -> Option<&EvaluationResult> {
        self.evaluation.as_ref()
    }

    pub fn history(&self) -> &EvaluationHistory {
        &self.history
    }

    pub fn last_failure(&self) -> Option<&SessionFailure> {
        self.last_failure.as_ref()
    }
}
