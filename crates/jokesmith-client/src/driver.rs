//! Connects the session reducer to the gateway.
//!
//! Network outcomes are fed back into the session as actions; failures end up
//! in [`Session::last_failure`] instead of being returned, so the caller can
//! always render the state it is left in.

use futures::StreamExt;
use jokesmith_core::models::parameters::JokeParameters;
use jokesmith_core::session::{Action, Effect, Session, SessionError, SessionFailure};
use tracing::warn;

use crate::api::{ClientError, GatewayClient};

pub struct Driver {
    session: Session,
    gateway: GatewayClient,
}

impl Driver {
    pub fn new(gateway: GatewayClient) -> Self {
        Self {
            session: Session::new(),
            gateway,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Generate a joke, handing each chunk to `on_chunk` as it arrives.
    pub async fn generate(
        &mut self,
        params: JokeParameters,
        mut on_chunk: impl FnMut(&str),
    ) -> Result<(), SessionError> {
        let Effect::RequestGeneration(params) = self.session.apply(Action::Generate(params))? else {
            return Ok(());
        };

        let mut stream = match self.gateway.generate(&params).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "generation request failed");
                self.session.apply(Action::GenerationFailed(e.to_string()))?;
                return Ok(());
            }
        };

        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(text) => {
                    on_chunk(&text);
                    self.session.apply(Action::ReplyChunk(text))?;
                }
                Err(e) => {
                    warn!(error = %e, "generation stream failed");
                    self.session.apply(Action::GenerationFailed(e.to_string()))?;
                    return Ok(());
                }
            }
        }

        self.session.apply(Action::ReplyComplete)?;
        Ok(())
    }

    /// Evaluate the joke on display. Starts only after the reply has been
    /// joined into one message.
    pub async fn evaluate(&mut self) -> Result<(), SessionError> {
        let Effect::RequestEvaluation { joke, parameters } = self.session.apply(Action::Evaluate)?
        else {
            return Ok(());
        };

        let action = match self.gateway.evaluate(&joke, &parameters).await {
            Ok(raw) => Action::EvaluationReceived {
                raw,
                at: jiff::Timestamp::now(),
            },
            Err(ClientError::MalformedEvaluation) => {
                Action::EvaluationRejected(ClientError::MalformedEvaluation.to_string())
            }
            Err(e) => {
                warn!(error = %e, "evaluation request failed");
                Action::EvaluationFailed(e.to_string())
            }
        };
        self.session.apply(action)?;

        if let Some(SessionFailure::EvaluationFormat { raw, reason }) = self.session.last_failure() {
            warn!(
                raw = raw.as_deref().unwrap_or("<logged by gateway>"),
                reason = %reason,
                "evaluation discarded"
            );
        }
        Ok(())
    }
}
