//! Request lifecycle: gating, transport, and response application.
//!
//! [`SolverClient`] drives one request end to end against a
//! [`DerivationSession`]:
//!
//! 1. acquire the single-flight slot (suppressed entirely when unavailable)
//! 2. post the full buffer text through the transport
//! 3. release the slot unconditionally, success or failure
//! 4. short-circuit on an `error` field, silently drop falsy replies
//! 5. apply the reply to the session
//!
//! Response handlers that append multiple sequential steps force a synchronous
//! reconciliation pass after each append, so every step becomes visible in order
//! and its accompanying hint lands at the new tail. There is no cancellation and
//! no retry: every failure is reported once and requires a new user action.

use crate::protocol::{
    SolverError, answer_from_value, error_from_value, hint_from_value, step_from_value,
    watermark_from_value,
};
use crate::transport::SolverTransport;
use mathpad_core::{DerivationSession, RequestKind};
use serde_json::Value;

/// How a request attempt ended, for the non-error cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The reply was applied to the session.
    Applied,
    /// The request was never issued: another request was in flight or a
    /// precondition failed. Not an error; nothing is queued.
    Suppressed,
    /// The request completed but the reply carried nothing applicable
    /// (falsy body or missing fields); dropped without user-visible effect.
    Ignored,
}

enum Exchange {
    Suppressed,
    Ignored,
    Reply(Value),
}

/// A solver client bound to one transport.
pub struct SolverClient<T: SolverTransport> {
    transport: T,
}

impl<T: SolverTransport> SolverClient<T> {
    /// Create a client over `transport`.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Consume the client and return its transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Ask for a hint and attach it after the last rendered line.
    ///
    /// Suppressed while a request is in flight, while the buffer holds no
    /// logical line, or while a hint is already displayed at the tail.
    pub fn request_hint(
        &mut self,
        session: &mut DerivationSession,
    ) -> Result<RequestOutcome, SolverError> {
        let value = match self.exchange(session, RequestKind::Hint)? {
            Exchange::Suppressed => return Ok(RequestOutcome::Suppressed),
            Exchange::Ignored => return Ok(RequestOutcome::Ignored),
            Exchange::Reply(value) => value,
        };

        match hint_from_value(&value) {
            Some(hint) => {
                session.set_tail_hint(hint);
                Ok(RequestOutcome::Applied)
            }
            None => Ok(RequestOutcome::Ignored),
        }
    }

    /// Ask for the next derivation step and append it to the buffer.
    pub fn request_step(
        &mut self,
        session: &mut DerivationSession,
    ) -> Result<RequestOutcome, SolverError> {
        let value = match self.exchange(session, RequestKind::Step)? {
            Exchange::Suppressed => return Ok(RequestOutcome::Suppressed),
            Exchange::Ignored => return Ok(RequestOutcome::Ignored),
            Exchange::Reply(value) => value,
        };

        let reply = step_from_value(&value);
        if reply.step.is_none() && reply.hint.is_none() {
            return Ok(RequestOutcome::Ignored);
        }

        if let Some(step) = &reply.step {
            session.append_line(step);
            session.refresh();
        }
        if let Some(hint) = reply.hint {
            session.set_tail_hint(hint);
        }
        Ok(RequestOutcome::Applied)
    }

    /// Ask for a validation verdict over the whole derivation and apply the
    /// watermark to the rendered lines.
    pub fn request_validate(
        &mut self,
        session: &mut DerivationSession,
    ) -> Result<RequestOutcome, SolverError> {
        let value = match self.exchange(session, RequestKind::Validate)? {
            Exchange::Suppressed => return Ok(RequestOutcome::Suppressed),
            Exchange::Ignored => return Ok(RequestOutcome::Ignored),
            Exchange::Reply(value) => value,
        };

        match watermark_from_value(&value) {
            Some(watermark) => {
                session.apply_validation(&watermark);
                Ok(RequestOutcome::Applied)
            }
            None => Ok(RequestOutcome::Ignored),
        }
    }

    /// Ask for all remaining steps to the final answer and apply them in order,
    /// reconciling after each one.
    pub fn request_answer(
        &mut self,
        session: &mut DerivationSession,
    ) -> Result<RequestOutcome, SolverError> {
        let value = match self.exchange(session, RequestKind::Answer)? {
            Exchange::Suppressed => return Ok(RequestOutcome::Suppressed),
            Exchange::Ignored => return Ok(RequestOutcome::Ignored),
            Exchange::Reply(value) => value,
        };

        let reply = answer_from_value(&value);
        if reply.steps.is_empty() && reply.hint.is_none() {
            return Ok(RequestOutcome::Ignored);
        }

        for step in &reply.steps {
            if let Some(text) = &step.step {
                session.append_line(text);
                // Each step must be visible before the next one is applied.
                session.refresh();
            }
            if let Some(hint) = &step.hint {
                session.set_tail_hint(hint.clone());
            }
        }
        if let Some(hint) = reply.hint {
            session.set_tail_hint(hint);
        }
        Ok(RequestOutcome::Applied)
    }

    fn exchange(
        &mut self,
        session: &mut DerivationSession,
        kind: RequestKind,
    ) -> Result<Exchange, SolverError> {
        if !session.begin_request(kind) {
            tracing::debug!(?kind, "solver request suppressed");
            return Ok(Exchange::Suppressed);
        }

        tracing::debug!(?kind, "issuing solver request");
        let result = self.transport.post(kind, session.buffer());
        // The single-flight slot is released no matter how the request ended.
        session.finish_request();

        let value = match result {
            Ok(Some(value)) => value,
            Ok(None) => {
                tracing::debug!(?kind, "empty solver reply ignored");
                return Ok(Exchange::Ignored);
            }
            Err(err) => {
                tracing::warn!(?kind, %err, "solver transport failed");
                return Err(err.into());
            }
        };

        if let Some(message) = error_from_value(&value) {
            tracing::warn!(?kind, error = message, "solver reported an error");
            return Err(SolverError::Application(message.to_string()));
        }

        Ok(Exchange::Reply(value))
    }
}
