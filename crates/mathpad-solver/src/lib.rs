#![warn(missing_docs)]
//! `mathpad-solver` - remote solver integration for `mathpad-core`.
//!
//! The engine core never talks to the network; this crate implements the consumed
//! side of the solver protocol: four request kinds (`hint`, `step`, `validate`,
//! `answer`), each carrying the full current buffer text and returning one
//! JSON-shaped response, applied back onto a
//! [`DerivationSession`](mathpad_core::DerivationSession).
//!
//! The crate intentionally stays runtime-agnostic: transports are blocking and
//! pluggable via [`SolverTransport`], and the bundled HTTP transport is
//! feature-gated behind `http` so that consumers wiring their own I/O pull in no
//! HTTP dependency.

pub mod client;
pub mod protocol;
pub mod transport;

pub use client::{RequestOutcome, SolverClient};
pub use protocol::{
    AnswerReply, SolverError, StepReply, answer_from_value, error_from_value, hint_from_value,
    step_from_value, watermark_from_value,
};
pub use transport::{SolverTransport, TransportError, endpoint};

#[cfg(feature = "http")]
pub use transport::HttpTransport;
