//! Where delivery failures go instead of the conversation.

use std::fmt;

use cw_domain::chat::SessionId;
use cw_domain::error::Error;
use cw_domain::trace::TraceEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    RecordTranscript,
    SubmitProfile,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RecordTranscript => "record_transcript",
            Self::SubmitProfile => "submit_profile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The call did not finish within the delivery timeout.
    Timeout,
    /// The transport reported an error or a non-2xx status.
    Error,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Error => "error",
        }
    }
}

/// A delivery that did not make it. Never retried.
#[derive(Debug, Clone)]
pub struct DeliveryFailure {
    pub session_id: SessionId,
    pub operation: Operation,
    pub kind: FailureKind,
    pub error: String,
}

impl DeliveryFailure {
    pub fn from_error(session_id: SessionId, operation: Operation, err: &Error) -> Self {
        let kind = match err {
            Error::Timeout(_) => FailureKind::Timeout,
            _ => FailureKind::Error,
        };
        Self {
            session_id,
            operation,
            kind,
            error: err.to_string(),
        }
    }
}

impl fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} for session {} failed ({}): {}",
            self.operation.as_str(),
            self.session_id,
            self.kind.as_str(),
            self.error
        )
    }
}

/// Error channel for delivery failures.
pub trait FailureReporter: Send + Sync {
    fn report(&self, failure: &DeliveryFailure);
}

/// Logs failures at `warn` and emits a [`TraceEvent::DeliveryFailed`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl FailureReporter for TracingReporter {
    fn report(&self, failure: &DeliveryFailure) {
        tracing::warn!(
            session_id = %failure.session_id,
            operation = failure.operation.as_str(),
            kind = failure.kind.as_str(),
            error = %failure.error,
            "delivery failed"
        );
        TraceEvent::DeliveryFailed {
            session_id: failure.session_id.to_string(),
            operation: failure.operation.as_str().to_owned(),
            kind: failure.kind.as_str().to_owned(),
            error: failure.error.clone(),
        }
        .emit();
    }
}
