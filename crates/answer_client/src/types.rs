use std::fmt;

use answer_core::{RequestId, SessionId, StreamChunk};
use serde::Serialize;

/// JSON body of `POST {base}/ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskRequest {
    pub question: String,
    pub session_id: String,
}

impl AskRequest {
    pub fn new(question: impl Into<String>, session_id: &SessionId) -> Self {
        Self {
            question: question.into(),
            session_id: session_id.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Chunk {
        request_id: RequestId,
        chunk: StreamChunk,
    },
    Rejected {
        request_id: RequestId,
        detail: Option<String>,
    },
    Failed {
        request_id: RequestId,
        error: TransportError,
    },
    /// The response body ended, with or without a terminal chunk.
    Closed { request_id: RequestId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for TransportError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidRequest,
    /// Non-2xx status; `detail` comes from the JSON error body.
    Rejected { status: u16, detail: Option<String> },
    /// A 200 body that is neither a frame stream nor a direct answer.
    Protocol,
    Timeout,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::Rejected { status, detail } => match detail {
                Some(detail) => write!(f, "rejected with status {status}: {detail}"),
                None => write!(f, "rejected with status {status}"),
            },
            FailureKind::Protocol => write!(f, "unexpected response body"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
