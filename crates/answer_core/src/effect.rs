use crate::{RequestId, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open the streaming `/ask` request.
    SubmitQuestion {
        request_id: RequestId,
        question: String,
        session_id: SessionId,
    },
    /// Best-effort backend cancellation; failures are swallowed by the runner.
    CancelRequest {
        request_id: RequestId,
        session_id: SessionId,
    },
    /// Issue and persist a fresh session identifier, then report it back.
    RotateSessionId,
    /// Return keyboard focus to the question input.
    FocusInput,
}
