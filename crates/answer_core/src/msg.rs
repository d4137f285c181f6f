use crate::{RequestId, SessionId, StreamChunk};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the question input.
    InputChanged(String),
    /// User asked to send the current input.
    SendClicked,
    /// User clicked Stop.
    StopClicked,
    /// User cleared the conversation.
    ResetClicked,
    /// A session identifier was loaded or rotated.
    SessionIdAssigned(SessionId),
    /// One decoded frame of the answer stream.
    ChunkReceived {
        request_id: RequestId,
        chunk: StreamChunk,
    },
    /// Backend answered the initial request with a non-2xx status.
    RequestRejected {
        request_id: RequestId,
        detail: Option<String>,
    },
    /// Network failure before or while reading the stream.
    TransportFailed { request_id: RequestId },
    /// The response body ended.
    StreamClosed { request_id: RequestId },
}
