//! Answer client: streaming transport, frame decoding and effect execution.
mod engine;
mod frame;
mod persist;
mod session_store;
mod transport;
mod types;

pub use engine::AnswerEngine;
pub use frame::{decode_frame, FrameDecoder, FRAME_PREFIX};
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use session_store::{
    generate_session_id, FileSessionStore, MemorySessionStore, SessionStore, SessionStoreError,
    SESSION_FILENAME,
};
pub use transport::{ChunkSink, ReqwestTransport, Transport, TransportSettings};
pub use types::{AskRequest, EngineEvent, FailureKind, TransportError};
