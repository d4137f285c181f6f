use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use answer_core::{RequestId, SessionId, StreamChunk};
use answer_logging::{answer_debug, answer_info, answer_warn};

use crate::transport::{ChunkSink, Transport};
use crate::{AskRequest, EngineEvent, FailureKind};

enum EngineCommand {
    Ask {
        request_id: RequestId,
        request: AskRequest,
    },
    Cancel {
        session_id: SessionId,
    },
}

/// Runs transport calls on a background tokio runtime and reports their
/// progress as [`EngineEvent`]s.
pub struct AnswerEngine {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl AnswerEngine {
    pub fn new(transport: Arc<dyn Transport>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::Builder::new()
            .name("answer-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let transport = transport.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(transport.as_ref(), command, event_tx).await;
                    });
                }
                answer_debug!("Engine command channel closed");
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn ask(&self, request_id: RequestId, request: AskRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Ask {
            request_id,
            request,
        });
    }

    pub fn cancel(&self, session_id: SessionId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { session_id });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

struct ChannelChunkSink {
    request_id: RequestId,
    tx: mpsc::Sender<EngineEvent>,
}

impl ChunkSink for ChannelChunkSink {
    fn emit(&self, chunk: StreamChunk) {
        let _ = self.tx.send(EngineEvent::Chunk {
            request_id: self.request_id,
            chunk,
        });
    }
}

async fn handle_command(
    transport: &dyn Transport,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Ask {
            request_id,
            request,
        } => {
            answer_info!(
                "Ask request_id={} session={} question_len={}",
                request_id,
                request.session_id,
                request.question.chars().count()
            );
            let sink = ChannelChunkSink {
                request_id,
                tx: event_tx.clone(),
            };
            let event = match transport.ask(&request, &sink).await {
                Ok(()) => EngineEvent::Closed { request_id },
                Err(err) => match err.kind {
                    FailureKind::Rejected { status, detail } => {
                        answer_warn!("Ask {} rejected with status {}", request_id, status);
                        EngineEvent::Rejected { request_id, detail }
                    }
                    _ => {
                        answer_warn!("Ask {} failed: {}", request_id, err);
                        EngineEvent::Failed {
                            request_id,
                            error: err,
                        }
                    }
                },
            };
            let _ = event_tx.send(event);
        }
        EngineCommand::Cancel { session_id } => {
            // Cancellation is advisory; the stream still decides how the exchange ends.
            if let Err(err) = transport.cancel(&session_id).await {
                answer_warn!("Cancel for session {} failed: {}", session_id, err);
            }
        }
    }
}
