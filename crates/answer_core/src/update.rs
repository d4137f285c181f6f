use crate::{ChatState, Effect, Msg, Outcome, StreamChunk};

/// Status shown on the placeholder bot turn until the backend reports progress.
pub const ANALYZING_STATUS: &str = "در حال تحلیل...";
/// Answer text for a rejected request whose body carries no `detail`.
pub const SERVER_ERROR_TEXT: &str = "خطا در سرور";
/// Answer text for a network-level failure.
pub const CONNECTION_ERROR_TEXT: &str = "خطا در اتصال به سرور.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ChatState, msg: Msg) -> (ChatState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::SendClicked => {
            let question = state.input().trim().to_string();
            if question.is_empty() || state.is_busy() {
                return (state, Vec::new());
            }
            let request_id = state.begin_exchange(question.clone(), ANALYZING_STATUS);
            vec![Effect::SubmitQuestion {
                request_id,
                question,
                session_id: state.session_id().clone(),
            }]
        }
        Msg::StopClicked => match state.request_cancel() {
            Some((request_id, session_id)) => vec![Effect::CancelRequest {
                request_id,
                session_id,
            }],
            None => Vec::new(),
        },
        Msg::ResetClicked => {
            let mut effects = Vec::with_capacity(2);
            if let Some((request_id, session_id)) = state.request_cancel() {
                effects.push(Effect::CancelRequest {
                    request_id,
                    session_id,
                });
            }
            state.clear_conversation();
            effects.push(Effect::RotateSessionId);
            effects
        }
        Msg::SessionIdAssigned(session_id) => {
            state.set_session_id(session_id);
            Vec::new()
        }
        Msg::ChunkReceived { request_id, chunk } => {
            if !state.is_current(request_id) {
                return (state, Vec::new());
            }
            apply_chunk(&mut state, chunk)
        }
        Msg::RequestRejected { request_id, detail } => {
            if !state.is_current(request_id) {
                return (state, Vec::new());
            }
            let text = detail
                .filter(|detail| !detail.is_empty())
                .unwrap_or_else(|| SERVER_ERROR_TEXT.to_string());
            state.replace_answer(text);
            finish(&mut state, Outcome::Rejected)
        }
        Msg::TransportFailed { request_id } => {
            if !state.is_current(request_id) {
                return (state, Vec::new());
            }
            state.replace_answer(CONNECTION_ERROR_TEXT.to_string());
            finish(&mut state, Outcome::Failed)
        }
        Msg::StreamClosed { request_id } => {
            if !state.is_current(request_id) {
                return (state, Vec::new());
            }
            finish(&mut state, Outcome::Closed)
        }
    };

    (state, effects)
}

fn apply_chunk(state: &mut ChatState, chunk: StreamChunk) -> Vec<Effect> {
    match chunk {
        StreamChunk::Status { content } => {
            state.apply_status(content);
            Vec::new()
        }
        StreamChunk::Answer { content } => {
            state.apply_answer(&content);
            Vec::new()
        }
        StreamChunk::Done {
            sources,
            keywords,
            found_in_docs,
        } => {
            state.apply_done(&sources, keywords, found_in_docs);
            finish(state, Outcome::Answered)
        }
        StreamChunk::Cancelled { content } => {
            match content.filter(|text| !text.is_empty()) {
                Some(text) => state.replace_answer(text),
                None => state.mark_not_found(),
            }
            finish(state, Outcome::Cancelled)
        }
        StreamChunk::Error { content } => {
            match content.filter(|text| !text.is_empty()) {
                Some(text) => state.replace_answer(text),
                None => state.mark_not_found(),
            }
            finish(state, Outcome::Failed)
        }
    }
}

fn finish(state: &mut ChatState, outcome: Outcome) -> Vec<Effect> {
    if state.finish(outcome) {
        vec![Effect::FocusInput]
    } else {
        Vec::new()
    }
}
