use std::time::{Duration, Instant};

use answer_client::{generate_session_id, AnswerEngine, AskRequest, EngineEvent, SessionStore};
use answer_core::{update, ChatState, ChatViewModel, Effect, Msg, SessionId};
use answer_logging::{answer_debug, answer_info, answer_warn};

use crate::presenter::Presenter;

/// One client's question/answer conversation with the backend.
///
/// `send` and `cancel` return immediately; transport progress is applied
/// when the owner calls [`pump`](Self::pump) or one of the `wait_*` methods.
pub struct StreamingAnswerSession<P: Presenter> {
    state: ChatState,
    engine: AnswerEngine,
    store: Box<dyn SessionStore>,
    presenter: P,
}

impl<P: Presenter> StreamingAnswerSession<P> {
    pub fn new(engine: AnswerEngine, mut store: Box<dyn SessionStore>, presenter: P) -> Self {
        let session_id = store.load_or_create().unwrap_or_else(|err| {
            answer_warn!("Using an unsaved session id: {}", err);
            generate_session_id()
        });
        answer_info!("Chat session {} ready", session_id);

        let mut session = Self {
            state: ChatState::new(session_id),
            engine,
            store,
            presenter,
        };
        session.presenter.render(&session.state.view());
        session
    }

    pub fn input_changed(&mut self, text: impl Into<String>) {
        self.dispatch(Msg::InputChanged(text.into()));
    }

    /// Submits `question`. Returns `false` when it is blank or an exchange is already running.
    pub fn send(&mut self, question: &str) -> bool {
        if self.state.is_busy() {
            answer_debug!("Send ignored while an exchange is running");
            return false;
        }
        self.dispatch(Msg::InputChanged(question.to_string()));
        self.dispatch(Msg::SendClicked);
        let accepted = self.state.is_busy();
        if !accepted {
            answer_debug!("Send ignored for blank question");
        }
        accepted
    }

    pub fn cancel(&mut self) {
        self.dispatch(Msg::StopClicked);
    }

    pub fn reset(&mut self) {
        self.dispatch(Msg::ResetClicked);
    }

    /// Applies every transport event received so far without blocking.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.engine.try_recv() {
            self.apply_event(event);
            applied += 1;
        }
        applied
    }

    /// Blocks on transport events until `done` holds for the view or `timeout` elapses.
    pub fn wait_until(
        &mut self,
        timeout: Duration,
        done: impl Fn(&ChatViewModel) -> bool,
    ) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if done(&self.state.view()) {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            if let Some(event) = self.engine.recv_timeout(remaining) {
                self.apply_event(event);
            }
        }
    }

    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        self.wait_until(timeout, |view| !view.busy)
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn session_id(&self) -> &SessionId {
        self.state.session_id()
    }

    pub fn view(&self) -> ChatViewModel {
        self.state.view()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    fn apply_event(&mut self, event: EngineEvent) {
        let msg = match event {
            EngineEvent::Chunk { request_id, chunk } => Msg::ChunkReceived { request_id, chunk },
            EngineEvent::Rejected { request_id, detail } => {
                Msg::RequestRejected { request_id, detail }
            }
            EngineEvent::Failed { request_id, error } => {
                answer_warn!("Request {} failed: {}", request_id, error);
                Msg::TransportFailed { request_id }
            }
            EngineEvent::Closed { request_id } => Msg::StreamClosed { request_id },
        };
        self.dispatch(msg);
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        if self.state.consume_dirty() {
            self.presenter.render(&self.state.view());
        }
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitQuestion {
                    request_id,
                    question,
                    session_id,
                } => {
                    self.engine
                        .ask(request_id, AskRequest::new(question, &session_id));
                }
                Effect::CancelRequest {
                    request_id,
                    session_id,
                } => {
                    answer_info!("Cancelling request {} (session {})", request_id, session_id);
                    self.engine.cancel(session_id);
                }
                Effect::RotateSessionId => {
                    let session_id = self.store.rotate().unwrap_or_else(|err| {
                        answer_warn!("Session id rotation not persisted: {}", err);
                        generate_session_id()
                    });
                    self.dispatch(Msg::SessionIdAssigned(session_id));
                }
                Effect::FocusInput => self.presenter.focus_input(),
            }
        }
    }
}
