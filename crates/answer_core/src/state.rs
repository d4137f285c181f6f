use std::fmt;

use crate::chunk::{Source, SourceTag};
use crate::view_model::ChatViewModel;

pub type RequestId = u64;

/// Per-profile token that lets the backend correlate exchanges into one conversation memory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Request issued; only status frames seen so far.
    Sending,
    /// At least one answer fragment arrived.
    Receiving,
}

/// How an exchange ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Answered,
    Cancelled,
    Failed,
    Rejected,
    /// The stream closed without a terminal chunk.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    User { text: String },
    Bot(BotTurn),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BotTurn {
    /// Progress line; `None` once removed.
    pub status: Option<String>,
    /// Full answer so far, or the replacement message of a failed exchange.
    pub answer: String,
    pub answer_visible: bool,
    pub not_found: bool,
    pub keywords: Vec<String>,
    pub sources: Vec<SourceTag>,
    pub outcome: Option<Outcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlight {
    request_id: RequestId,
    session_id: SessionId,
    cancel_requested: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatState {
    session_id: SessionId,
    input: String,
    phase: Phase,
    in_flight: Option<InFlight>,
    next_request_id: RequestId,
    turns: Vec<Turn>,
    welcome: bool,
    dirty: bool,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new(SessionId::default())
    }
}

impl ChatState {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            input: String::new(),
            phase: Phase::Idle,
            in_flight: None,
            next_request_id: 1,
            turns: Vec::new(),
            welcome: true,
            dirty: false,
        }
    }

    pub fn view(&self) -> ChatViewModel {
        let busy = self.is_busy();
        ChatViewModel {
            session_id: self.session_id.clone(),
            phase: self.phase,
            busy,
            send_enabled: !busy,
            stop_visible: busy,
            input: self.input.clone(),
            welcome_visible: self.welcome,
            turns: self.turns.clone(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn active_request(&self) -> Option<RequestId> {
        self.in_flight.as_ref().map(|flight| flight.request_id)
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_session_id(&mut self, session_id: SessionId) {
        self.session_id = session_id;
        self.mark_dirty();
    }

    pub(crate) fn is_current(&self, request_id: RequestId) -> bool {
        self.active_request() == Some(request_id)
    }

    /// Echoes the question, opens a placeholder bot turn and marks the state busy.
    pub(crate) fn begin_exchange(&mut self, question: String, status: &str) -> RequestId {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.input.clear();
        self.welcome = false;
        self.turns.push(Turn::User { text: question });
        self.turns.push(Turn::Bot(BotTurn {
            status: Some(status.to_string()),
            ..BotTurn::default()
        }));
        self.in_flight = Some(InFlight {
            request_id,
            session_id: self.session_id.clone(),
            cancel_requested: false,
        });
        self.phase = Phase::Sending;
        self.mark_dirty();
        request_id
    }

    /// Marks the in-flight request as cancelling. Returns `None` when idle or
    /// when a cancel was already issued for this request.
    pub(crate) fn request_cancel(&mut self) -> Option<(RequestId, SessionId)> {
        let flight = self.in_flight.as_mut()?;
        if flight.cancel_requested {
            return None;
        }
        flight.cancel_requested = true;
        Some((flight.request_id, flight.session_id.clone()))
    }

    pub(crate) fn apply_status(&mut self, content: String) {
        let Some(bot) = self.active_bot_mut() else {
            return;
        };
        // Removed on the first answer fragment and never restored.
        if let Some(status) = bot.status.as_mut() {
            *status = content;
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_answer(&mut self, content: &str) {
        let Some(bot) = self.active_bot_mut() else {
            return;
        };
        bot.status = None;
        bot.answer_visible = true;
        bot.answer.push_str(content);
        self.phase = Phase::Receiving;
        self.mark_dirty();
    }

    pub(crate) fn apply_done(&mut self, sources: &[Source], keywords: Vec<String>, found: bool) {
        let Some(bot) = self.active_bot_mut() else {
            return;
        };
        bot.status = None;
        bot.keywords = keywords;
        bot.sources = sources.iter().map(SourceTag::from_source).collect();
        bot.not_found = !found;
        self.mark_dirty();
    }

    /// Replaces the answer area with `text` in the not-found style.
    pub(crate) fn replace_answer(&mut self, text: String) {
        let Some(bot) = self.active_bot_mut() else {
            return;
        };
        bot.status = None;
        bot.answer = text;
        bot.answer_visible = true;
        bot.not_found = true;
        self.mark_dirty();
    }

    /// Keeps whatever answer arrived and switches it to the not-found style.
    pub(crate) fn mark_not_found(&mut self) {
        let Some(bot) = self.active_bot_mut() else {
            return;
        };
        bot.not_found = true;
        self.mark_dirty();
    }

    /// Termination bookkeeping. Returns `false` if nothing was in flight.
    pub(crate) fn finish(&mut self, outcome: Outcome) -> bool {
        if self.in_flight.is_none() {
            return false;
        }
        if let Some(bot) = self.active_bot_mut() {
            bot.status = None;
            bot.outcome = Some(outcome);
        }
        self.in_flight = None;
        self.phase = Phase::Idle;
        self.mark_dirty();
        true
    }

    /// Drops the transcript and any in-flight exchange, restoring the welcome placeholder.
    pub(crate) fn clear_conversation(&mut self) {
        self.turns.clear();
        self.in_flight = None;
        self.phase = Phase::Idle;
        self.welcome = true;
        self.mark_dirty();
    }

    fn active_bot_mut(&mut self) -> Option<&mut BotTurn> {
        self.in_flight.as_ref()?;
        match self.turns.last_mut() {
            Some(Turn::Bot(bot)) => Some(bot),
            _ => None,
        }
    }
}
