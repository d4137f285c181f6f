use crate::{Phase, SessionId, Turn};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatViewModel {
    pub session_id: SessionId,
    pub phase: Phase,
    pub busy: bool,
    pub send_enabled: bool,
    pub stop_visible: bool,
    pub input: String,
    pub welcome_visible: bool,
    pub turns: Vec<Turn>,
}

impl ChatViewModel {
    /// The most recent bot turn, if any.
    pub fn last_bot(&self) -> Option<&crate::BotTurn> {
        self.turns.iter().rev().find_map(|turn| match turn {
            Turn::Bot(bot) => Some(bot),
            Turn::User { .. } => None,
        })
    }
}
