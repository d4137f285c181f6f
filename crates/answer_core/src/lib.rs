//! Answer core: pure chat state machine and view-model helpers.
mod chunk;
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use chunk::{Source, SourceTag, StreamChunk};
pub use effect::Effect;
pub use msg::Msg;
pub use state::{BotTurn, ChatState, Outcome, Phase, RequestId, SessionId, Turn};
pub use update::{update, ANALYZING_STATUS, CONNECTION_ERROR_TEXT, SERVER_ERROR_TEXT};
pub use view_model::ChatViewModel;
