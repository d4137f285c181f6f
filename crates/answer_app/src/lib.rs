//! Answer app: wires the chat state machine to the streaming engine and a presenter.
mod command;
mod config;
pub mod logging;
mod presenter;
mod session;

pub use command::{parse_command, Command};
pub use config::AppConfig;
pub use presenter::{Presenter, TerminalPresenter, WELCOME_TEXT};
pub use session::StreamingAnswerSession;
