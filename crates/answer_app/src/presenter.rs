use std::io::{self, Write};

use answer_core::{BotTurn, ChatViewModel, Outcome, Turn};
use answer_logging::answer_warn;

/// Placeholder shown before the first question of a conversation.
pub const WELCOME_TEXT: &str = "سوال فقهی خود را بپرسید.";

/// Render callbacks driven by [`crate::StreamingAnswerSession`].
pub trait Presenter {
    /// Called after every state change with the full view.
    fn render(&mut self, view: &ChatViewModel);

    /// Called once when an exchange ends.
    fn focus_input(&mut self) {}
}

/// Line-oriented presenter: prints each turn once and streams answer text as it grows.
pub struct TerminalPresenter<W: Write> {
    out: W,
    welcome_text: String,
    welcome_shown: bool,
    /// Turns already printed in full.
    settled_turns: usize,
    status: Option<String>,
    printed_answer: String,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, welcome_text: impl Into<String>) -> Self {
        Self {
            out,
            welcome_text: welcome_text.into(),
            welcome_shown: false,
            settled_turns: 0,
            status: None,
            printed_answer: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn try_render(&mut self, view: &ChatViewModel) -> io::Result<()> {
        if view.welcome_visible {
            if !self.welcome_shown {
                writeln!(self.out, "{}", self.welcome_text)?;
                self.welcome_shown = true;
                self.settled_turns = 0;
                self.status = None;
                self.printed_answer.clear();
            }
            return self.out.flush();
        }
        self.welcome_shown = false;

        for (index, turn) in view.turns.iter().enumerate().skip(self.settled_turns) {
            match turn {
                Turn::User { text } => {
                    writeln!(self.out, "> {text}")?;
                    self.settled_turns = index + 1;
                }
                Turn::Bot(bot) => {
                    self.render_bot(bot)?;
                    if bot.outcome.is_none() {
                        break;
                    }
                    self.settled_turns = index + 1;
                    self.status = None;
                    self.printed_answer.clear();
                }
            }
        }
        self.out.flush()
    }

    fn render_bot(&mut self, bot: &BotTurn) -> io::Result<()> {
        if let Some(status) = &bot.status {
            if self.status.as_ref() != Some(status) {
                writeln!(self.out, "… {status}")?;
                self.status = Some(status.clone());
            }
        }

        if bot.answer_visible && bot.answer != self.printed_answer {
            match bot.answer.strip_prefix(self.printed_answer.as_str()) {
                Some(delta) => write!(self.out, "{delta}")?,
                None => {
                    // Replaced by a cancel/error message.
                    if !self.printed_answer.is_empty() {
                        writeln!(self.out)?;
                    }
                    write!(self.out, "{}", bot.answer)?;
                }
            }
            self.printed_answer = bot.answer.clone();
        }

        let Some(outcome) = bot.outcome else {
            return Ok(());
        };
        if !self.printed_answer.is_empty() {
            writeln!(self.out)?;
        }
        if !bot.keywords.is_empty() {
            writeln!(self.out, "  # {}", bot.keywords.join(" · "))?;
        }
        if !bot.sources.is_empty() {
            let tags: Vec<&str> = bot.sources.iter().map(|tag| tag.text.as_str()).collect();
            writeln!(self.out, "  ↳ {}", tags.join(" | "))?;
        }
        if bot.not_found && outcome == Outcome::Answered {
            writeln!(self.out, "  (not found in documents)")?;
        }
        if outcome == Outcome::Cancelled && bot.answer.is_empty() {
            writeln!(self.out, "  (cancelled)")?;
        }
        Ok(())
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn render(&mut self, view: &ChatViewModel) {
        if let Err(err) = self.try_render(view) {
            answer_warn!("Terminal render failed: {}", err);
        }
    }

    fn focus_input(&mut self) {
        let _ = write!(self.out, "? ").and_then(|()| self.out.flush());
    }
}
