use std::io::{self, BufRead};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use answer_app::logging;
use answer_app::{
    parse_command, AppConfig, Command, StreamingAnswerSession, TerminalPresenter, WELCOME_TEXT,
};
use answer_client::{AnswerEngine, FileSessionStore, ReqwestTransport};
use answer_logging::answer_info;

/// How often pending stream events are applied while waiting for input.
const POLL_INTERVAL: Duration = Duration::from_millis(75);
/// Grace period for a running exchange after stdin closes.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(120);

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    logging::initialize(config.log_destination);
    answer_info!("Starting answer_chat against {}", config.transport.base_url);

    let transport = ReqwestTransport::new(config.transport.clone())?;
    let engine = AnswerEngine::new(Arc::new(transport))?;
    let store = Box::new(FileSessionStore::new(config.state_dir.clone()));
    let presenter = TerminalPresenter::new(io::stdout(), WELCOME_TEXT);
    let mut session = StreamingAnswerSession::new(engine, store, presenter);

    let lines = spawn_stdin_reader();
    loop {
        session.pump();
        match lines.recv_timeout(POLL_INTERVAL) {
            Ok(line) => match parse_command(&line) {
                Command::Ask(question) => {
                    if !session.send(&question) {
                        println!("(busy, type /stop to cancel)");
                    }
                }
                Command::Stop => session.cancel(),
                Command::Reset => session.reset(),
                Command::Quit => break,
                Command::Empty => {}
            },
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                session.wait_idle(DRAIN_TIMEOUT);
                break;
            }
        }
    }

    answer_info!("answer_chat exiting (session {})", session.session_id());
    Ok(())
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
