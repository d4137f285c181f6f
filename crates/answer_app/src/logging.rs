//! Logging initialization for the answer_chat binary.
//!
//! The terminal belongs to the conversation, so the default destination is
//! `./answer.log` in the current working directory.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "./answer.log";

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// `./answer.log` in the working directory.
    File,
    /// Stderr, so the conversation on stdout stays clean.
    Terminal,
    Both,
}

impl LogDestination {
    /// Parses `file`, `terminal` or `both`, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "file" => Some(Self::File),
            "terminal" => Some(Self::Terminal),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    fn writes_terminal(self) -> bool {
        matches!(self, Self::Terminal | Self::Both)
    }

    fn writes_file(self) -> bool {
        matches!(self, Self::File | Self::Both)
    }
}

/// Installs the global logger. A failing log file is reported on stderr and skipped.
pub fn initialize(destination: LogDestination) {
    let level = LevelFilter::Info;
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::with_capacity(2);
    if destination.writes_terminal() {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if destination.writes_file() {
        if let Some(file_logger) = open_log_file(level, config) {
            loggers.push(file_logger);
        }
    }
    if loggers.is_empty() {
        return;
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn open_log_file(level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    let path = Path::new(LOG_FILE);
    File::create(path)
        .map(|file| WriteLogger::new(level, config, file))
        .map_err(|err| eprintln!("answer_chat: cannot open {}: {}", path.display(), err))
        .ok()
}
