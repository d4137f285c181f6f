use std::path::PathBuf;

use answer_client::TransportSettings;

use crate::logging::LogDestination;

const ENV_API_BASE: &str = "ANSWER_API_BASE";
const ENV_API_TOKEN: &str = "ANSWER_API_TOKEN";
const ENV_STATE_DIR: &str = "ANSWER_STATE_DIR";
const ENV_LOG: &str = "ANSWER_LOG";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub transport: TransportSettings,
    /// Where the session identifier is persisted.
    pub state_dir: PathBuf,
    pub log_destination: LogDestination,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from `lookup`, falling back to defaults for unset or blank keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut transport = TransportSettings::default();
        if let Some(base_url) = get(ENV_API_BASE) {
            transport.base_url = base_url.trim().to_string();
        }
        transport.token = get(ENV_API_TOKEN).map(|token| token.trim().to_string());

        let state_dir = get(ENV_STATE_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(".answer")
            });

        let log_destination = get(ENV_LOG)
            .and_then(|raw| LogDestination::parse(&raw))
            .unwrap_or(LogDestination::File);

        Self {
            transport,
            state_dir,
            log_destination,
        }
    }
}
