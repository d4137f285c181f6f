use std::fs;
use std::path::{Path, PathBuf};

use answer_core::SessionId;
use answer_logging::{answer_info, answer_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::persist::{AtomicFileWriter, PersistError};

/// Fixed storage key of the persisted session identifier.
pub const SESSION_FILENAME: &str = ".answer_session.ron";

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("failed to persist session id: {0}")]
    Persist(#[from] PersistError),
    #[error("failed to serialize session id: {0}")]
    Serialize(#[from] ron::Error),
}

/// Owner of the per-profile session identifier.
pub trait SessionStore: Send {
    /// Returns the stored identifier, creating and persisting one on first use.
    fn load_or_create(&mut self) -> Result<SessionId, SessionStoreError>;

    /// Replaces the stored identifier with a fresh one, distinct from the previous.
    fn rotate(&mut self) -> Result<SessionId, SessionStoreError>;
}

/// A new time-ordered, random session identifier.
pub fn generate_session_id() -> SessionId {
    SessionId::new(Uuid::now_v7().simple().to_string())
}

fn fresh_id_unlike(previous: Option<&SessionId>) -> SessionId {
    loop {
        let candidate = generate_session_id();
        if Some(&candidate) != previous {
            return candidate;
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    current: Option<SessionId>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(session_id: SessionId) -> Self {
        Self {
            current: Some(session_id),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load_or_create(&mut self) -> Result<SessionId, SessionStoreError> {
        Ok(self.current.get_or_insert_with(generate_session_id).clone())
    }

    fn rotate(&mut self) -> Result<SessionId, SessionStoreError> {
        let next = fresh_id_unlike(self.current.as_ref());
        self.current = Some(next.clone());
        Ok(next)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSession {
    session_id: String,
}

/// Keeps the session identifier in [`SESSION_FILENAME`] under a state directory.
#[derive(Debug)]
pub struct FileSessionStore {
    dir: PathBuf,
    current: Option<SessionId>,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            current: None,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SESSION_FILENAME)
    }

    fn save(&self, session_id: &SessionId) -> Result<(), SessionStoreError> {
        let state = PersistedSession {
            session_id: session_id.as_str().to_string(),
        };
        let content = ron::ser::to_string_pretty(&state, ron::ser::PrettyConfig::new())?;
        AtomicFileWriter::new(self.dir.clone()).write(SESSION_FILENAME, &content)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load_or_create(&mut self) -> Result<SessionId, SessionStoreError> {
        if let Some(current) = &self.current {
            return Ok(current.clone());
        }
        if let Some(stored) = read_session_file(&self.path()) {
            self.current = Some(stored.clone());
            return Ok(stored);
        }
        let created = generate_session_id();
        self.save(&created)?;
        answer_info!("Created session id {}", created);
        self.current = Some(created.clone());
        Ok(created)
    }

    fn rotate(&mut self) -> Result<SessionId, SessionStoreError> {
        let previous = match &self.current {
            Some(current) => Some(current.clone()),
            None => read_session_file(&self.path()),
        };
        let next = fresh_id_unlike(previous.as_ref());
        self.save(&next)?;
        answer_info!("Rotated session id to {}", next);
        self.current = Some(next.clone());
        Ok(next)
    }
}

fn read_session_file(path: &Path) -> Option<SessionId> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            answer_warn!("Failed to read session file {:?}: {}", path, err);
            return None;
        }
    };
    match ron::from_str::<PersistedSession>(&content) {
        Ok(state) if !state.session_id.trim().is_empty() => Some(SessionId::new(state.session_id)),
        Ok(_) => {
            answer_warn!("Ignoring empty session id in {:?}", path);
            None
        }
        Err(err) => {
            answer_warn!("Failed to parse session file {:?}: {}", path, err);
            None
        }
    }
}
