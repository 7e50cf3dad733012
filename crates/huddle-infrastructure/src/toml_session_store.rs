//! TOML-backed conversation session store.

use crate::dto::ConversationSessionDto;
use crate::paths::HuddlePaths;
use crate::storage::{AtomicTomlError, AtomicTomlFile};
use huddle_core::conversation::{ConversationSessionId, ConversationSessionStore};
use huddle_core::error::Result;
use std::path::{Path, PathBuf};

/// Keeps the server conversation id in `conversation_session.toml`.
pub struct TomlConversationSessionStore {
    file: AtomicTomlFile<ConversationSessionDto>,
}

impl TomlConversationSessionStore {
    pub fn new(state_dir: &Path) -> Self {
        Self::at(HuddlePaths::session_file(state_dir))
    }

    pub fn at(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl ConversationSessionStore for TomlConversationSessionStore {
    fn get(&self) -> Result<Option<ConversationSessionId>> {
        let dto = match self.file.load() {
            Ok(dto) => dto,
            // A garbled entry only costs continuity; the next reply re-seeds it.
            Err(AtomicTomlError::Parse(e)) => {
                tracing::warn!(
                    "[SessionStore] Ignoring unparseable {}: {}",
                    self.file.path().display(),
                    e
                );
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        match dto.map(ConversationSessionDto::into_domain).transpose() {
            Ok(id) => Ok(id.flatten()),
            Err(reason) => {
                tracing::warn!(
                    "[SessionStore] Ignoring {}: {}",
                    self.file.path().display(),
                    reason
                );
                Ok(None)
            }
        }
    }

    fn set(&self, id: &ConversationSessionId) -> Result<()> {
        self.file.save(&ConversationSessionDto::from_domain(id))?;
        tracing::debug!("[SessionStore] Stored session id {}", id);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.file.remove()?;
        Ok(())
    }
}
