//! In-memory store implementations.
//!
//! Used by tests and by callers that do not want anything written to disk.

use huddle_core::auth::{Credential, CredentialStore};
use huddle_core::conversation::{ConversationSessionId, ConversationSessionStore};
use huddle_core::error::{HuddleError, Result};
use std::sync::Mutex;

fn poisoned<T>(_: T) -> HuddleError {
    HuddleError::internal("in-memory store lock poisoned")
}

/// Credential store held in process memory.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    raw: Mutex<Option<Credential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with a raw (possibly partial) credential.
    pub fn with_raw(credential: Credential) -> Self {
        Self {
            raw: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>> {
        Ok(self.raw.lock().map_err(poisoned)?.clone())
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        *self.raw.lock().map_err(poisoned)? = Some(credential.clone());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        *self.raw.lock().map_err(poisoned)? = None;
        Ok(())
    }
}

/// Conversation session store held in process memory.
#[derive(Default)]
pub struct InMemoryConversationSessionStore {
    id: Mutex<Option<ConversationSessionId>>,
}

impl InMemoryConversationSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: ConversationSessionId) -> Self {
        Self {
            id: Mutex::new(Some(id)),
        }
    }
}

impl ConversationSessionStore for InMemoryConversationSessionStore {
    fn get(&self) -> Result<Option<ConversationSessionId>> {
        Ok(self.id.lock().map_err(poisoned)?.clone())
    }

    fn set(&self, id: &ConversationSessionId) -> Result<()> {
        *self.id.lock().map_err(poisoned)? = Some(id.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.id.lock().map_err(poisoned)? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_core::auth::{CredentialLookup, Role};

    #[test]
    fn test_credential_store_round_trip() {
        let store = InMemoryCredentialStore::new();
        store.set("T1", Role::Manager, "7").unwrap();
        assert!(matches!(store.get().unwrap(), CredentialLookup::Present(_)));
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), CredentialLookup::Absent);
    }

    #[test]
    fn test_seeded_partial_credential_is_corrupt() {
        let store = InMemoryCredentialStore::with_raw(Credential::from_parts(
            None,
            Some(Role::Employee),
            Some("7".into()),
        ));
        assert!(store.get().unwrap().is_corrupt());
    }

    #[test]
    fn test_stores_are_independent() {
        let credentials = InMemoryCredentialStore::new();
        let sessions =
            InMemoryConversationSessionStore::with_id(ConversationSessionId::parse("S1").unwrap());
        credentials.set("T1", Role::Manager, "7").unwrap();

        credentials.clear().unwrap();

        assert_eq!(sessions.get().unwrap().unwrap().as_str(), "S1");
    }
}
