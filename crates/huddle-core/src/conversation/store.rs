//! Conversation session store trait.

use super::session_id::ConversationSessionId;
use crate::error::Result;

/// Durable holder of the current conversation session id.
///
/// Lifecycle is independent of the credential store: clearing one never
/// clears the other. Logout clears both explicitly.
pub trait ConversationSessionStore: Send + Sync {
    /// Returns the persisted id, if any.
    fn get(&self) -> Result<Option<ConversationSessionId>>;

    /// Overwrites the persisted id.
    fn set(&self, id: &ConversationSessionId) -> Result<()>;

    /// Removes the persisted id. Removing a missing entry succeeds.
    fn clear(&self) -> Result<()>;
}
