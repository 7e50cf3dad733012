//! Credential store trait.

use super::model::{Credential, Role};
use crate::error::{HuddleError, Result};

/// Normalized result of reading the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialLookup {
    /// All three fields present.
    Present(Credential),
    /// Nothing persisted.
    Absent,
    /// Persisted state was partial or unreadable. Callers must treat this as
    /// absent.
    Corrupt { reason: String },
}

impl CredentialLookup {
    /// Classifies a raw persisted credential.
    pub fn from_raw(raw: Option<Credential>) -> Self {
        match raw {
            None => Self::Absent,
            Some(credential) if credential.is_empty() => Self::Absent,
            Some(credential) if credential.is_complete() => Self::Present(credential),
            Some(credential) => Self::Corrupt {
                reason: format!(
                    "partially set credential, missing: {}",
                    credential.missing_fields().join(", ")
                ),
            },
        }
    }

    /// The credential to hand to the access guard. Corrupt entries yield the
    /// empty credential.
    pub fn credential(&self) -> Credential {
        match self {
            Self::Present(credential) => credential.clone(),
            Self::Absent | Self::Corrupt { .. } => Credential::empty(),
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// Durable holder of the credential triple.
///
/// Implementors provide raw persistence (`load`, `save`, `remove`); the
/// all-or-nothing contract is enforced by the provided `get`, `set` and
/// `clear` methods, which are what callers should use.
///
/// # Implementation Notes
///
/// - `save` and `remove` must be atomic with respect to readers
/// - `load` may return a partial credential; it must not repair it
/// - an unreadable entry should be reported as `HuddleError::CorruptCredential`
pub trait CredentialStore: Send + Sync {
    /// Reads the persisted credential exactly as stored.
    fn load(&self) -> Result<Option<Credential>>;

    /// Replaces the persisted credential.
    fn save(&self, credential: &Credential) -> Result<()>;

    /// Removes the persisted credential. Removing a missing entry succeeds.
    fn remove(&self) -> Result<()>;

    /// Returns the credential all-present or all-absent.
    ///
    /// A partially-set or unreadable entry is reported as
    /// [`CredentialLookup::Corrupt`] rather than surfaced as partial data.
    fn get(&self) -> Result<CredentialLookup> {
        match self.load() {
            Ok(raw) => {
                let lookup = CredentialLookup::from_raw(raw);
                if let CredentialLookup::Corrupt { reason } = &lookup {
                    tracing::warn!("[CredentialStore] {}", reason);
                }
                Ok(lookup)
            }
            Err(HuddleError::CorruptCredential(reason)) => {
                tracing::warn!("[CredentialStore] Unreadable credential: {}", reason);
                Ok(CredentialLookup::Corrupt { reason })
            }
            Err(e) => Err(e),
        }
    }

    /// Persists token, role and user id together.
    fn set(&self, token: &str, role: Role, user_id: &str) -> Result<()> {
        let credential = Credential::new(token, role, user_id);
        if !credential.is_complete() {
            return Err(HuddleError::validation(format!(
                "credential requires a token and user id, missing: {}",
                credential.missing_fields().join(", ")
            )));
        }
        self.save(&credential)
    }

    /// Removes all three fields.
    ///
    /// If the entry cannot be removed it is overwritten with an empty
    /// credential, which reads back as absent. The removal error is returned
    /// only when that fails too.
    fn clear(&self) -> Result<()> {
        match self.remove() {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::warn!("[CredentialStore] Remove failed, blanking instead: {}", error);
                self.save(&Credential::empty()).map_err(|_| error)
            }
        }
    }
}
