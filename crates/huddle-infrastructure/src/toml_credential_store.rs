//! TOML-backed credential store.

use crate::dto::CredentialDto;
use crate::paths::HuddlePaths;
use crate::storage::{AtomicTomlError, AtomicTomlFile};
use huddle_core::auth::{Credential, CredentialStore};
use huddle_core::error::{HuddleError, Result};
use std::path::{Path, PathBuf};

/// Keeps the credential triple in `credential.toml`, readable only by the owner.
pub struct TomlCredentialStore {
    file: AtomicTomlFile<CredentialDto>,
}

impl TomlCredentialStore {
    /// Creates a store for `credential.toml` inside `state_dir`.
    pub fn new(state_dir: &Path) -> Self {
        Self::at(HuddlePaths::credential_file(state_dir))
    }

    /// Creates a store backed by an explicit file path.
    pub fn at(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path).owner_only(),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl CredentialStore for TomlCredentialStore {
    fn load(&self) -> Result<Option<Credential>> {
        match self.file.load() {
            Ok(None) => Ok(None),
            Ok(Some(dto)) => dto.into_domain().map(Some).map_err(|reason| {
                HuddleError::CorruptCredential(format!("{}: {}", self.file.path().display(), reason))
            }),
            Err(AtomicTomlError::Parse(e)) => Err(HuddleError::CorruptCredential(format!(
                "{}: {}",
                self.file.path().display(),
                e
            ))),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        self.file.save(&CredentialDto::from_domain(credential))?;
        tracing::debug!("[CredentialStore] Saved credential to {}", self.file.path().display());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        self.file.remove()?;
        tracing::debug!("[CredentialStore] Removed {}", self.file.path().display());
        Ok(())
    }
}
