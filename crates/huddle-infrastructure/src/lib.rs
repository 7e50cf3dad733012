//! Infrastructure layer for huddle.
//!
//! File-backed and in-memory implementations of the core store traits, path
//! resolution and configuration loading.

pub mod config_loader;
pub mod dto;
pub mod memory_store;
pub mod paths;
pub mod storage;
pub mod toml_credential_store;
pub mod toml_session_store;

pub use config_loader::{load_client_config, resolve_state_dir};
pub use memory_store::{InMemoryConversationSessionStore, InMemoryCredentialStore};
pub use paths::HuddlePaths;
pub use toml_credential_store::TomlCredentialStore;
pub use toml_session_store::TomlConversationSessionStore;
