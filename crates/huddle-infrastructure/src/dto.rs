//! Data Transfer Objects for the persisted entries.
//!
//! Fields are stored as plain strings so a hand-edited or half-written entry
//! still deserializes and can be classified instead of failing outright.

use chrono::Utc;
use huddle_core::auth::{Credential, Role};
use huddle_core::conversation::ConversationSessionId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Current schema version for both entries.
pub const STATE_SCHEMA_VERSION: &str = "1.0.0";

fn default_schema_version() -> String {
    STATE_SCHEMA_VERSION.to_string()
}

fn major(version: &str) -> &str {
    version.trim().split('.').next().unwrap_or_default()
}

/// Accepts any version sharing the current major component.
fn check_schema_version(found: &str) -> Result<(), String> {
    if major(found) == major(STATE_SCHEMA_VERSION) {
        Ok(())
    } else {
        Err(format!(
            "unsupported schema version '{}' (expected {})",
            found, STATE_SCHEMA_VERSION
        ))
    }
}

/// On-disk form of `credential.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialDto {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// RFC 3339 timestamp of the last write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

impl CredentialDto {
    pub fn from_domain(credential: &Credential) -> Self {
        Self {
            schema_version: default_schema_version(),
            token: credential.token.clone(),
            role: credential.role.map(|role| role.to_string()),
            user_id: credential.user_id.clone(),
            saved_at: Some(Utc::now().to_rfc3339()),
        }
    }

    /// An unrecognised role string is treated as missing, which makes the
    /// credential partial. An unsupported schema version is an error.
    pub fn into_domain(self) -> Result<Credential, String> {
        check_schema_version(&self.schema_version)?;
        let role = self.role.as_deref().and_then(|raw| {
            let parsed = Role::from_str(raw.trim()).ok();
            if parsed.is_none() {
                tracing::warn!("[CredentialDto] Unknown role '{}' in stored credential", raw);
            }
            parsed
        });
        Ok(Credential::from_parts(self.token, role, self.user_id))
    }
}

/// On-disk form of `conversation_session.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSessionDto {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ConversationSessionDto {
    pub fn from_domain(session_id: &ConversationSessionId) -> Self {
        Self {
            schema_version: default_schema_version(),
            session_id: Some(session_id.as_str().to_string()),
            updated_at: Some(Utc::now().to_rfc3339()),
        }
    }

    /// Blank ids read back as absent.
    pub fn into_domain(self) -> Result<Option<ConversationSessionId>, String> {
        check_schema_version(&self.schema_version)?;
        Ok(self.session_id.as_deref().and_then(ConversationSessionId::parse))
    }
}
