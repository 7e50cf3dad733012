//! Error types for the Huddle client.

use thiserror::Error;

/// A shared error type for the entire Huddle client.
///
/// Remote failures are split along the lines the session manager cares about;
/// everything else is a local failure of storage or configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HuddleError {
    /// No usable credential, or the server rejected the presented token.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Connection error, timeout or server-side outage.
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// The server answered with a non-auth 4xx or an unusable body.
    #[error("Server rejected request{}: {message}", status_suffix(.status))]
    ServerRejection {
        status: Option<u16>,
        message: String,
    },

    /// Persisted credential found in a partially-set or unreadable state.
    #[error("Corrupt credential: {0}")]
    CorruptCredential(String),

    /// Caller-supplied input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HuddleError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Unauthenticated error
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    /// Creates a NetworkFailure error
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkFailure(message.into())
    }

    /// Creates a ServerRejection error
    pub fn rejected(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::ServerRejection {
            status,
            message: message.into(),
        }
    }

    /// Creates a ServerRejection for a response body that failed validation
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::ServerRejection {
            status: None,
            message: format!("malformed response: {}", message.into()),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Classification
    // ============================================================================

    /// Check if this error must cascade into clearing persisted state
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated(_))
    }

    /// Check if this is a transient network error
    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkFailure(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for HuddleError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for HuddleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for HuddleError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for HuddleError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" ({})", code),
        None => String::new(),
    }
}

/// A type alias for `Result<T, HuddleError>`.
pub type Result<T> = std::result::Result<T, HuddleError>;
