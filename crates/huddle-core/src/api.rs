//! The seam between the client and the remote API.
//!
//! Types here are the validated, domain-side view of the remote contract.
//! Wire shapes and their validation live in the interaction layer.

use crate::auth::Role;
use crate::conversation::{ConversationSessionId, Sender};
use crate::error::{HuddleError, Result};
use async_trait::async_trait;
use std::fmt;

/// Email/password pair submitted at login.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Trims the email and rejects empty fields before anything goes on the wire.
    pub fn new(email: &str, password: &str) -> Result<Self> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(HuddleError::validation("Email and password are required"));
        }
        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Token and role granted by a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub token: String,
    pub role: Role,
}

impl fmt::Debug for LoginGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginGrant")
            .field("token", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Account creation request.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl RegistrationRequest {
    /// Validates the form the way the signup page does: both passwords must
    /// match and email/password are required.
    pub fn new(
        email: &str,
        password: &str,
        confirm_password: &str,
        first_name: &str,
        last_name: &str,
        role: Role,
    ) -> Result<Self> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(HuddleError::validation("Email and password are required"));
        }
        if password != confirm_password {
            return Err(HuddleError::validation("Passwords do not match"));
        }
        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            role,
        })
    }
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("role", &self.role)
            .finish()
    }
}

/// The authenticated account as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub role: Role,
}

/// One validated history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub sender: Sender,
    pub text: String,
}

/// Validated history fetch response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerHistory {
    pub entries: Vec<HistoryEntry>,
    pub session_id: Option<ConversationSessionId>,
}

/// One outbound chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRequest {
    pub role: Role,
    pub query: String,
    pub session_id: Option<ConversationSessionId>,
}

/// The server's reply to an exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeReply {
    pub response: String,
    /// Absent only when the server omitted it; the caller then keeps its id.
    pub session_id: Option<ConversationSessionId>,
}

/// Remote operations the client depends on.
///
/// Implementations map transport and status failures onto
/// [`HuddleError::Unauthenticated`], [`HuddleError::NetworkFailure`] and
/// [`HuddleError::ServerRejection`], and must validate response bodies before
/// returning them.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, request: &LoginRequest) -> Result<LoginGrant>;

    /// `POST /auth/register`; returns the server's confirmation message.
    async fn register(&self, request: &RegistrationRequest) -> Result<String>;

    /// `GET /auth/profile`
    async fn fetch_profile(&self, token: &str) -> Result<UserProfile>;

    /// `GET /chatbot/history/{user_id}`
    async fn fetch_history(&self, user_id: &str, token: &str) -> Result<ServerHistory>;

    /// `POST /chatbot/`
    async fn send_exchange(&self, token: &str, request: &ExchangeRequest) -> Result<ExchangeReply>;
}
