//! Credential mutators: login, logout and account registration.

use huddle_core::api::{ChatApi, LoginRequest, RegistrationRequest};
use huddle_core::auth::{AuthenticatedUser, CredentialLookup, CredentialStore, Role};
use huddle_core::conversation::ConversationSessionStore;
use huddle_core::error::Result;
use std::sync::Arc;

/// Establishes and tears down the authenticated identity.
///
/// Login writes the credential triple in one step; logout clears the
/// credential and the conversation session id together.
pub struct AuthService {
    api: Arc<dyn ChatApi>,
    credential_store: Arc<dyn CredentialStore>,
    session_store: Arc<dyn ConversationSessionStore>,
}

impl AuthService {
    pub fn new(
        api: Arc<dyn ChatApi>,
        credential_store: Arc<dyn CredentialStore>,
        session_store: Arc<dyn ConversationSessionStore>,
    ) -> Self {
        Self {
            api,
            credential_store,
            session_store,
        }
    }

    /// Logs in with email and password, resolves the user id from the
    /// profile endpoint and persists the credential.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser> {
        let request = LoginRequest::new(email, password)?;
        let grant = self.api.login(&request).await?;
        let profile = self.api.fetch_profile(&grant.token).await?;
        if profile.role != grant.role {
            tracing::warn!(
                "[AuthService] Login granted {} but profile reports {}; keeping the granted role",
                grant.role,
                profile.role
            );
        }

        self.login_with(&grant.token, grant.role, &profile.id)?;
        tracing::info!("[AuthService] Logged in as user {} ({})", profile.id, grant.role);
        Ok(AuthenticatedUser {
            token: grant.token,
            role: grant.role,
            user_id: profile.id,
        })
    }

    /// Persists an already-issued credential.
    ///
    /// A session id left behind by a different (or unknown) user is cleared
    /// so it is never sent with the new token.
    pub fn login_with(&self, token: &str, role: Role, user_id: &str) -> Result<()> {
        let same_user = matches!(
            self.credential_store.get()?,
            CredentialLookup::Present(previous) if previous.user_id.as_deref() == Some(user_id)
        );
        if !same_user {
            self.session_store.clear()?;
        }
        self.credential_store.set(token, role, user_id)
    }

    /// Clears the credential and the conversation session id.
    ///
    /// Both clears are attempted; the first error is returned.
    pub fn logout(&self) -> Result<()> {
        let credential = self.credential_store.clear();
        let session = self.session_store.clear();
        if credential.is_ok() && session.is_ok() {
            tracing::info!("[AuthService] Logged out");
        }
        credential.and(session)
    }

    /// Creates an account. Returns the server's confirmation message.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<String> {
        let message = self.api.register(request).await?;
        tracing::info!("[AuthService] Registered {}", request.email);
        Ok(message)
    }

    /// Current persisted credential, normalized.
    pub fn status(&self) -> Result<CredentialLookup> {
        self.credential_store.get()
    }
}
