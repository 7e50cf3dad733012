use anyhow::Result;
use huddle_application::{AuthService, ConversationSessionManager};
use huddle_core::api::ChatApi;
use huddle_core::auth::CredentialStore;
use huddle_core::config::ClientConfig;
use huddle_core::conversation::ConversationSessionStore;
use huddle_infrastructure::{TomlConversationSessionStore, TomlCredentialStore};
use huddle_interaction::HttpChatApi;
use std::path::PathBuf;
use std::sync::Arc;

/// Services wired from the effective configuration.
pub struct AppContext {
    pub config: ClientConfig,
    pub state_dir: PathBuf,
    pub auth: AuthService,
    pub manager: Arc<ConversationSessionManager>,
}

impl AppContext {
    pub fn new(config: ClientConfig, state_dir: PathBuf) -> Result<Self> {
        let api: Arc<dyn ChatApi> = Arc::new(HttpChatApi::from_config(&config)?);
        let credential_store: Arc<dyn CredentialStore> =
            Arc::new(TomlCredentialStore::new(&state_dir));
        let session_store: Arc<dyn ConversationSessionStore> =
            Arc::new(TomlConversationSessionStore::new(&state_dir));

        tracing::debug!(
            "[AppContext] api={} state_dir={}",
            config.api_base_url,
            state_dir.display()
        );

        let auth = AuthService::new(
            api.clone(),
            credential_store.clone(),
            session_store.clone(),
        );
        let manager = Arc::new(ConversationSessionManager::new(
            api,
            credential_store,
            session_store,
        ));

        Ok(Self {
            config,
            state_dir,
            auth,
            manager,
        })
    }
}
