//! Scripted fakes shared by the application tests.

use crate::auth_service::AuthService;
use crate::session::ConversationSessionManager;
use async_trait::async_trait;
use huddle_core::api::{
    ChatApi, ExchangeReply, ExchangeRequest, HistoryEntry, LoginGrant, LoginRequest,
    RegistrationRequest, ServerHistory, UserProfile,
};
use huddle_core::auth::{Credential, CredentialStore, Role};
use huddle_core::conversation::{ConversationSessionId, ConversationSessionStore, Sender};
use huddle_core::error::{HuddleError, Result};
use huddle_infrastructure::{InMemoryConversationSessionStore, InMemoryCredentialStore};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// `ChatApi` that replays queued results.
///
/// Knows one account (`a@b.com` / `x`, token `T1`, user `7`, Manager). Empty
/// queues fall back to an empty history and an echo reply with session `S1`.
#[derive(Default)]
pub(crate) struct ScriptedChatApi {
    histories: Mutex<VecDeque<Result<ServerHistory>>>,
    replies: Mutex<VecDeque<Result<ExchangeReply>>>,
    exchanges: Mutex<Vec<(String, ExchangeRequest)>>,
    history_calls: AtomicUsize,
    send_gate: Option<Arc<Notify>>,
    history_gate: Option<Arc<Notify>>,
}

impl ScriptedChatApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every exchange waits for one `notify_one` on `gate` before replying.
    pub fn with_send_gate(gate: Arc<Notify>) -> Self {
        Self {
            send_gate: Some(gate),
            ..Self::default()
        }
    }

    /// Every history fetch waits for one `notify_one` on `gate` before replying.
    pub fn with_history_gate(gate: Arc<Notify>) -> Self {
        Self {
            history_gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn push_history(&self, result: Result<ServerHistory>) {
        self.histories.lock().unwrap().push_back(result);
    }

    pub fn push_reply(&self, result: Result<ExchangeReply>) {
        self.replies.lock().unwrap().push_back(result);
    }

    /// Token and request of every dispatched exchange.
    pub fn exchanges(&self) -> Vec<(String, ExchangeRequest)> {
        self.exchanges.lock().unwrap().clone()
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatApi for ScriptedChatApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginGrant> {
        if request.email == "a@b.com" && request.password == "x" {
            Ok(LoginGrant {
                token: "T1".into(),
                role: Role::Manager,
            })
        } else {
            Err(HuddleError::unauthenticated("Invalid credentials"))
        }
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<String> {
        if request.email == "a@b.com" {
            Err(HuddleError::rejected(Some(400), "User already exists"))
        } else {
            Ok("User registered successfully".into())
        }
    }

    async fn fetch_profile(&self, token: &str) -> Result<UserProfile> {
        if token == "T1" {
            Ok(UserProfile {
                id: "7".into(),
                email: "a@b.com".into(),
                role: Role::Manager,
            })
        } else {
            Err(HuddleError::unauthenticated("Invalid token"))
        }
    }

    async fn fetch_history(&self, _user_id: &str, _token: &str) -> Result<ServerHistory> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.history_gate {
            gate.notified().await;
        }
        let next = self.histories.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(ServerHistory::default()))
    }

    async fn send_exchange(&self, token: &str, request: &ExchangeRequest) -> Result<ExchangeReply> {
        self.exchanges
            .lock()
            .unwrap()
            .push((token.to_string(), request.clone()));
        if let Some(gate) = &self.send_gate {
            gate.notified().await;
        }
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| {
            Ok(ExchangeReply {
                response: format!("re: {}", request.query),
                session_id: ConversationSessionId::parse("S1"),
            })
        })
    }
}

pub(crate) fn history(turns: &[(Sender, &str)], session_id: Option<&str>) -> ServerHistory {
    ServerHistory {
        entries: turns
            .iter()
            .map(|(sender, text)| HistoryEntry {
                sender: *sender,
                text: text.to_string(),
            })
            .collect(),
        session_id: session_id.and_then(ConversationSessionId::parse),
    }
}

/// A manager and an auth service wired to the same fakes.
pub(crate) struct Fixture {
    pub api: Arc<ScriptedChatApi>,
    pub credentials: Arc<InMemoryCredentialStore>,
    pub sessions: Arc<InMemoryConversationSessionStore>,
    pub manager: Arc<ConversationSessionManager>,
    pub auth: AuthService,
}

impl Fixture {
    fn build(api: ScriptedChatApi, credentials: InMemoryCredentialStore) -> Self {
        let api = Arc::new(api);
        let credentials = Arc::new(credentials);
        let sessions = Arc::new(InMemoryConversationSessionStore::new());
        let manager = Arc::new(ConversationSessionManager::new(
            api.clone(),
            credentials.clone(),
            sessions.clone(),
        ));
        let auth = AuthService::new(api.clone(), credentials.clone(), sessions.clone());
        Self {
            api,
            credentials,
            sessions,
            manager,
            auth,
        }
    }

    pub fn logged_out(api: ScriptedChatApi) -> Self {
        Self::build(api, InMemoryCredentialStore::new())
    }

    /// Credential `T1` / Manager / `7` already persisted.
    pub fn logged_in(api: ScriptedChatApi) -> Self {
        let credentials = InMemoryCredentialStore::new();
        credentials.set("T1", Role::Manager, "7").unwrap();
        Self::build(api, credentials)
    }

    pub fn with_raw_credential(api: ScriptedChatApi, credential: Credential) -> Self {
        Self::build(api, InMemoryCredentialStore::with_raw(credential))
    }
}

/// Credential store whose writes can be made to fail.
#[derive(Default)]
pub(crate) struct FlakyCredentialStore {
    inner: InMemoryCredentialStore,
    fail_remove: bool,
    fail_save: bool,
}

impl FlakyCredentialStore {
    /// Starts with `T1` / Manager / `7` persisted.
    pub fn logged_in() -> Self {
        let store = Self::default();
        store.inner.set("T1", Role::Manager, "7").unwrap();
        store
    }

    pub fn failing_remove(mut self) -> Self {
        self.fail_remove = true;
        self
    }

    pub fn failing_save(mut self) -> Self {
        self.fail_save = true;
        self
    }
}

impl CredentialStore for FlakyCredentialStore {
    fn load(&self) -> Result<Option<Credential>> {
        self.inner.load()
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        if self.fail_save {
            return Err(HuddleError::io("credential file is read-only"));
        }
        self.inner.save(credential)
    }

    fn remove(&self) -> Result<()> {
        if self.fail_remove {
            return Err(HuddleError::io("credential file is busy"));
        }
        self.inner.remove()
    }
}

/// Session store whose `set` can be made to fail.
#[derive(Default)]
pub(crate) struct FlakySessionStore {
    inner: InMemoryConversationSessionStore,
    fail_set: bool,
}

impl FlakySessionStore {
    pub fn with_id(id: &str) -> Self {
        Self {
            inner: InMemoryConversationSessionStore::with_id(
                ConversationSessionId::parse(id).unwrap(),
            ),
            fail_set: false,
        }
    }

    pub fn failing_set(mut self) -> Self {
        self.fail_set = true;
        self
    }
}

impl ConversationSessionStore for FlakySessionStore {
    fn get(&self) -> Result<Option<ConversationSessionId>> {
        self.inner.get()
    }

    fn set(&self, id: &ConversationSessionId) -> Result<()> {
        if self.fail_set {
            return Err(HuddleError::io("session file is read-only"));
        }
        self.inner.set(id)
    }

    fn clear(&self) -> Result<()> {
        self.inner.clear()
    }
}
