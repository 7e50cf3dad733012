use super::outcome::{LoadOutcome, RedirectCause, RejectReason, SendOutcome};
use huddle_core::api::{ChatApi, ExchangeRequest, ServerHistory};
use huddle_core::auth::{
    AccessDecision, AccessGuard, AuthenticatedUser, CredentialLookup, CredentialStore, DenyReason,
};
use huddle_core::conversation::{
    reconcile, ConversationSessionId, ConversationSessionStore, ConversationTurn, ManagerState,
    Sender, SequenceCounter, TurnOrigin,
};
use huddle_core::error::{HuddleError, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Text of the synthetic bot turn appended when an exchange gets no reply.
pub const FAILURE_MARKER_TEXT: &str = "Sorry, no reply was received. Please try again.";

/// In-memory state of one conversational view.
struct ViewState {
    state: ManagerState,
    turns: Vec<ConversationTurn>,
    sequence: SequenceCounter,
    /// Replaced on teardown; responses carrying an older value are dropped.
    instance: Uuid,
    /// Latest server-issued session id and the user it belongs to. Takes
    /// precedence over the store, which may have failed to persist it.
    known_session: Option<(String, ConversationSessionId)>,
}

impl ViewState {
    fn new() -> Self {
        Self {
            state: ManagerState::Uninitialized,
            turns: Vec::new(),
            sequence: SequenceCounter::new(),
            instance: Uuid::new_v4(),
            known_session: None,
        }
    }

    fn known_session_for(&self, user_id: &str) -> Option<ConversationSessionId> {
        match &self.known_session {
            Some((owner, id)) if owner == user_id => Some(id.clone()),
            _ => None,
        }
    }

    fn append<F>(&mut self, build: F) -> ConversationTurn
    where
        F: FnOnce(u64) -> ConversationTurn,
    {
        let turn = build(self.sequence.allocate());
        self.turns.push(turn.clone());
        turn
    }

    fn unconfirmed(&self) -> Vec<ConversationTurn> {
        self.turns
            .iter()
            .filter(|turn| !turn.is_confirmed())
            .cloned()
            .collect()
    }

    fn leave(&mut self) {
        self.state = ManagerState::Uninitialized;
        self.turns.clear();
    }
}

enum Admission {
    Admitted(AuthenticatedUser),
    Refused(RedirectCause),
    Failed(HuddleError),
}

#[derive(Clone, Copy)]
enum LoadPhase {
    Enter,
    Refresh,
}

/// Orchestrates the credential and session stores, the access guard, the
/// history reconciler and the remote API for one conversational view.
///
/// `ConversationSessionManager` is responsible for:
/// - Gating view entry on a complete credential
/// - Loading and reconciling history
/// - Optimistic sends with at most one exchange in flight
/// - Keeping the persisted session id in step with the server
/// - Clearing persisted state when the server rejects the token
///
/// The view lock is never held across a network call. Each response is
/// checked against the instance id captured at dispatch and dropped if the
/// view was torn down in between.
pub struct ConversationSessionManager {
    api: Arc<dyn ChatApi>,
    credential_store: Arc<dyn CredentialStore>,
    session_store: Arc<dyn ConversationSessionStore>,
    view: Mutex<ViewState>,
}

impl ConversationSessionManager {
    pub fn new(
        api: Arc<dyn ChatApi>,
        credential_store: Arc<dyn CredentialStore>,
        session_store: Arc<dyn ConversationSessionStore>,
    ) -> Self {
        Self {
            api,
            credential_store,
            session_store,
            view: Mutex::new(ViewState::new()),
        }
    }

    pub async fn current_state(&self) -> ManagerState {
        self.view.lock().await.state
    }

    /// Snapshot of the conversation in display order.
    pub async fn messages(&self) -> Vec<ConversationTurn> {
        self.view.lock().await.turns.clone()
    }

    /// Enters the view: checks access, then loads history.
    ///
    /// Allowed from `Uninitialized` and `Error`; calling it while `Ready`
    /// returns `Ready` without refetching.
    pub async fn enter(&self) -> LoadOutcome {
        let (user, instance, local) = {
            let mut view = self.view.lock().await;
            if view.state == ManagerState::Ready {
                return LoadOutcome::Ready;
            }
            if !view.state.can_enter() {
                return LoadOutcome::Unavailable(view.state);
            }

            let user = match self.admit() {
                Admission::Admitted(user) => user,
                Admission::Refused(cause) => {
                    tracing::info!("[SessionManager] Entry refused: {:?}", cause);
                    view.leave();
                    return LoadOutcome::Redirect(cause);
                }
                Admission::Failed(error) => {
                    tracing::error!("[SessionManager] Failed to read credential: {}", error);
                    view.state = ManagerState::Error;
                    return LoadOutcome::Failed(error);
                }
            };

            view.state = ManagerState::Loading;
            (user, view.instance, view.unconfirmed())
        };

        tracing::info!(
            "[SessionManager] Loading history for user {} ({})",
            user.user_id,
            user.role
        );
        let result = self.api.fetch_history(&user.user_id, &user.token).await;
        self.apply_history(result, &user.user_id, instance, local, LoadPhase::Enter)
            .await
    }

    /// Re-fetches history and merges any turns the server has not confirmed.
    ///
    /// Only allowed from `Ready`. A non-authorization failure leaves the
    /// current conversation in place.
    pub async fn refresh(&self) -> LoadOutcome {
        let (user, instance, local) = {
            let mut view = self.view.lock().await;
            if view.state != ManagerState::Ready {
                return LoadOutcome::Unavailable(view.state);
            }

            let user = match self.admit() {
                Admission::Admitted(user) => user,
                Admission::Refused(cause) => {
                    view.leave();
                    return LoadOutcome::Redirect(cause);
                }
                Admission::Failed(error) => return LoadOutcome::Failed(error),
            };

            view.state = ManagerState::Loading;
            (user, view.instance, view.unconfirmed())
        };

        tracing::debug!(
            "[SessionManager] Refreshing with {} unconfirmed local turns",
            local.len()
        );
        let result = self.api.fetch_history(&user.user_id, &user.token).await;
        self.apply_history(result, &user.user_id, instance, local, LoadPhase::Refresh)
            .await
    }

    /// Submits one user turn.
    ///
    /// The turn is appended before dispatch. Exactly one of a bot reply or a
    /// failure marker follows it, unless the view is torn down first.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let query = text.trim();
        if query.is_empty() {
            return SendOutcome::Rejected(RejectReason::EmptyMessage);
        }

        let (user, instance, session_id, sequence) = {
            let mut view = self.view.lock().await;
            match view.state {
                ManagerState::Ready => {}
                ManagerState::Sending => {
                    tracing::debug!("[SessionManager] Rejecting send while another is in flight");
                    return SendOutcome::Rejected(RejectReason::Busy);
                }
                other => return SendOutcome::Rejected(RejectReason::NotReady(other)),
            }

            let user = match self.admit() {
                Admission::Admitted(user) => user,
                Admission::Refused(cause) => {
                    tracing::info!("[SessionManager] Send refused: {:?}", cause);
                    view.leave();
                    return SendOutcome::Redirect(cause);
                }
                Admission::Failed(error) => return Self::fail_locally(&mut view, query, error),
            };

            let session_id = match view.known_session_for(&user.user_id) {
                Some(id) => Some(id),
                None => match self.session_store.get() {
                    Ok(id) => id,
                    Err(error) => return Self::fail_locally(&mut view, query, error),
                },
            };

            let turn = view.append(|seq| ConversationTurn::optimistic(query, seq));
            view.state = ManagerState::Sending;
            (user, view.instance, session_id, turn.sequence)
        };

        let request = ExchangeRequest {
            role: user.role,
            query: query.to_string(),
            session_id,
        };
        tracing::debug!(
            "[SessionManager] Dispatching turn seq={} (session: {})",
            sequence,
            request
                .session_id
                .as_ref()
                .map(ConversationSessionId::as_str)
                .unwrap_or("new")
        );
        let result = self.api.send_exchange(&user.token, &request).await;

        let mut view = self.view.lock().await;
        if view.instance != instance {
            tracing::debug!(
                "[SessionManager] Discarding reply for seq={} after teardown",
                sequence
            );
            return SendOutcome::Discarded;
        }

        match result {
            Ok(reply) => {
                if let Some(turn) = view.turns.iter_mut().find(|t| t.sequence == sequence) {
                    turn.origin = TurnOrigin::Server;
                }
                let reply_turn =
                    view.append(|seq| ConversationTurn::confirmed(Sender::Bot, reply.response, seq));
                let unsaved_session = reply
                    .session_id
                    .and_then(|id| self.remember_session(&mut view, &user.user_id, id).err());
                view.state = ManagerState::Ready;
                SendOutcome::Delivered {
                    reply: reply_turn,
                    unsaved_session,
                }
            }
            Err(error) if error.is_unauthenticated() => {
                tracing::warn!("[SessionManager] Token rejected on send: {}", error);
                view.append(|seq| ConversationTurn::failure_marker(FAILURE_MARKER_TEXT, seq));
                let clear_failure = self.revoke(&mut view).err();
                view.state = ManagerState::Error;
                SendOutcome::Redirect(RedirectCause::CredentialRejected {
                    message: error.to_string(),
                    clear_failure,
                })
            }
            Err(error) => {
                tracing::warn!("[SessionManager] Send failed for seq={}: {}", sequence, error);
                let marker =
                    view.append(|seq| ConversationTurn::failure_marker(FAILURE_MARKER_TEXT, seq));
                view.state = ManagerState::Ready;
                SendOutcome::Failed { error, marker }
            }
        }
    }

    /// Tears the view down. In-flight responses are discarded when they land.
    pub async fn teardown(&self) {
        let mut view = self.view.lock().await;
        view.instance = Uuid::new_v4();
        view.leave();
        tracing::debug!("[SessionManager] View torn down");
    }

    async fn apply_history(
        &self,
        result: Result<ServerHistory>,
        user_id: &str,
        instance: Uuid,
        local: Vec<ConversationTurn>,
        phase: LoadPhase,
    ) -> LoadOutcome {
        let mut view = self.view.lock().await;
        if view.instance != instance {
            tracing::debug!("[SessionManager] Discarding history fetched before teardown");
            return LoadOutcome::Discarded;
        }

        match result {
            Ok(history) => {
                let server: Vec<ConversationTurn> = history
                    .entries
                    .into_iter()
                    .map(|entry| ConversationTurn::confirmed(entry.sender, entry.text, 0))
                    .collect();
                let mut turns = reconcile(&server, &local);
                for turn in &mut turns {
                    turn.sequence = view.sequence.allocate();
                }
                tracing::info!(
                    "[SessionManager] Ready with {} turns ({} from server)",
                    turns.len(),
                    server.len()
                );
                view.turns = turns;
                if let Some(id) = history.session_id {
                    // Kept in memory on failure; the next send reports it again.
                    let _ = self.remember_session(&mut view, user_id, id);
                }
                view.state = ManagerState::Ready;
                LoadOutcome::Ready
            }
            Err(error) if error.is_unauthenticated() => {
                tracing::warn!("[SessionManager] Token rejected on history fetch: {}", error);
                let clear_failure = self.revoke(&mut view).err();
                view.turns.clear();
                view.state = ManagerState::Error;
                LoadOutcome::Redirect(RedirectCause::CredentialRejected {
                    message: error.to_string(),
                    clear_failure,
                })
            }
            Err(error) => {
                tracing::warn!("[SessionManager] History fetch failed: {}", error);
                view.state = match phase {
                    LoadPhase::Enter => ManagerState::Error,
                    LoadPhase::Refresh => ManagerState::Ready,
                };
                LoadOutcome::Failed(error)
            }
        }
    }

    /// Reads the credential store and runs the access guard.
    fn admit(&self) -> Admission {
        let lookup = match self.credential_store.get() {
            Ok(lookup) => lookup,
            Err(error) => return Admission::Failed(error),
        };
        if let CredentialLookup::Corrupt { reason } = &lookup {
            return Admission::Refused(RedirectCause::CorruptCredential {
                reason: reason.clone(),
            });
        }

        let credential = lookup.credential();
        match AccessGuard::can_enter(&credential) {
            AccessDecision::Allow => match credential.authenticated() {
                Some(user) => Admission::Admitted(user),
                None => Admission::Refused(RedirectCause::AccessDenied(DenyReason::NoCredential)),
            },
            AccessDecision::Deny(reason) => Admission::Refused(RedirectCause::AccessDenied(reason)),
        }
    }

    /// Records `id` for `user_id` and persists it if it differs from the
    /// stored one. The in-memory copy survives a failed write.
    fn remember_session(
        &self,
        view: &mut ViewState,
        user_id: &str,
        id: ConversationSessionId,
    ) -> Result<()> {
        view.known_session = Some((user_id.to_string(), id.clone()));
        if let Ok(Some(current)) = self.session_store.get() {
            if current == id {
                return Ok(());
            }
        }
        match self.session_store.set(&id) {
            Ok(()) => {
                tracing::info!("[SessionManager] Conversation session is now {}", id);
                Ok(())
            }
            Err(error) => {
                tracing::error!("[SessionManager] Failed to store session id {}: {}", id, error);
                Err(error)
            }
        }
    }

    /// Clears both stores after the server rejected the token.
    ///
    /// Both clears are attempted; the first failure is returned.
    fn revoke(&self, view: &mut ViewState) -> Result<()> {
        view.known_session = None;
        let credential = self.credential_store.clear();
        if let Err(error) = &credential {
            tracing::error!("[SessionManager] Failed to clear credential: {}", error);
        }
        let session = self.session_store.clear();
        if let Err(error) = &session {
            tracing::error!("[SessionManager] Failed to clear session id: {}", error);
        }
        credential.and(session)
    }

    fn fail_locally(view: &mut ViewState, query: &str, error: HuddleError) -> SendOutcome {
        tracing::error!("[SessionManager] Send aborted before dispatch: {}", error);
        view.append(|seq| ConversationTurn::optimistic(query, seq));
        let marker = view.append(|seq| ConversationTurn::failure_marker(FAILURE_MARKER_TEXT, seq));
        SendOutcome::Failed { error, marker }
    }
}
