//! Results reported by the session manager to the view layer.

use huddle_core::auth::DenyReason;
use huddle_core::conversation::{ConversationTurn, ManagerState};
use huddle_core::error::HuddleError;

/// Why the view must go back to the unauthenticated entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectCause {
    /// The access guard denied entry.
    AccessDenied(DenyReason),
    /// The persisted credential was partial or unreadable.
    CorruptCredential { reason: String },
    /// The server rejected the token and both stores were cleared.
    /// `clear_failure` holds the error if clearing failed.
    CredentialRejected {
        message: String,
        clear_failure: Option<HuddleError>,
    },
}

/// Result of `enter` and `refresh`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// History loaded; the manager is `Ready`.
    Ready,
    Redirect(RedirectCause),
    /// The fetch failed for a reason other than authorization.
    Failed(HuddleError),
    /// The view was torn down while the fetch was in flight.
    Discarded,
    /// The manager was not in a state that allows this call.
    Unavailable(ManagerState),
}

/// Why a submission was refused before anything was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Text was empty after trimming.
    EmptyMessage,
    /// Another exchange is still in flight.
    Busy,
    NotReady(ManagerState),
}

/// Result of `send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The server replied; `reply` is the appended bot turn.
    ///
    /// `unsaved_session` is set when a new session id could not be
    /// persisted. The manager still uses it for later exchanges.
    Delivered {
        reply: ConversationTurn,
        unsaved_session: Option<HuddleError>,
    },
    Rejected(RejectReason),
    /// No reply arrived; `marker` is the appended failure turn.
    Failed {
        error: HuddleError,
        marker: ConversationTurn,
    },
    Redirect(RedirectCause),
    /// The view was torn down while the exchange was in flight.
    Discarded,
}
