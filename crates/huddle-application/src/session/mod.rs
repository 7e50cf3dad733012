//! Conversation session management.

mod manager;
mod outcome;

pub use manager::{ConversationSessionManager, FAILURE_MARKER_TEXT};
pub use outcome::{LoadOutcome, RedirectCause, RejectReason, SendOutcome};
