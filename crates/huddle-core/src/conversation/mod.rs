//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `turn`: `ConversationTurn`, its `Sender` and `TurnOrigin`, and the local `SequenceCounter`
//! - `session_id`: the opaque `ConversationSessionId` issued by the server
//! - `store`: `ConversationSessionStore` trait for persisting that id
//! - `reconciler`: merge of server history with optimistic local turns
//! - `state`: lifecycle states of the session manager

mod reconciler;
mod session_id;
mod state;
mod store;
mod turn;

// Re-export public API
pub use reconciler::reconcile;
pub use session_id::ConversationSessionId;
pub use state::ManagerState;
pub use store::ConversationSessionStore;
pub use turn::{ConversationTurn, Sender, SequenceCounter, TurnOrigin};
