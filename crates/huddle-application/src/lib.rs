//! Application layer for huddle.
//!
//! Coordinates the domain model, the persisted stores and the remote API into
//! the operations a front end calls: entering a conversational view, sending
//! turns, and logging in and out.

pub mod auth_service;
pub mod session;

#[cfg(test)]
mod test_support;

pub use auth_service::AuthService;
pub use session::{
    ConversationSessionManager, LoadOutcome, RedirectCause, RejectReason, SendOutcome,
};
