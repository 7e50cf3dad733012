//! Domain layer for the Huddle client.
//!
//! Holds the credential and conversation models, the store traits that the
//! infrastructure layer implements, the access guard, the history reconciler
//! and the `ChatApi` seam to the remote service.

pub mod api;
pub mod auth;
pub mod config;
pub mod conversation;
pub mod error;

// Re-export common error type
pub use error::{HuddleError, Result};
