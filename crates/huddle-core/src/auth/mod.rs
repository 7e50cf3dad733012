//! Authentication domain module.
//!
//! # Module Structure
//!
//! - `model`: `Role`, `Credential` and the complete `AuthenticatedUser` form
//! - `store`: `CredentialStore` trait and the normalized `CredentialLookup`
//! - `guard`: `AccessGuard`, the pure entry decision for protected views

mod guard;
mod model;
mod store;

// Re-export public API
pub use guard::{AccessDecision, AccessGuard, DenyReason};
pub use model::{AuthenticatedUser, Credential, Role};
pub use store::{CredentialLookup, CredentialStore};
