//! Access guard for protected views.

use super::model::Credential;

/// Why entry was denied.
///
/// Role-specific authorization happens server-side, so the guard only
/// distinguishes the missing-credential case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NoCredential,
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

/// Decides whether a protected action or navigation may proceed.
///
/// Stateless. The caller re-evaluates it on every protected entry against a
/// fresh read of the credential store; on `Deny` the caller is responsible for
/// redirecting to the unauthenticated entry point.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessGuard;

impl AccessGuard {
    /// Allows only when token, role and user id are all present.
    pub fn can_enter(credential: &Credential) -> AccessDecision {
        if credential.is_complete() {
            AccessDecision::Allow
        } else {
            AccessDecision::Deny(DenyReason::NoCredential)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::model::Role;

    #[test]
    fn test_denies_every_credential_without_token() {
        let roles = [None, Some(Role::Employee), Some(Role::Manager), Some(Role::Hr)];
        let user_ids = [None, Some("7".to_string())];

        for role in roles {
            for user_id in &user_ids {
                let credential = Credential::from_parts(None, role, user_id.clone());
                assert_eq!(
                    AccessGuard::can_enter(&credential),
                    AccessDecision::Deny(DenyReason::NoCredential),
                    "role={:?} user_id={:?}",
                    role,
                    user_id
                );
            }
        }
    }

    #[test]
    fn test_denies_token_without_role_or_user() {
        let no_role = Credential::from_parts(Some("T1".into()), None, Some("7".into()));
        assert_ne!(AccessGuard::can_enter(&no_role), AccessDecision::Allow);

        let no_user = Credential::from_parts(Some("T1".into()), Some(Role::Hr), None);
        assert_ne!(AccessGuard::can_enter(&no_user), AccessDecision::Allow);
    }

    #[test]
    fn test_allows_complete_credential() {
        let credential = Credential::new("T1", Role::Manager, "7");
        assert_eq!(AccessGuard::can_enter(&credential), AccessDecision::Allow);
    }
}
