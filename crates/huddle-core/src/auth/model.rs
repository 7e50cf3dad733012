//! Credential domain model.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, Display, EnumString};

/// Role granted by the remote service at login.
///
/// Authorization by role is enforced server-side; the client only forwards
/// the role it was told it holds.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Role {
    #[default]
    Employee,
    Manager,
    #[serde(rename = "HR")]
    #[strum(serialize = "HR")]
    Hr,
}

/// The credential triple as held by the client.
///
/// Every field may be absent so that a partially-persisted entry can be
/// represented and rejected. A credential is only usable when all three
/// fields are present, see [`Credential::authenticated`].
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: Option<String>,
    pub role: Option<Role>,
    pub user_id: Option<String>,
}

impl Credential {
    /// Creates a complete credential.
    pub fn new(token: impl Into<String>, role: Role, user_id: impl Into<String>) -> Self {
        Self::from_parts(Some(token.into()), Some(role), Some(user_id.into()))
    }

    /// Creates a credential from possibly-missing parts, treating blank
    /// strings as absent.
    pub fn from_parts(token: Option<String>, role: Option<Role>, user_id: Option<String>) -> Self {
        Self {
            token: non_blank(token),
            role,
            user_id: non_blank(user_id),
        }
    }

    /// The credential with every field absent.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.role.is_none() && self.user_id.is_none()
    }

    /// True when token, role and user id are all present.
    pub fn is_complete(&self) -> bool {
        self.token.is_some() && self.role.is_some() && self.user_id.is_some()
    }

    /// Names of the fields that are absent.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.token.is_none() {
            missing.push("token");
        }
        if self.role.is_none() {
            missing.push("role");
        }
        if self.user_id.is_none() {
            missing.push("user_id");
        }
        missing
    }

    /// Returns the complete form, or `None` if any field is absent.
    pub fn authenticated(&self) -> Option<AuthenticatedUser> {
        match (&self.token, self.role, &self.user_id) {
            (Some(token), Some(role), Some(user_id)) => Some(AuthenticatedUser {
                token: token.clone(),
                role,
                user_id: user_id.clone(),
            }),
            _ => None,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// A credential with every field present.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub token: String,
    pub role: Role,
    pub user_id: String,
}

impl fmt::Debug for AuthenticatedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedUser")
            .field("token", &"<redacted>")
            .field("role", &self.role)
            .field("user_id", &self.user_id)
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trips_server_names() {
        assert_eq!(Role::Hr.to_string(), "HR");
        assert_eq!(Role::Manager.as_ref(), "Manager");
        assert_eq!(Role::from_str("HR").unwrap(), Role::Hr);
        assert_eq!(Role::from_str("manager").unwrap(), Role::Manager);
        assert!(Role::from_str("Admin").is_err());

        let json = serde_json::to_string(&Role::Hr).unwrap();
        assert_eq!(json, "\"HR\"");
    }

    #[test]
    fn test_blank_parts_are_absent() {
        let credential = Credential::from_parts(Some("  ".into()), Some(Role::Manager), Some(String::new()));
        assert!(credential.token.is_none());
        assert!(credential.user_id.is_none());
        assert_eq!(credential.missing_fields(), vec!["token", "user_id"]);
    }

    #[test]
    fn test_authenticated_requires_every_field() {
        let full = Credential::new("T1", Role::Manager, "7");
        let user = full.authenticated().unwrap();
        assert_eq!(user.token, "T1");
        assert_eq!(user.role, Role::Manager);
        assert_eq!(user.user_id, "7");

        let no_role = Credential::from_parts(Some("T1".into()), None, Some("7".into()));
        assert!(no_role.authenticated().is_none());
        assert!(!no_role.is_complete());
        assert!(!no_role.is_empty());
    }

    #[test]
    fn test_debug_redacts_token() {
        let credential = Credential::new("secret-token", Role::Employee, "1");
        let rendered = format!("{:?}", credential);
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
