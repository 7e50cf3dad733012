//! Wire shapes of the remote API and their validation.
//!
//! Everything the server sends is decoded into loose structs first and then
//! checked here, so only well-formed values reach the domain types.

use huddle_core::api::{
    ExchangeReply, ExchangeRequest, HistoryEntry, LoginGrant, LoginRequest, RegistrationRequest,
    ServerHistory, UserProfile,
};
use huddle_core::auth::Role;
use huddle_core::conversation::{ConversationSessionId, Sender};
use huddle_core::error::{HuddleError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Serialize)]
pub(crate) struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a LoginRequest> for LoginBody<'a> {
    fn from(request: &'a LoginRequest) -> Self {
        Self {
            email: &request.email,
            password: &request.password,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct RegisterBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub role: String,
}

impl<'a> From<&'a RegistrationRequest> for RegisterBody<'a> {
    fn from(request: &'a RegistrationRequest) -> Self {
        Self {
            email: &request.email,
            password: &request.password,
            first_name: &request.first_name,
            last_name: &request.last_name,
            role: request.role.to_string(),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct ExchangeBody<'a> {
    pub role: String,
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

impl<'a> From<&'a ExchangeRequest> for ExchangeBody<'a> {
    fn from(request: &'a ExchangeRequest) -> Self {
        Self {
            role: request.role.to_string(),
            query: &request.query,
            session_id: request.session_id.as_ref().map(ConversationSessionId::as_str),
        }
    }
}

/// Error payload; the server uses `msg`, other layers in front of it may not.
#[derive(Deserialize, Default)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}

#[derive(Deserialize)]
pub(crate) struct LoginReplyBody {
    #[serde(default, alias = "access_token")]
    pub token: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl LoginReplyBody {
    pub fn validate(self) -> Result<LoginGrant> {
        let token = non_blank(self.token)
            .ok_or_else(|| HuddleError::malformed("login reply has no token"))?;
        let role = parse_role(self.role.as_deref())?;
        Ok(LoginGrant { token, role })
    }
}

#[derive(Deserialize)]
pub(crate) struct MessageBody {
    #[serde(default)]
    pub msg: Option<String>,
}

/// Ids arrive as integers from some deployments and strings from others.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum WireId {
    Number(i64),
    Text(String),
}

#[derive(Deserialize)]
pub(crate) struct ProfileBody {
    #[serde(default)]
    pub id: Option<WireId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl ProfileBody {
    pub fn validate(self) -> Result<UserProfile> {
        let id = match self.id {
            Some(WireId::Number(n)) => Some(n.to_string()),
            Some(WireId::Text(s)) => non_blank(Some(s)),
            None => None,
        }
        .ok_or_else(|| HuddleError::malformed("profile has no user id"))?;
        let role = parse_role(self.role.as_deref())?;
        Ok(UserProfile {
            id,
            email: self.email.unwrap_or_default(),
            role,
        })
    }
}

#[derive(Deserialize)]
pub(crate) struct HistoryEntryBody {
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default, alias = "message")]
    pub text: Option<String>,
}

impl HistoryEntryBody {
    fn validate(self, index: usize) -> Result<HistoryEntry> {
        let raw_sender = self
            .sender
            .ok_or_else(|| HuddleError::malformed(format!("history entry {} has no sender", index)))?;
        let sender = Sender::from_str(raw_sender.trim()).map_err(|_| {
            HuddleError::malformed(format!(
                "history entry {} has unknown sender '{}'",
                index, raw_sender
            ))
        })?;
        let text = self
            .text
            .ok_or_else(|| HuddleError::malformed(format!("history entry {} has no text", index)))?;
        Ok(HistoryEntry { sender, text })
    }
}

#[derive(Deserialize)]
pub(crate) struct HistoryBody {
    #[serde(default)]
    pub history: Vec<HistoryEntryBody>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl HistoryBody {
    pub fn validate(self) -> Result<ServerHistory> {
        let entries = self
            .history
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.validate(index))
            .collect::<Result<Vec<_>>>()?;
        Ok(ServerHistory {
            entries,
            session_id: self.session_id.as_deref().and_then(ConversationSessionId::parse),
        })
    }
}

#[derive(Deserialize)]
pub(crate) struct ExchangeReplyBody {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ExchangeReplyBody {
    pub fn validate(self) -> Result<ExchangeReply> {
        let response = self
            .response
            .ok_or_else(|| HuddleError::malformed("chat reply has no response text"))?;
        Ok(ExchangeReply {
            response,
            session_id: self.session_id.as_deref().and_then(ConversationSessionId::parse),
        })
    }
}

fn parse_role(raw: Option<&str>) -> Result<Role> {
    let raw = raw
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| HuddleError::malformed("role is missing"))?;
    Role::from_str(raw).map_err(|_| HuddleError::malformed(format!("unknown role '{}'", raw)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
