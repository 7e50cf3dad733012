use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a server-side conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationSessionId(String);

impl ConversationSessionId {
    /// Accepts any non-blank identifier, trimmed.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_blank() {
        assert!(ConversationSessionId::parse("").is_none());
        assert!(ConversationSessionId::parse("   ").is_none());
        assert_eq!(
            ConversationSessionId::parse(" 5f0c ").unwrap().as_str(),
            "5f0c"
        );
    }
}
