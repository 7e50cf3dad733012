//! Conversation turn types.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Who authored a turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Sender {
    User,
    Bot,
}

/// Where a turn came from.
///
/// Origin never takes part in matching; two turns are the same content when
/// sender and text agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOrigin {
    /// Recorded by the server (fetched history, or acknowledged by an exchange).
    Server,
    /// User turn appended before the server acknowledged it.
    Optimistic,
    /// Synthetic bot turn recording that no reply arrived.
    FailureMarker,
}

/// A single entry in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub sender: Sender,
    pub text: String,
    /// Client-assigned ordering key; meaningless to the server.
    pub sequence: u64,
    pub origin: TurnOrigin,
}

impl ConversationTurn {
    /// A turn recorded by the server.
    pub fn confirmed(sender: Sender, text: impl Into<String>, sequence: u64) -> Self {
        Self {
            sender,
            text: text.into(),
            sequence,
            origin: TurnOrigin::Server,
        }
    }

    /// A user turn appended ahead of the server's acknowledgement.
    pub fn optimistic(text: impl Into<String>, sequence: u64) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            sequence,
            origin: TurnOrigin::Optimistic,
        }
    }

    /// A bot turn standing in for a reply that never arrived.
    pub fn failure_marker(text: impl Into<String>, sequence: u64) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            sequence,
            origin: TurnOrigin::FailureMarker,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.origin == TurnOrigin::Server
    }

    pub fn is_failure_marker(&self) -> bool {
        self.origin == TurnOrigin::FailureMarker
    }

    /// Content equality used for de-duplication against server history.
    pub fn same_content(&self, other: &ConversationTurn) -> bool {
        self.sender == other.sender && self.text.trim() == other.text.trim()
    }
}

/// Monotonic source of local sequence numbers.
///
/// Never reset, so sequences stay strictly increasing for the lifetime of a
/// manager even when the conversation is rebuilt.
#[derive(Debug, Clone, Default)]
pub struct SequenceCounter {
    next: u64,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next sequence number and advances.
    pub fn allocate(&mut self) -> u64 {
        let value = self.next;
        self.next += 1;
        value
    }
}
