use serde::Serialize;
use strum::Display;

/// Lifecycle of a conversational view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum ManagerState {
    /// No view entered yet, or the view was torn down.
    Uninitialized,
    /// Initial (or refresh) history fetch in flight.
    Loading,
    /// Accepting user submissions.
    Ready,
    /// One exchange in flight; further submissions are rejected.
    Sending,
    /// Initial fetch failed; re-entering the view retries.
    Error,
}

impl ManagerState {
    /// States from which entering the view issues a history fetch.
    pub fn can_enter(&self) -> bool {
        matches!(self, Self::Uninitialized | Self::Error)
    }
}
