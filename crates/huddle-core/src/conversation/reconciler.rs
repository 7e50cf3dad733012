//! Merge of server-confirmed history with locally-optimistic turns.
//!
//! The server is authoritative for every turn it returns. Local user turns the
//! server has not recorded are kept after the server prefix so a message sent
//! just before a reload does not vanish; local turns the server already shows
//! are dropped so they do not appear twice. The server does not echo client
//! sequence numbers, so acknowledgement is matched on sender and text only.
//!
//! Duplicate text follows the server's count: if the server shows a text, no
//! optimistic copy of that text is re-appended, however many were queued.

use super::turn::{ConversationTurn, Sender, TurnOrigin};
use std::collections::HashSet;

/// Produces the single ordered conversation.
///
/// - `server_history` is returned unchanged as the prefix.
/// - Each `User` turn of `local_optimistic` that no server `User` turn
///   matches is appended, in local order. A failure marker directly following
///   such a turn is kept with it.
/// - With an empty `server_history`, `local_optimistic` is returned as is.
pub fn reconcile(
    server_history: &[ConversationTurn],
    local_optimistic: &[ConversationTurn],
) -> Vec<ConversationTurn> {
    if server_history.is_empty() {
        return local_optimistic.to_vec();
    }

    let acknowledged: HashSet<&str> = server_history
        .iter()
        .filter(|turn| turn.sender == Sender::User)
        .map(|turn| turn.text.trim())
        .collect();

    let mut merged = server_history.to_vec();
    let mut previous_user_kept = false;

    for turn in local_optimistic {
        match turn.sender {
            Sender::User => {
                if acknowledged.contains(turn.text.trim()) {
                    tracing::debug!(
                        "[HistoryReconciler] Dropping acknowledged local turn seq={}",
                        turn.sequence
                    );
                    previous_user_kept = false;
                } else {
                    merged.push(turn.clone());
                    previous_user_kept = true;
                }
            }
            Sender::Bot => {
                if previous_user_kept && turn.origin == TurnOrigin::FailureMarker {
                    merged.push(turn.clone());
                }
                previous_user_kept = false;
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(turns: &[(Sender, &str)]) -> Vec<ConversationTurn> {
        turns
            .iter()
            .enumerate()
            .map(|(i, (sender, text))| ConversationTurn::confirmed(*sender, *text, i as u64))
            .collect()
    }

    fn texts(turns: &[ConversationTurn]) -> Vec<(Sender, &str)> {
        turns.iter().map(|t| (t.sender, t.text.as_str())).collect()
    }

    #[test]
    fn test_empty_local_is_identity() {
        let history = server(&[
            (Sender::User, "hi"),
            (Sender::Bot, "hello"),
            (Sender::User, "status?"),
            (Sender::Bot, "all good"),
        ]);
        assert_eq!(reconcile(&history, &[]), history);
        assert!(reconcile(&[], &[]).is_empty());
    }

    #[test]
    fn test_empty_server_returns_local_unmodified() {
        let local = vec![
            ConversationTurn::optimistic("first", 10),
            ConversationTurn::failure_marker("no reply", 11),
            ConversationTurn::optimistic("first", 12),
        ];
        assert_eq!(reconcile(&[], &local), local);
    }

    #[test]
    fn test_unacknowledged_turn_is_appended_after_server_prefix() {
        let history = server(&[(Sender::User, "hi"), (Sender::Bot, "hello")]);
        let local = vec![ConversationTurn::optimistic("sent before reload", 9)];

        let merged = reconcile(&history, &local);
        assert_eq!(
            texts(&merged),
            vec![
                (Sender::User, "hi"),
                (Sender::Bot, "hello"),
                (Sender::User, "sent before reload"),
            ]
        );
        assert_eq!(merged[2].origin, TurnOrigin::Optimistic);
    }

    #[test]
    fn test_acknowledged_turn_is_not_duplicated() {
        let history = server(&[(Sender::User, "hi"), (Sender::Bot, "hello")]);
        let local = vec![ConversationTurn::optimistic("hi", 3)];

        assert_eq!(reconcile(&history, &local), history);
    }

    #[test]
    fn test_server_count_wins_for_duplicate_text() {
        let history = server(&[(Sender::User, "yes"), (Sender::Bot, "ok")]);
        let local = vec![
            ConversationTurn::optimistic("yes", 5),
            ConversationTurn::optimistic("yes", 6),
        ];

        let merged = reconcile(&history, &local);
        let user_yes = merged
            .iter()
            .filter(|t| t.sender == Sender::User && t.text == "yes")
            .count();
        assert_eq!(user_yes, 1);
    }

    #[test]
    fn test_local_order_preserved_for_unacknowledged_turns() {
        let history = server(&[(Sender::User, "a"), (Sender::Bot, "b")]);
        let local = vec![
            ConversationTurn::optimistic("x", 7),
            ConversationTurn::optimistic("a", 8),
            ConversationTurn::optimistic("y", 9),
        ];

        let merged = reconcile(&history, &local);
        let appended: Vec<u64> = merged[2..].iter().map(|t| t.sequence).collect();
        assert_eq!(appended, vec![7, 9]);
    }

    #[test]
    fn test_failure_marker_follows_its_kept_turn_only() {
        let history = server(&[(Sender::User, "a"), (Sender::Bot, "b")]);
        let local = vec![
            ConversationTurn::optimistic("a", 7),
            ConversationTurn::failure_marker("no reply", 8),
            ConversationTurn::optimistic("lost", 9),
            ConversationTurn::failure_marker("no reply", 10),
        ];

        let merged = reconcile(&history, &local);
        let sequences: Vec<u64> = merged[2..].iter().map(|t| t.sequence).collect();
        assert_eq!(sequences, vec![9, 10]);
    }

    #[test]
    fn test_no_adjacent_duplicates_when_local_is_subset_of_server() {
        let history = server(&[
            (Sender::User, "one"),
            (Sender::Bot, "r1"),
            (Sender::User, "two"),
            (Sender::Bot, "r2"),
        ]);
        let local = vec![
            ConversationTurn::optimistic("two", 20),
            ConversationTurn::optimistic("one", 21),
            ConversationTurn::optimistic("two", 22),
        ];

        let merged = reconcile(&history, &local);
        for pair in merged.windows(2) {
            assert!(!pair[0].same_content(&pair[1]), "adjacent duplicate: {:?}", pair);
        }
        assert_eq!(merged.len(), history.len());
    }
}
