use colored::Colorize;
use huddle_application::RedirectCause;
use huddle_core::conversation::{ConversationTurn, Sender};

pub fn print_turn(turn: &ConversationTurn) {
    match turn.sender {
        Sender::User => println!("{}", format!("> {}", turn.text).green()),
        Sender::Bot if turn.is_failure_marker() => println!("{}", turn.text.red()),
        Sender::Bot => {
            for line in turn.text.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
}

pub fn print_conversation(turns: &[ConversationTurn]) {
    if turns.is_empty() {
        println!("{}", "No messages yet.".bright_black());
        return;
    }
    for turn in turns {
        print_turn(turn);
    }
}

/// One-line explanation shown before sending the user back to `huddle login`.
pub fn describe_redirect(cause: &RedirectCause) -> String {
    match cause {
        RedirectCause::AccessDenied(_) => "You are not logged in.".to_string(),
        RedirectCause::CorruptCredential { reason } => {
            format!("Stored login is unusable ({reason}).")
        }
        RedirectCause::CredentialRejected {
            message,
            clear_failure: None,
        } => format!("Your session has expired ({message})."),
        RedirectCause::CredentialRejected {
            message,
            clear_failure: Some(error),
        } => format!(
            "Your session has expired ({message}), but the stored login could not be removed ({error})."
        ),
    }
}

pub fn print_redirect(cause: &RedirectCause) {
    println!("{}", describe_redirect(cause).yellow());
    println!("{}", "Run `huddle login` to sign in.".bright_black());
}
