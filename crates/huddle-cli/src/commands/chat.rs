use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::{anyhow, Result};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use super::render::{print_conversation, print_redirect, print_turn};
use crate::context::AppContext;
use huddle_application::{
    ConversationSessionManager, LoadOutcome, RejectReason, SendOutcome,
};

const COMMANDS: [&str; 5] = ["/help", "/history", "/refresh", "/logout", "/quit"];

/// Rustyline helper: slash-command completion, hints and highlighting.
#[derive(Clone)]
struct ChatHelper {
    commands: Vec<String>,
}

impl ChatHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ChatHelper {}

/// Enters the view. Returns false when the caller should stop.
async fn enter(manager: &ConversationSessionManager) -> Result<bool> {
    match manager.enter().await {
        LoadOutcome::Ready => Ok(true),
        LoadOutcome::Redirect(cause) => {
            print_redirect(&cause);
            Ok(false)
        }
        LoadOutcome::Failed(error) => Err(anyhow!("could not load conversation: {error}")),
        LoadOutcome::Discarded => Ok(false),
        LoadOutcome::Unavailable(state) => Err(anyhow!("conversation is busy ({state})")),
    }
}

/// Prints the conversation history once and exits.
pub async fn history(ctx: &AppContext) -> Result<()> {
    let manager = &ctx.manager;
    if enter(manager).await? {
        print_conversation(&manager.messages().await);
    }
    manager.teardown().await;
    Ok(())
}

/// Interactive chat session.
pub async fn run(ctx: &AppContext) -> Result<()> {
    let manager = ctx.manager.clone();
    if !enter(&manager).await? {
        return Ok(());
    }

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ChatHelper::new()));

    println!("{}", "=== Huddle chat ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a question, '/help' for commands, or '/quit' to exit.".bright_black()
    );
    print_conversation(&manager.messages().await);
    println!();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match trimmed {
                    "/quit" | "/exit" | "quit" | "exit" => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    "/help" => {
                        println!("{}", format!("Commands: {}", COMMANDS.join(", ")).bright_black());
                    }
                    "/history" => print_conversation(&manager.messages().await),
                    "/refresh" => match manager.refresh().await {
                        LoadOutcome::Ready => print_conversation(&manager.messages().await),
                        LoadOutcome::Redirect(cause) => {
                            print_redirect(&cause);
                            break;
                        }
                        LoadOutcome::Failed(error) => {
                            println!("{}", format!("Refresh failed: {error}").red())
                        }
                        other => println!("{}", format!("Refresh skipped: {other:?}").yellow()),
                    },
                    "/logout" => {
                        ctx.auth.logout()?;
                        println!("{}", "Logged out.".bright_green());
                        break;
                    }
                    text if text.starts_with('/') => {
                        println!("{}", format!("Unknown command: {text}").bright_black());
                    }
                    text => {
                        if !handle_send(&manager, text).await {
                            break;
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    manager.teardown().await;
    Ok(())
}

/// Sends one turn. Returns false when the session must end.
async fn handle_send(manager: &ConversationSessionManager, text: &str) -> bool {
    match manager.send(text).await {
        SendOutcome::Delivered {
            reply,
            unsaved_session,
        } => {
            print_turn(&reply);
            if let Some(error) = unsaved_session {
                println!(
                    "{}",
                    format!("(conversation id not saved, it will not survive a restart: {error})")
                        .yellow()
                );
            }
            true
        }
        SendOutcome::Failed { error, marker } => {
            print_turn(&marker);
            println!("{}", format!("({error})").bright_black());
            if error.is_network() {
                println!("{}", "Check your connection and try again.".bright_black());
            }
            true
        }
        SendOutcome::Rejected(RejectReason::EmptyMessage) => true,
        SendOutcome::Rejected(RejectReason::Busy) => {
            println!("{}", "Still waiting for the previous reply.".yellow());
            true
        }
        SendOutcome::Rejected(RejectReason::NotReady(state)) => {
            println!("{}", format!("Conversation is not ready ({state}).").yellow());
            true
        }
        SendOutcome::Redirect(cause) => {
            print_redirect(&cause);
            false
        }
        SendOutcome::Discarded => false,
    }
}
