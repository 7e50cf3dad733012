use crate::context::AppContext;
use anyhow::{Context, Result};
use colored::Colorize;
use huddle_core::api::RegistrationRequest;
use huddle_core::auth::{CredentialLookup, Role};
use rustyline::DefaultEditor;

fn prompt(editor: &mut DefaultEditor, label: &str) -> Result<String> {
    let line = editor
        .readline(&format!("{label}: "))
        .with_context(|| format!("failed to read {label}"))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Reads a secret without echoing it.
fn prompt_secret(label: &str) -> Result<String> {
    rpassword::prompt_password(format!("{label}: "))
        .with_context(|| format!("failed to read {label}"))
}

fn value_or_prompt(editor: &mut DefaultEditor, value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => prompt(editor, label),
    }
}

pub async fn login(ctx: &AppContext, email: Option<String>) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let email = value_or_prompt(&mut editor, email, "Email")?;
    let password = prompt_secret("Password")?;

    let user = ctx.auth.login(&email, &password).await?;
    println!(
        "{}",
        format!("Logged in as user {} ({}).", user.user_id, user.role).bright_green()
    );
    Ok(())
}

pub struct RegisterArgs {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
}

pub async fn register(ctx: &AppContext, args: RegisterArgs) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let email = value_or_prompt(&mut editor, args.email, "Email")?;
    let first_name = value_or_prompt(&mut editor, args.first_name, "First name")?;
    let last_name = value_or_prompt(&mut editor, args.last_name, "Last name")?;
    let password = prompt_secret("Password")?;
    let confirm = prompt_secret("Confirm password")?;

    let request =
        RegistrationRequest::new(&email, &password, &confirm, &first_name, &last_name, args.role)?;
    let message = ctx.auth.register(&request).await?;
    println!("{}", message.bright_green());
    println!("{}", "Run `huddle login` to sign in.".bright_black());
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    ctx.auth.logout()?;
    println!("{}", "Logged out.".bright_green());
    Ok(())
}

pub fn status(ctx: &AppContext) -> Result<()> {
    println!("{} {}", "Server:".bright_black(), ctx.config.api_base_url);
    println!("{} {}", "State:".bright_black(), ctx.state_dir.display());
    match ctx.auth.status()? {
        CredentialLookup::Present(credential) => {
            let role = credential
                .role
                .map(|role| role.to_string())
                .unwrap_or_default();
            let user_id = credential.user_id.unwrap_or_default();
            println!("{}", format!("Logged in as user {user_id} ({role}).").green());
        }
        CredentialLookup::Absent => println!("{}", "Not logged in.".yellow()),
        CredentialLookup::Corrupt { reason } => {
            println!("{}", format!("Stored login is unusable: {reason}").red());
        }
    }
    Ok(())
}
