use std::io::{self, Write};

use anyhow::{Context, Result, anyhow, bail};

use checklist::remote::ClientError;
use checklist::views::{ChecklistView, Outcome, ShownError};

use crate::cli_runtime::CliContext;
use crate::{Commands, ConfigCommands, ItemCommands, SheetCommands};

mod dispatch;
mod items;
mod render;
mod session;
mod sheets;

const SESSION_EXPIRED: &str = "session expired; run `checklist login`";

pub(crate) async fn handle_command(ctx: &CliContext, command: Commands) -> Result<()> {
    dispatch::handle_command(ctx, command).await
}

fn retry_hint(message: String, retryable: bool) -> anyhow::Error {
    if retryable {
        anyhow!("{} (temporary; re-run the command to try again)", message)
    } else {
        anyhow!(message)
    }
}

/// Error for a direct client call, worded the way the banner would show it.
fn client_failure(err: ClientError) -> anyhow::Error {
    if err.is_session_expired() {
        return anyhow!(SESSION_EXPIRED);
    }
    let retryable = err.is_retryable();
    retry_hint(err.user_message(), retryable)
}

/// Error for a view operation that came back `Failed`.
fn view_failure(shown: Option<&ShownError>, signed_out: bool) -> anyhow::Error {
    if signed_out {
        return anyhow!(SESSION_EXPIRED);
    }
    match shown {
        Some(e) => retry_hint(e.message.clone(), e.retryable),
        None => anyhow!("request failed"),
    }
}

async fn checklist_failure(view: &ChecklistView) -> anyhow::Error {
    let st = view.snapshot().await;
    view_failure(st.error(), st.signed_out)
}

fn expect_done(outcome: Outcome, skipped: &str) -> Result<bool> {
    match outcome {
        Outcome::Done => Ok(true),
        Outcome::Failed => Ok(false),
        Outcome::Skipped => bail!("{}", skipped),
    }
}

/// Interactive yes/no on stderr; anything but `y`/`yes` declines.
fn stdin_confirm(prompt: &str) -> bool {
    eprint!("{} [y/N] ", prompt);
    if io::stderr().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T, what: &str) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).with_context(|| format!("serialize {}", what))?
    );
    Ok(())
}
