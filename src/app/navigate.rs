use std::process::{Command, ExitStatus};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, warn};

/// Receives session activations from the graph and routes them outward.
///
/// With an open command configured, every `{id}` in it is replaced by the
/// session id and the result is spawned; otherwise the activation is only
/// recorded and logged.
pub(in crate::app) struct SessionNavigator {
    open_command: Option<String>,
    last_opened: Option<String>,
}

impl SessionNavigator {
    pub fn new(open_command: Option<String>) -> Self {
        Self {
            open_command: open_command.filter(|command| !command.trim().is_empty()),
            last_opened: None,
        }
    }

    pub fn last_opened(&self) -> Option<&str> {
        self.last_opened.as_deref()
    }

    pub fn open(&mut self, session_id: &str) {
        info!(session = session_id, "navigating to session canvas");
        self.last_opened = Some(session_id.to_owned());

        if let Some(template) = &self.open_command
            && let Err(error) = spawn_open_command(template, session_id)
        {
            warn!(session = session_id, "failed to open session: {error:#}");
        }
    }
}

fn command_args(template: &str, session_id: &str) -> Vec<String> {
    template
        .split_whitespace()
        .map(|part| part.replace("{id}", session_id))
        .collect()
}

/// Spawns the open command and reaps it on a detached waiter thread.
fn spawn_open_command(template: &str, session_id: &str) -> Result<JoinHandle<Option<ExitStatus>>> {
    let args = command_args(template, session_id);
    let (program, rest) = args
        .split_first()
        .ok_or_else(|| anyhow!("open command is empty"))?;

    let mut child = Command::new(program)
        .args(rest)
        .spawn()
        .with_context(|| format!("failed to spawn {program} with args: {rest:?}"))?;

    let program = program.clone();
    thread::Builder::new()
        .name("open-command-waiter".to_owned())
        .spawn(move || match child.wait() {
            Ok(status) => {
                debug!(%program, %status, "open command exited");
                Some(status)
            }
            Err(error) => {
                warn!(%program, "failed to wait for open command: {error}");
                None
            }
        })
        .context("failed to start open command waiter")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_session_id_in_every_argument() {
        let args = command_args("xdg-open https://canvas.local/{id}?from={id}", "s-42");
        assert_eq!(args, vec!["xdg-open", "https://canvas.local/s-42?from=s-42"]);
    }

    #[test]
    fn records_last_activation_without_command() {
        let mut navigator = SessionNavigator::new(Some("   ".to_owned()));
        assert_eq!(navigator.last_opened(), None);
        navigator.open("alpha");
        navigator.open("beta");
        assert_eq!(navigator.last_opened(), Some("beta"));
    }

    #[cfg(unix)]
    #[test]
    fn spawned_command_is_reaped() {
        let waiter = spawn_open_command("true {id}", "s-1").unwrap();
        let status = waiter.join().unwrap();
        assert!(status.is_some_and(|status| status.success()));
    }

    #[test]
    fn missing_program_is_an_error() {
        assert!(spawn_open_command("definitely-not-a-real-program-9f2c {id}", "x").is_err());
    }
}
