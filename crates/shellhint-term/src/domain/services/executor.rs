#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;

use std::env;
use std::process::Stdio;

use tokio::process::Command;

use crate::domain::models::CommandOutcome;
use crate::domain::models::CommandReport;

#[cfg(not(target_os = "windows"))]
fn user_shell() -> (String, &'static str) {
    let shell = env::var("SHELL")
        .ok()
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| "sh".to_string());
    return (shell, "-c");
}

#[cfg(target_os = "windows")]
fn user_shell() -> (String, &'static str) {
    let shell = env::var("ComSpec").unwrap_or_else(|_| "cmd".to_string());
    return (shell, "/C");
}

pub struct ExecutorService {}

impl ExecutorService {
    /// Runs a command line through the user's shell and waits for it. Output
    /// is captured since the terminal belongs to the UI. The child is killed
    /// if the wait is dropped, so nothing outlives the session.
    pub async fn run(command: &str) -> CommandReport {
        let (shell, flag) = user_shell();
        tracing::info!(shell = %shell, command = %command, "executing command");

        let output = Command::new(&shell)
            .arg(flag)
            .arg(command)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(err) => {
                tracing::error!(error = %err, shell = %shell, "failed to spawn shell");
                return CommandReport {
                    command: command.to_string(),
                    outcome: CommandOutcome::SpawnFailed(err.to_string()),
                    output: "".to_string(),
                };
            }
        };

        tracing::info!(
            status = ?output.status,
            stdout = %String::from_utf8_lossy(&output.stdout),
            stderr = %String::from_utf8_lossy(&output.stderr),
            "command finished"
        );

        let outcome = match output.status.code() {
            Some(code) => CommandOutcome::Exited(code),
            None => CommandOutcome::Signalled,
        };

        return CommandReport {
            command: command.to_string(),
            outcome,
            output: format!(
                "{}{}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            ),
        };
    }
}
