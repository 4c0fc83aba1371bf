#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Generate(String),
    CopyToClipboard(String),
    ExecuteCommand(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Exited(i32),
    Signalled,
    SpawnFailed(String),
}

/// A finished command and what it printed. Shown to the user once the
/// terminal is handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReport {
    pub command: String,
    pub outcome: CommandOutcome,
    pub output: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        return matches!(self, CommandOutcome::Exited(0));
    }
}
