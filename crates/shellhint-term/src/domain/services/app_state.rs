use anyhow::Result;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;
use tui_textarea::TextArea;

use crate::domain::models::Action;
use crate::domain::models::BackendError;
use crate::domain::models::Banner;
use crate::domain::models::CommandOutcome;
use crate::domain::models::CommandReport;
use crate::domain::models::Event;
use crate::domain::models::MenuAction;
use crate::domain::models::RawSuggestionPayload;
use crate::domain::models::SpinnerKind;
use crate::domain::models::Suggestion;

#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

pub const INPUT_PLACEHOLDER: &str = "Describe the command you want to run";
pub const DANGER_NOTICE: &str = "WARNING: This command could be dangerous to run";
pub const PULL_NOTICE: &str = "Pulling the model from the server";
pub const UNSAFE_RUN_NOTICE: &str =
    "Command not executed because it is not safe, copy it and run it manually";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub suggestion: Suggestion,
    pub selected: MenuAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Awaiting,
    Reviewing(Review),
}

fn new_input<'a>() -> TextArea<'a> {
    let mut input = TextArea::default();
    input.set_placeholder_text(INPUT_PLACEHOLDER);
    return input;
}

pub struct AppState<'a> {
    pub banner: Option<Banner>,
    pub finished: Vec<CommandReport>,
    pub input: TextArea<'a>,
    pub phase: Phase,
    pub should_quit: bool,
    pub spinner: SpinnerKind,
    pub spinner_tick: usize,
}

impl<'a> Default for AppState<'a> {
    fn default() -> AppState<'a> {
        return AppState::new();
    }
}

impl<'a> AppState<'a> {
    pub fn new() -> AppState<'a> {
        return AppState {
            banner: None,
            finished: vec![],
            input: new_input(),
            phase: Phase::Editing,
            should_quit: false,
            spinner: SpinnerKind::random(&mut rand::thread_rng()),
            spinner_tick: 0,
        };
    }

    pub fn input_text(&self) -> String {
        return self.input.lines().join("\n");
    }

    pub fn suggestion(&self) -> Option<&Suggestion> {
        if let Phase::Reviewing(review) = &self.phase {
            return Some(&review.suggestion);
        }

        return None;
    }

    pub fn selected_action(&self) -> Option<MenuAction> {
        if let Phase::Reviewing(review) = &self.phase {
            return Some(review.selected);
        }

        return None;
    }

    pub fn spinner_frame(&self) -> &'static str {
        return self.spinner.frame(self.spinner_tick);
    }

    /// Applies one event. Background work is requested through `tx`; nothing
    /// here blocks on it.
    pub fn handle_event(&mut self, event: Event, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if self.should_quit {
            tracing::debug!(event = ?event, "ignoring event after quit");
            return Ok(());
        }

        match event {
            Event::KeyboardCTRLC => self.quit(),
            Event::UITick => self.tick(),
            Event::KeyboardEnter => match self.phase {
                Phase::Editing => self.submit(tx)?,
                Phase::Reviewing(_) => self.activate(tx)?,
                Phase::Awaiting => tracing::debug!("request in flight, ignoring submit"),
            },
            Event::KeyboardUp => self.navigate(MenuAction::previous),
            Event::KeyboardDown => self.navigate(MenuAction::next),
            Event::KeyboardCharInput(input) => self.handle_char_input(input),
            Event::KeyboardPaste(text) => {
                if self.phase == Phase::Editing {
                    self.input.insert_str(text.replace(['\r', '\n'], " "));
                }
            }
            Event::BackendPullStarted => {
                if self.phase == Phase::Awaiting {
                    self.banner = Some(Banner::info(PULL_NOTICE));
                }
            }
            Event::BackendPullProgress(percent) => {
                if self.phase == Phase::Awaiting {
                    self.banner = Some(Banner::info(&format!("Pulling model: {percent}%")));
                }
            }
            Event::BackendResponse(payload) => self.handle_backend_response(payload),
            Event::BackendFailure(err) => self.handle_backend_failure(err),
            Event::ClipboardFailed(reason) => {
                self.banner = Some(Banner::warning(&format!(
                    "Failed to copy to clipboard: {reason}"
                )));
            }
            Event::CommandFinished(report) => self.handle_command_finished(report),
        }

        return Ok(());
    }

    fn quit(&mut self) {
        tracing::debug!("quitting");
        self.should_quit = true;
    }

    fn tick(&mut self) {
        if self.phase != Phase::Awaiting {
            return;
        }

        self.spinner_tick += 1;
        if self.spinner_tick > self.spinner.reseed_threshold() {
            self.spinner = SpinnerKind::random(&mut rand::thread_rng());
            self.spinner_tick = 0;
        }
    }

    fn submit(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        let request = self.input_text().trim().to_string();
        if request.is_empty() {
            tracing::debug!("ignoring empty submit");
            return Ok(());
        }

        self.input = new_input();
        self.banner = None;
        self.phase = Phase::Awaiting;
        tx.send(Action::Generate(request))?;

        return Ok(());
    }

    fn handle_backend_response(&mut self, payload: RawSuggestionPayload) {
        if self.phase != Phase::Awaiting {
            tracing::debug!("ignoring response, no request in flight");
            return;
        }

        let suggestion = match Suggestion::parse(&payload) {
            Ok(suggestion) => suggestion,
            Err(err) => {
                tracing::warn!(payload = %payload.as_str(), error = %err, "unusable suggestion");
                self.handle_backend_failure(err);
                return;
            }
        };

        self.banner = if suggestion.safe {
            None
        } else {
            Some(Banner::warning(DANGER_NOTICE))
        };
        self.phase = Phase::Reviewing(Review {
            suggestion,
            selected: MenuAction::default(),
        });
    }

    fn handle_backend_failure(&mut self, err: BackendError) {
        if self.phase != Phase::Awaiting {
            tracing::debug!(error = %err, "ignoring failure, no request in flight");
            return;
        }

        self.phase = Phase::Editing;
        self.banner = Some(Banner::warning(&err.to_string()));
    }

    fn handle_command_finished(&mut self, report: CommandReport) {
        let text = match &report.outcome {
            outcome if outcome.success() => None,
            CommandOutcome::Exited(code) => Some(format!("Command exited with status {code}")),
            CommandOutcome::Signalled => Some("Command was terminated by a signal".to_string()),
            CommandOutcome::SpawnFailed(reason) => Some(format!("Failed to run command: {reason}")),
        };

        if let Some(text) = text {
            self.banner = Some(Banner::warning(&text));
        }
        self.finished.push(report);
    }

    fn handle_char_input(&mut self, input: Input) {
        match self.phase {
            Phase::Editing => {
                // Single line input, Enter is handled as submit.
                if matches!(
                    input,
                    Input {
                        key: Key::Char('m') | Key::Char('j'),
                        ctrl: true,
                        ..
                    }
                ) {
                    return;
                }
                self.input.input(input);
            }
            Phase::Reviewing(_) => match input.key {
                Key::Char('k') => self.navigate(MenuAction::previous),
                Key::Char('j') => self.navigate(MenuAction::next),
                Key::Char('q') | Key::Esc => self.quit(),
                _ => {}
            },
            Phase::Awaiting => {}
        }
    }

    fn navigate(&mut self, step: fn(&MenuAction) -> MenuAction) {
        if let Phase::Reviewing(review) = &mut self.phase {
            review.selected = step(&review.selected);
        }
    }

    fn activate(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        let Phase::Reviewing(review) = &self.phase else {
            return Ok(());
        };
        let suggestion = review.suggestion.clone();
        let selected = review.selected;

        match selected {
            MenuAction::Copy => {
                tx.send(Action::CopyToClipboard(suggestion.command))?;
                self.banner = Some(Banner::info("Copied to clipboard"));
            }
            MenuAction::Run => {
                if suggestion.safe {
                    tx.send(Action::ExecuteCommand(suggestion.command))?;
                    self.banner = Some(Banner::info("Command executed"));
                } else {
                    tracing::warn!(command = %suggestion.command, "refusing to run unsafe command");
                    self.banner = Some(Banner::warning(UNSAFE_RUN_NOTICE));
                }
            }
            MenuAction::AskAgain => {
                self.input = new_input();
                self.banner = None;
                self.phase = Phase::Editing;
            }
            MenuAction::Quit => self.quit(),
        }

        return Ok(());
    }
}
