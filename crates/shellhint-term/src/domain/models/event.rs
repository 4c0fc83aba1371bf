use tui_textarea::Input;

use super::BackendError;
use super::CommandReport;
use super::RawSuggestionPayload;

#[derive(Debug)]
pub enum Event {
    BackendPullStarted,
    BackendPullProgress(u8),
    BackendResponse(RawSuggestionPayload),
    BackendFailure(BackendError),
    ClipboardFailed(String),
    CommandFinished(CommandReport),
    KeyboardCharInput(Input),
    KeyboardCTRLC,
    KeyboardEnter,
    KeyboardPaste(String),
    KeyboardUp,
    KeyboardDown,
    UITick,
}
