//! Terminal assistant that turns a plain-language request into a single shell
//! command using a locally hosted model.
//!
//! The interaction is a three phase state machine (editing, waiting, reviewing)
//! driven by one event loop. Model calls, clipboard writes and command
//! execution run in the background and report back as events.

pub mod application;
pub mod configuration;
pub mod domain;
pub mod infrastructure;
pub use application::ui::{destruct_terminal_for_panic, start_loop, start_ui};
pub use configuration::{Config, ConfigKey};
pub use domain::models::{Action, BackendClient, BackendName, Event, Suggestion};
pub use domain::services::{ActionsService, AppState};
pub use infrastructure::clients::BackendClientManager;
