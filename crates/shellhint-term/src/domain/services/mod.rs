pub mod actions;
pub mod app_state;
pub mod clipboard;
pub mod events;
pub mod executor;

pub use actions::ActionsService;
pub use app_state::AppState;
pub use app_state::Phase;
pub use app_state::Review;
pub use clipboard::ClipboardService;
pub use events::EventsService;
pub use executor::ExecutorService;
