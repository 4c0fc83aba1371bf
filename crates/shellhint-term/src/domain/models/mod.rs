mod action;
mod backend;
mod backend_client;
mod banner;
mod event;
mod menu;
mod spinner;
mod suggestion;

pub use action::*;
pub use backend::*;
pub use backend_client::*;
pub use banner::*;
pub use event::*;
pub use menu::*;
pub use spinner::*;
pub use suggestion::*;
