//! Interaction logic for the command assistant.
//!
//! Models describe suggestions, events and the backend seam. Services hold the
//! state machine and the background work it requests.

pub mod models;
pub mod services;
