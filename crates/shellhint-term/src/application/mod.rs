//! Terminal front end: argument parsing, logging setup, the draw loop and the
//! pure render step.

pub mod cli;
pub mod logging;
pub mod render;
pub mod ui;
