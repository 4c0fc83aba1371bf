//! Configuration management for the terminal interface.
//!
//! Values come from built-in defaults, environment variables and command line
//! flags, in increasing order of precedence.

mod config;

pub use config::*;
