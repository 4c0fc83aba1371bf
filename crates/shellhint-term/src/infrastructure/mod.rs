//! Infrastructure layer providing external integrations.
//!
//! This module contains the model backend clients.

pub mod clients;
