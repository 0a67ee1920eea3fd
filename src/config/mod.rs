//! Configuration management for torscout.
//!
//! Provides the JSON settings file and its XDG-compliant location.

mod settings;

pub use settings::{AppSettings, Paths};
