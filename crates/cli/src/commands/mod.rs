//! Subcommand implementations. Each drives one console screen.

pub mod attributes;
pub mod orders;
pub mod profile;
