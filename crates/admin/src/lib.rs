//! Vendor Desk console library.
//!
//! Everything between the domain types in `vendor-desk-core` and a user
//! interface: configuration, the REST gateway, the optimistic editor,
//! per-screen state and the local profile mirror.
//!
//! # Security
//!
//! The console holds the vendor's API token. It is kept in a
//! [`secrecy::SecretString`] and never logged.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod editor;
pub mod error;
pub mod gateway;
pub mod profile;
pub mod screens;
pub mod state;

pub use config::ConsoleConfig;
pub use error::ConsoleError;
pub use state::ConsoleState;
