//! Vendor Desk Core - Shared types and list-view logic.
//!
//! This crate holds the pieces of the vendor console that need no I/O. It is
//! used by:
//! - `admin` - Console state, remote gateway and screen controllers
//! - `cli` - Command-line front end over the admin crate
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure derived-state
//! functions - no HTTP clients, no file access. This keeps it lightweight
//! and allows every list-view rule to be tested in isolation.
//!
//! # Modules
//!
//! - [`types`] - Entities, type-safe IDs, emails, statuses and money helpers
//! - [`listing`] - Order filtering, tab counts, selection, bulk actions, paging

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod listing;
pub mod types;

pub use types::*;
