//! # Rolodex Architecture
//!
//! Rolodex is a personal assistant for contacts and notes: an address book
//! with phones, birthdays, emails and addresses, and a notebook of tagged
//! notes. Both live in JSON files under a data directory and are driven from
//! an interactive command loop.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Reads command lines, prints results, owns exit codes     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Picks the collection, holds the registry lock            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic over AddressBook / Notebook               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - FileStorage: one JSON document per collection            │
//! │  - DataManager: registry of storages with dirty tracking    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing writes to stdout or stderr and nothing calls
//! `std::process::exit`. Diagnostics go through `log` to the files set up by
//! [`logging`].
//!
//! ## Persistence
//!
//! Collections are loaded when the API opens and kept in memory. They are
//! written back on `save`, on `exit`/`close`/end of input, and when the
//! process receives SIGINT or SIGTERM (see [`shutdown`]).
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`fields`]: Validated field types (`Name`, `Phone`, `Birthday`, ...)
//! - [`model`]: `Record` and `Note`
//! - [`address_book`] / [`notebook`]: The two collections
//! - [`store`]: File storage and the storage registry
//! - [`shutdown`]: Flush-on-signal
//! - [`config`]: Configuration management
//! - [`logging`]: Rotating file logs
//! - [`error`]: Error types
//! - `cli`: Line parsing and printing for the binary (not part of the lib API)

pub mod address_book;
pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod fields;
pub mod logging;
pub mod model;
pub mod notebook;
pub mod shutdown;
pub mod store;
