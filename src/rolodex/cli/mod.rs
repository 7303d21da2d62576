//! # CLI Layer
//!
//! The interactive client for rolodex. This is the only place that reads
//! stdin, writes to the terminal or decides the exit code.
//!
//! - `setup`: startup flags and per-line command parsing (clap)
//! - `commands`: startup, the read loop and dispatch to [`rolodex::api::RolodexApi`]
//! - `print`: rendering of `CmdResult` values

mod commands;
mod print;
mod setup;

pub use commands::run;
