//! # CLI
//!
//! One possible client of the cardify library. This is the only place that
//! knows about terminal I/O, exit codes and log output.
//!
//! - `setup`: clap definitions and grouped help
//! - `commands`: context wiring and per-command handlers
//! - `render`: `CmdResult` pieces to strings
//! - `logging`: the `tracing` subscriber
//!
//! Running `cardify` with no command lists templates.
//!
//! ## Editing from the shell
//!
//! `cardify edit` drives one editing session per invocation. Ops come as
//! JSON lines from `--script FILE` (or `-` for stdin) and/or repeated
//! `--op JSON` flags:
//!
//! ```text
//! cardify edit badge --op '{"op":"move","index":1,"dx":0,"dy":12}' --op '{"op":"undo"}'
//! ```
//!
//! The template is saved once, at the end, and only if the document changed.

mod commands;
mod logging;
mod render;
pub mod setup;

pub use commands::run;
