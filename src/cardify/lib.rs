//! # Cardify Architecture
//!
//! Cardify is the **editing core of a business-card designer**: a document
//! model of positioned nodes, a linear undo/redo history over immutable
//! document snapshots, and a template store around it. It is a library that
//! happens to ship a CLI, not the other way round.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders output, sets up logging        │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Turns typed-in selectors into TemplateSelectors          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic, returns CmdResult                        │
//! │  - Editing runs through session.rs → history.rs             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - TemplateStore trait                                      │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Editor Core
//!
//! [`history::EditorState`] never mutates a document in place. Every edit
//! ([`edit::EditOp`]) builds a complete replacement [`model::Document`]; the
//! previous one is pushed onto the history stack and the redo stack is
//! cleared. Undo and redo move snapshots between the two stacks. Nothing in
//! the core touches storage: a [`session::Session`] is opened from a stored
//! template and written back explicitly.
//!
//! Geometry may be stored in pixels or as percentages of the card surface
//! ("relative" templates). [`coords`] converts between the two.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular Rust values and returns
//! `Result<CmdResult>`. It never writes to stdout/stderr and never exits the
//! process. Diagnostics go through `tracing`; the CLI decides where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Business logic for each command
//! - [`history`]: Undo/redo state machine
//! - [`edit`] / [`session`]: Editing operations and sessions
//! - [`coords`]: Relative/absolute coordinate conversion and layout
//! - [`model`]: Nodes, documents, templates
//! - [`store`]: Storage abstraction and implementations
//! - [`validation`]: Template schema validation
//! - [`index`]: Display indexes and selectors
//! - [`access`]: Route capability checks
//! - [`config`]: Configuration management
//! - [`init`]: Project discovery and context setup
//! - [`error`]: Error types

pub mod access;
pub mod api;
pub mod commands;
pub mod config;
pub mod coords;
pub mod edit;
pub mod error;
pub mod history;
pub mod index;
pub mod init;
pub mod model;
pub mod session;
pub mod store;
pub mod validation;
