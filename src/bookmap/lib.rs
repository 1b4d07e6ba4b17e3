//! # Bookmap Architecture
//!
//! Bookmap keeps a personal list of places (name, category, coordinates,
//! description, optional photo) in a plain CSV file and feeds them to
//! whatever draws the map. It is a library first; the `bookmap` binary is one
//! client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, reads photo files, prints results      │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Parses categories and "lat,lon" strings                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Turns store results into CmdResult + messages            │
//! │  - Center precedence: click > last bookmark > fallback      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - BookmarkStore: ordered collection, rollback on failure   │
//! │  - TabularBackend / PhotoStore traits + CSV, fs, memory     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust values, returns `Result<CmdResult>`,
//! and never writes to stdout/stderr. Diagnostics go through the `log` facade;
//! the binary decides where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per operation
//! - [`store`]: The bookmark store and its backends
//! - [`model`]: `Bookmark`, `Category`, `Coordinate`, `PhotoRef`
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
