//! # Storage Layer
//!
//! Storage is split in two, the same way for both kinds of data:
//!
//! - A raw I/O trait that knows *how* bytes get to disk:
//!   [`backend::TabularBackend`] for the bookmark table and
//!   [`backend::PhotoStore`] for photo attachments.
//! - [`bookmark_store::BookmarkStore`], which knows *what* the collection means:
//!   ordering, schema back-fill, batch delete by name, rollback on failed writes.
//!
//! ## Implementations
//!
//! - [`csv_backend::CsvBackend`]: production table, one CSV file
//! - [`mem_backend::MemBackend`]: in-memory table for tests
//! - [`photo::FsPhotoStore`]: production photos, one file per attachment
//! - [`photo::MemPhotoStore`]: in-memory photos for tests
//!
//! ## Storage Format
//!
//! ```text
//! <data-dir>/
//! ├── bookmarks.csv       # name,category,latitude,longitude,description,photo_reference
//! ├── photos/             # {owner}_{original filename}
//! └── config.json
//! ```
//!
//! The CSV is rewritten in full on every add or delete. Two sessions writing the
//! same file is not coordinated: the last writer wins.

pub mod backend;
pub mod bookmark_store;
pub mod csv_backend;
pub mod mem_backend;
pub mod photo;
pub mod schema;

pub use backend::{PhotoStore, Row, TabularBackend};
pub use bookmark_store::{BookmarkQuery, BookmarkStore, LoadReport};
