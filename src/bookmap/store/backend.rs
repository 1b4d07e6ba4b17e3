use crate::error::Result;
use crate::model::{Bookmark, PhotoRef};
use std::collections::HashMap;
use std::path::PathBuf;

/// One persisted row, keyed by the header names exactly as they were written.
pub type Row = HashMap<String, String>;

/// Abstract interface for the raw bookmark table.
/// This trait handles the "how" of storage (CSV file vs memory),
/// while BookmarkStore handles the "what" (ordering, back-fill, rollback).
pub trait TabularBackend {
    /// Read every data row in file order.
    /// Returns Ok(None) if nothing has been persisted yet.
    /// A file with a header but no rows (or no bytes at all) is Ok(Some(vec![])).
    fn read(&self) -> Result<Option<Vec<Row>>>;

    /// Overwrite the whole table with `records`.
    /// Always writes the full current header, even for an empty collection.
    /// MUST replace the previous table atomically.
    fn write(&self, records: &[Bookmark]) -> Result<()>;

    /// Copy the table as it is now to a side location, if there is one.
    /// Called before overwriting a table that did not load cleanly.
    /// Returns where the copy went, or None when there was nothing to copy.
    fn back_up(&self) -> Result<Option<String>>;

    /// Human-readable location, used in log lines and messages.
    fn location(&self) -> String;
}

/// Abstract interface for photo attachments.
///
/// References are keyed by owner name. Two bookmarks sharing a name and a
/// photo filename share a blob; the later write wins.
pub trait PhotoStore {
    /// Persist `bytes` and return a reference that resolves to them later.
    fn store(&self, owner_name: &str, bytes: &[u8], original_filename: &str) -> Result<PhotoRef>;

    /// Re-read the bytes behind a reference.
    fn read(&self, reference: &PhotoRef) -> Result<Vec<u8>>;

    /// Get the "file path" for a reference.
    /// For FsPhotoStore this is the real path, for MemPhotoStore a virtual one.
    fn path(&self, reference: &PhotoRef) -> PathBuf;
}
