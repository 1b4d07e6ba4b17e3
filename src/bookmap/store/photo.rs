use super::backend::PhotoStore;
use crate::error::{BookmapError, Result};
use crate::model::PhotoRef;
use log::debug;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Build the blob name for an attachment: `{owner}_{original filename}`.
///
/// Only the final component of `original_filename` is used, and characters
/// that are awkward in file names are replaced with `_`.
pub fn blob_name(owner_name: &str, original_filename: &str) -> String {
    let base = Path::new(original_filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("photo");
    format!("{}_{}", sanitize(owner_name), sanitize(base))
}

fn sanitize(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Reduce a reference to a bare file name so it cannot point outside the root.
fn contained(reference: &PhotoRef) -> Option<&str> {
    Path::new(reference.as_str())
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| *n != "..")
}

/// Photo attachments stored as plain files under one directory.
pub struct FsPhotoStore {
    root: PathBuf,
}

impl FsPhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PhotoStore for FsPhotoStore {
    fn store(&self, owner_name: &str, bytes: &[u8], original_filename: &str) -> Result<PhotoRef> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(BookmapError::Io)?;
        }
        let name = blob_name(owner_name, original_filename);
        fs::write(self.root.join(&name), bytes).map_err(BookmapError::Io)?;
        debug!("Stored {} byte photo as {}", bytes.len(), name);
        Ok(PhotoRef::new(name))
    }

    fn read(&self, reference: &PhotoRef) -> Result<Vec<u8>> {
        let name = contained(reference)
            .ok_or_else(|| BookmapError::PhotoNotFound(reference.to_string()))?;
        fs::read(self.root.join(name)).map_err(|e| match e.kind() {
            ErrorKind::NotFound => BookmapError::PhotoNotFound(reference.to_string()),
            _ => BookmapError::Io(e),
        })
    }

    fn path(&self, reference: &PhotoRef) -> PathBuf {
        match contained(reference) {
            Some(name) => self.root.join(name),
            None => self.root.clone(),
        }
    }
}

/// In-memory photo store for testing.
#[derive(Default)]
pub struct MemPhotoStore {
    blobs: RefCell<HashMap<String, Vec<u8>>>,
    simulate_write_error: Cell<bool>,
}

impl MemPhotoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    pub fn len(&self) -> usize {
        self.blobs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.borrow().is_empty()
    }
}

impl PhotoStore for MemPhotoStore {
    fn store(&self, owner_name: &str, bytes: &[u8], original_filename: &str) -> Result<PhotoRef> {
        if self.simulate_write_error.get() {
            return Err(BookmapError::Store("Simulated photo write error".to_string()));
        }
        let name = blob_name(owner_name, original_filename);
        self.blobs.borrow_mut().insert(name.clone(), bytes.to_vec());
        Ok(PhotoRef::new(name))
    }

    fn read(&self, reference: &PhotoRef) -> Result<Vec<u8>> {
        self.blobs
            .borrow()
            .get(reference.as_str())
            .cloned()
            .ok_or_else(|| BookmapError::PhotoNotFound(reference.to_string()))
    }

    fn path(&self, reference: &PhotoRef) -> PathBuf {
        PathBuf::from("/mem/photos").join(reference.as_str())
    }
}
