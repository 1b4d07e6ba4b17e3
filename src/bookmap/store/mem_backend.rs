use super::backend::{Row, TabularBackend};
use super::schema;
use crate::error::{BookmapError, Result};
use crate::model::Bookmark;
use std::cell::{Cell, RefCell};

/// In-memory table backend for testing.
///
/// Uses `RefCell` for interior mutability since bookmap is single-threaded,
/// so the `TabularBackend` trait can take `&self` everywhere.
/// Records are stored as encoded rows, so reads go through the same
/// schema mapping as the CSV file.
#[derive(Default)]
pub struct MemBackend {
    rows: RefCell<Option<Vec<Row>>>,
    simulate_write_error: Cell<bool>,
    simulate_read_error: Cell<bool>,
    writes: Cell<usize>,
    backup: RefCell<Option<Vec<Row>>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw rows, e.g. to mimic a file written by an older schema.
    pub fn with_rows(rows: Vec<Row>) -> Self {
        let backend = Self::default();
        *backend.rows.borrow_mut() = Some(rows);
        backend
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Make reads fail as if the persisted table were corrupt.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Rows saved by the last `back_up`, if any.
    pub fn backup(&self) -> Option<Vec<Row>> {
        self.backup.borrow().clone()
    }

    /// Snapshot of the persisted rows.
    pub fn rows(&self) -> Option<Vec<Row>> {
        self.rows.borrow().clone()
    }
}

impl TabularBackend for MemBackend {
    fn read(&self) -> Result<Option<Vec<Row>>> {
        if self.simulate_read_error.get() {
            return Err(BookmapError::Store("Simulated read error".to_string()));
        }
        Ok(self.rows.borrow().clone())
    }

    fn write(&self, records: &[Bookmark]) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(BookmapError::Store("Simulated write error".to_string()));
        }
        let rows = records.iter().map(schema::encode_row).collect();
        *self.rows.borrow_mut() = Some(rows);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn back_up(&self) -> Result<Option<String>> {
        let Some(rows) = self.rows.borrow().clone() else {
            return Ok(None);
        };
        *self.backup.borrow_mut() = Some(rows);
        Ok(Some("memory backup".to_string()))
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    /// Build a row from `(header, value)` pairs.
    pub fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Rows as older versions wrote them: Korean headers, no
    /// category or photo columns.
    pub fn legacy_rows() -> Vec<Row> {
        vec![
            row(&[
                ("이름", "시청"),
                ("위도", "37.5665"),
                ("경도", "126.978"),
                ("설명", "서울 중심"),
            ]),
            row(&[
                ("이름", "Cafe Noir"),
                ("위도", "37.55"),
                ("경도", "126.99"),
                ("설명", ""),
            ]),
        ]
    }
}
