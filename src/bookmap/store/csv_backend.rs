use super::backend::{Row, TabularBackend};
use super::schema;
use crate::error::{BookmapError, Result};
use crate::model::Bookmark;
use log::{debug, warn};
use std::borrow::Cow;
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Bookmark table stored as a single UTF-8 CSV file with a header row.
///
/// Fields that are not valid UTF-8 (e.g. a spreadsheet export in cp949) are
/// decoded lossily instead of failing the read. The file is then copied
/// aside before it is first rewritten.
pub struct CsvBackend {
    path: PathBuf,
    recoded: Cell<bool>,
}

impl CsvBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recoded: Cell::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(BookmapError::Io)?;
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("bookmarks.csv");
        self.path
            .with_file_name(format!(".{}-{}.tmp", file_name, Uuid::new_v4()))
    }

    /// `bookmarks.csv` -> `bookmarks.csv.bak`, next to the table.
    pub fn backup_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("bookmarks.csv");
        self.path.with_file_name(format!("{}.bak", file_name))
    }

    fn write_to(tmp: &Path, records: &[Bookmark]) -> Result<()> {
        let mut writer = csv::Writer::from_path(tmp)?;
        writer.write_record(schema::HEADER)?;
        for bookmark in records {
            writer.write_record(schema::encode(bookmark))?;
        }
        writer.flush().map_err(BookmapError::Io)?;
        Ok(())
    }
}

impl TabularBackend for CsvBackend {
    fn read(&self) -> Result<Option<Vec<Row>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;

        let headers: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|h| {
                String::from_utf8_lossy(h)
                    .trim_start_matches('\u{feff}')
                    .to_string()
            })
            .collect();

        let mut rows = Vec::new();
        let mut recoded = 0;
        for record in reader.byte_records() {
            let record = record?;
            let mut lossy = false;
            let row: Row = headers
                .iter()
                .cloned()
                .zip(record.iter().map(|field| {
                    let text = String::from_utf8_lossy(field);
                    lossy |= matches!(text, Cow::Owned(_));
                    text.into_owned()
                }))
                .collect();
            if lossy {
                recoded += 1;
                warn!(
                    "Row at line {} of {} is not valid UTF-8; undecodable bytes were replaced",
                    record.position().map_or(0, |p| p.line()),
                    self.path.display()
                );
            }
            rows.push(row);
        }

        if recoded > 0 {
            self.recoded.set(true);
        }
        debug!("Read {} rows from {}", rows.len(), self.path.display());
        Ok(Some(rows))
    }

    fn write(&self, records: &[Bookmark]) -> Result<()> {
        self.ensure_parent()?;
        if self.recoded.get() {
            self.back_up()?;
            self.recoded.set(false);
        }

        // Write to a sibling and rename so a failed write never truncates the table
        let tmp = self.tmp_path();
        if let Err(e) = Self::write_to(&tmp, records) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(BookmapError::Io(e));
        }

        debug!("Wrote {} rows to {}", records.len(), self.path.display());
        Ok(())
    }

    fn back_up(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let target = self.backup_path();
        fs::copy(&self.path, &target).map_err(BookmapError::Io)?;
        warn!(
            "Copied {} to {} before rewriting it",
            self.path.display(),
            target.display()
        );
        Ok(Some(target.display().to_string()))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
