//! The authoritative in-memory bookmark collection for one session.
//!
//! # Invariants
//! - Insertion order is preserved; the last record is the most recently added.
//! - Every successful `add`/`delete` leaves the backing table equal to the
//!   in-memory collection. A failed write rolls the mutation back.
//! - `load` never fails: unreadable or empty tables become an empty collection,
//!   rows from older schemas are back-filled.
//! - A table that did not load cleanly is copied aside through
//!   `TabularBackend::back_up` before it is first overwritten. If the copy
//!   fails the write is refused.
//! - Names are not unique. `delete` removes every record with the exact name.

use super::backend::{PhotoStore, TabularBackend};
use super::schema;
use crate::error::{BookmapError, Result};
use crate::model::{Bookmark, Category, Coordinate, NewBookmark};
use log::{debug, info, warn};

/// What `load` found in the backing table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records now in memory.
    pub loaded: usize,
    /// Rows that lacked newer columns and were filled with defaults.
    pub backfilled: usize,
    /// Rows that could not be turned into a bookmark.
    pub skipped: usize,
    /// The table could not be parsed at all, or no row was usable.
    pub malformed: bool,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped == 0 && !self.malformed
    }
}

/// Free-text term plus optional category, both optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkQuery {
    pub term: Option<String>,
    pub category: Option<Category>,
}

impl BookmarkQuery {
    pub fn term(term: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
            category: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
}

/// Lowercased needle, or `None` when everything should match.
fn needle(term: Option<&str>) -> Option<String> {
    term.filter(|t| !t.trim().is_empty())
        .map(str::to_lowercase)
}

fn matches_needle(bookmark: &Bookmark, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => format!("{} {}", bookmark.name, bookmark.description)
            .to_lowercase()
            .contains(needle),
    }
}

pub struct BookmarkStore<B: TabularBackend, P: PhotoStore> {
    backend: B,
    photos: P,
    records: Vec<Bookmark>,
    fallback_center: Coordinate,
    back_up_before_write: bool,
}

impl<B: TabularBackend, P: PhotoStore> BookmarkStore<B, P> {
    /// An empty store. Call [`BookmarkStore::load`] to hydrate it.
    pub fn new(backend: B, photos: P) -> Self {
        Self {
            backend,
            photos,
            records: Vec::new(),
            fallback_center: Coordinate::DEFAULT_CENTER,
            back_up_before_write: false,
        }
    }

    /// Coordinate returned by `center_point` while the collection is empty.
    pub fn with_fallback_center(mut self, center: Coordinate) -> Self {
        self.fallback_center = center;
        self
    }

    /// Replace the in-memory collection with what the backend holds.
    ///
    /// Read-only on the backend and safe to call repeatedly.
    pub fn load(&mut self) -> LoadReport {
        let location = self.backend.location();
        let mut report = LoadReport::default();
        self.back_up_before_write = false;

        let rows = match self.backend.read() {
            Ok(Some(rows)) => rows,
            Ok(None) => {
                debug!("No bookmarks persisted at {}", location);
                self.records.clear();
                return report;
            }
            Err(e) => {
                warn!("Treating unreadable bookmark table {} as empty: {}", location, e);
                report.malformed = true;
                self.back_up_before_write = true;
                self.records.clear();
                return report;
            }
        };

        let mut records = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            match schema::decode_row(row) {
                Ok(decoded) => {
                    if decoded.backfilled {
                        report.backfilled += 1;
                    }
                    records.push(decoded.bookmark);
                }
                Err(e) => {
                    warn!("Skipping row {} of {}: {}", i + 1, location, e);
                    report.skipped += 1;
                }
            }
        }

        if records.is_empty() && report.skipped > 0 {
            report.malformed = true;
        }
        self.back_up_before_write = !report.is_clean();
        if report.backfilled > 0 {
            info!(
                "Back-filled {} bookmark rows from an older layout in {}",
                report.backfilled, location
            );
        }

        report.loaded = records.len();
        self.records = records;
        debug!("Loaded {} bookmarks from {}", report.loaded, location);
        report
    }

    pub fn records(&self) -> &[Bookmark] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn photos(&self) -> &P {
        &self.photos
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Append a bookmark and persist the whole collection.
    ///
    /// Returns `Ok(None)` without touching anything when the name is blank.
    /// A photo, if given, is stored first; if that fails nothing is added.
    /// If the table write fails the append is undone.
    pub fn add(&mut self, candidate: NewBookmark) -> Result<Option<&Bookmark>> {
        let name = candidate.name.trim();
        if name.is_empty() {
            debug!("Ignoring bookmark with a blank name");
            return Ok(None);
        }
        let name = name.to_string();
        let coordinate = Coordinate::new(candidate.latitude, candidate.longitude)?;

        let photo_reference = match &candidate.photo {
            Some(upload) => Some(
                self.photos
                    .store(&name, &upload.bytes, &upload.original_filename)
                    .map_err(|e| BookmapError::PhotoWrite {
                        name: name.clone(),
                        reason: e.to_string(),
                    })?,
            ),
            None => None,
        };

        self.records.push(Bookmark {
            name,
            category: candidate.category,
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            description: candidate.description,
            photo_reference,
        });

        if let Err(e) = self.persist() {
            let undone = self.records.pop();
            warn!(
                "Rolled back bookmark {:?} after failed write: {}",
                undone.map(|b| b.name),
                e
            );
            return Err(e);
        }

        let added = self.records.last();
        if let Some(b) = added {
            info!("Added bookmark '{}' at {}", b.name, b.coordinate());
        }
        Ok(added)
    }

    /// Remove every bookmark named exactly `name` and persist.
    ///
    /// Returns the removed records. No match is a successful no-op.
    pub fn delete(&mut self, name: &str) -> Result<Vec<Bookmark>> {
        if !self.records.iter().any(|b| b.name == name) {
            debug!("No bookmark named '{}' to delete", name);
            return Ok(Vec::new());
        }

        let (removed, kept): (Vec<Bookmark>, Vec<Bookmark>) =
            self.records.iter().cloned().partition(|b| b.name == name);
        let previous = std::mem::replace(&mut self.records, kept);

        if let Err(e) = self.persist() {
            self.records = previous;
            warn!("Rolled back delete of '{}' after failed write: {}", name, e);
            return Err(e);
        }

        info!("Deleted {} bookmark(s) named '{}'", removed.len(), name);
        Ok(removed)
    }

    /// Case-insensitive substring search over name and description.
    ///
    /// `None`, `""` and whitespace-only terms match every record. Results keep
    /// collection order and borrow the store; call again for a new term.
    pub fn search<'a>(
        &'a self,
        term: Option<&str>,
    ) -> impl Iterator<Item = &'a Bookmark> + use<'a, B, P> {
        let needle = needle(term);
        self.records
            .iter()
            .filter(move |b| matches_needle(b, needle.as_deref()))
    }

    /// `search` narrowed to one category when the query names one.
    pub fn filter<'a>(
        &'a self,
        query: &BookmarkQuery,
    ) -> impl Iterator<Item = &'a Bookmark> + use<'a, B, P> {
        let category = query.category;
        self.search(query.term.as_deref())
            .filter(move |b| category.is_none_or(|c| b.category == c))
    }

    /// Coordinate of the most recently added bookmark, or the fallback.
    ///
    /// Callers that know a fresher point (a map click) should prefer it:
    /// click location > last-added record > fallback.
    pub fn center_point(&self) -> Coordinate {
        self.records
            .last()
            .map(Bookmark::coordinate)
            .unwrap_or(self.fallback_center)
    }

    fn persist(&mut self) -> Result<()> {
        if self.back_up_before_write {
            self.backend.back_up().map_err(|e| {
                BookmapError::Persistence(format!(
                    "refusing to overwrite {} without a backup: {}",
                    self.backend.location(),
                    e
                ))
            })?;
            self.back_up_before_write = false;
        }
        self.backend
            .write(&self.records)
            .map_err(|e| BookmapError::Persistence(e.to_string()))?;
        debug!(
            "Persisted {} bookmarks to {}",
            self.records.len(),
            self.backend.location()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PhotoRef, PhotoUpload};
    use crate::store::mem_backend::{MemBackend, fixtures};
    use crate::store::photo::MemPhotoStore;

    type TestStore = BookmarkStore<MemBackend, MemPhotoStore>;

    fn make_store() -> TestStore {
        BookmarkStore::new(MemBackend::new(), MemPhotoStore::new())
    }

    fn names(store: &TestStore) -> Vec<&str> {
        store.records().iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn test_load_with_nothing_persisted_is_empty() {
        let mut store = make_store();
        let report = store.load();
        assert!(store.is_empty());
        assert!(report.is_clean());
        assert_eq!(report.loaded, 0);
    }

    #[test]
    fn test_load_zero_rows_is_empty() {
        let mut store = BookmarkStore::new(MemBackend::with_rows(vec![]), MemPhotoStore::new());
        let report = store.load();
        assert!(store.is_empty());
        assert!(!report.malformed);
    }

    #[test]
    fn test_load_unreadable_table_is_empty_not_error() {
        let backend = MemBackend::new();
        backend.set_simulate_read_error(true);
        let mut store = BookmarkStore::new(backend, MemPhotoStore::new());

        let report = store.load();

        assert!(store.is_empty());
        assert!(report.malformed);
    }

    #[test]
    fn test_load_backfills_legacy_rows() {
        let mut store = BookmarkStore::new(
            MemBackend::with_rows(fixtures::legacy_rows()),
            MemPhotoStore::new(),
        );

        let report = store.load();

        assert_eq!(report.loaded, 2);
        assert_eq!(report.backfilled, 2);
        assert_eq!(names(&store), vec!["시청", "Cafe Noir"]);
        assert!(store.records().iter().all(|b| b.category == Category::Other));
        assert!(store.records().iter().all(|b| b.photo_reference.is_none()));
    }

    #[test]
    fn test_load_does_not_write() {
        let mut store = BookmarkStore::new(
            MemBackend::with_rows(fixtures::legacy_rows()),
            MemPhotoStore::new(),
        );
        store.load();
        store.load();
        assert_eq!(store.backend().write_count(), 0);
        assert!(store.backend().rows().unwrap()[0].contains_key("이름"));
    }

    #[test]
    fn test_load_skips_unusable_rows_and_keeps_order() {
        let rows = vec![
            fixtures::row(&[("name", "A"), ("latitude", "1"), ("longitude", "1")]),
            fixtures::row(&[("name", "B"), ("latitude", "north"), ("longitude", "1")]),
            fixtures::row(&[("name", "C"), ("latitude", "3"), ("longitude", "3")]),
        ];
        let mut store = BookmarkStore::new(MemBackend::with_rows(rows), MemPhotoStore::new());

        let report = store.load();

        assert_eq!(names(&store), vec!["A", "C"]);
        assert_eq!(report.skipped, 1);
        assert!(!report.malformed);
    }

    #[test]
    fn test_load_with_no_usable_rows_is_malformed() {
        let rows = vec![fixtures::row(&[("title", "A"), ("url", "x")])];
        let mut store = BookmarkStore::new(MemBackend::with_rows(rows), MemPhotoStore::new());

        let report = store.load();

        assert!(store.is_empty());
        assert!(report.malformed);
    }

    #[test]
    fn test_skipped_rows_are_backed_up_before_first_write() {
        let rows = vec![
            fixtures::row(&[("name", "A"), ("latitude", "1"), ("longitude", "1")]),
            fixtures::row(&[("name", "B"), ("latitude", "north"), ("longitude", "1")]),
        ];
        let mut store = BookmarkStore::new(MemBackend::with_rows(rows.clone()), MemPhotoStore::new());
        assert_eq!(store.load().skipped, 1);
        assert!(store.backend().backup().is_none());

        store.add(NewBookmark::new("C", 3.0, 3.0)).unwrap();
        assert_eq!(store.backend().backup(), Some(rows.clone()));

        // Later writes overwrite a table this session wrote itself
        store.add(NewBookmark::new("D", 4.0, 4.0)).unwrap();
        assert_eq!(store.backend().backup(), Some(rows));
        assert_eq!(names(&store), vec!["A", "C", "D"]);
    }

    #[test]
    fn test_clean_load_writes_without_backup() {
        let mut store = BookmarkStore::new(
            MemBackend::with_rows(fixtures::legacy_rows()),
            MemPhotoStore::new(),
        );
        store.load();

        store.add(NewBookmark::new("C", 3.0, 3.0)).unwrap();

        assert!(store.backend().backup().is_none());
        assert_eq!(store.backend().write_count(), 1);
    }

    #[test]
    fn test_adds_preserve_count_and_order() {
        let mut store = make_store();
        for (i, name) in ["one", "two", "three", "two"].iter().enumerate() {
            store
                .add(NewBookmark::new(*name, i as f64, i as f64))
                .unwrap();
        }
        assert_eq!(store.len(), 4);
        assert_eq!(names(&store), vec!["one", "two", "three", "two"]);
        assert_eq!(store.backend().write_count(), 4);
    }

    #[test]
    fn test_add_trims_name_and_defaults_category() {
        let mut store = make_store();
        let added = store.add(NewBookmark::new("  Park  ", 1.0, 2.0)).unwrap().unwrap();
        assert_eq!(added.name, "Park");
        assert_eq!(added.category, Category::Other);
    }

    #[test]
    fn test_blank_name_is_noop() {
        let mut store = make_store();
        assert!(store.add(NewBookmark::new("   ", 1.0, 2.0)).unwrap().is_none());
        assert!(store.is_empty());
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn test_invalid_coordinate_is_rejected_before_any_change() {
        let mut store = make_store();
        let err = store.add(NewBookmark::new("Nowhere", 120.0, 0.0)).unwrap_err();
        assert!(matches!(err, BookmapError::InvalidCoordinate(_)));
        assert!(store.is_empty());
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn test_add_with_photo_stores_reference() {
        let mut store = make_store();
        let candidate = NewBookmark::new("Cafe X", 37.5, 127.0)
            .with_category(Category::Cafe)
            .with_photo(PhotoUpload::new(b"jpeg".to_vec(), "front.jpg"));

        let reference = store
            .add(candidate)
            .unwrap()
            .unwrap()
            .photo_reference
            .clone()
            .unwrap();

        assert_eq!(reference, PhotoRef::new("Cafe_X_front.jpg"));
        assert_eq!(store.photos().read(&reference).unwrap(), b"jpeg");
        assert_eq!(
            store.backend().rows().unwrap()[0]["photo_reference"],
            "Cafe_X_front.jpg"
        );
    }

    #[test]
    fn test_photo_failure_aborts_add() {
        let mut store = make_store();
        store.photos().set_simulate_write_error(true);
        let candidate = NewBookmark::new("Cafe X", 37.5, 127.0)
            .with_photo(PhotoUpload::new(b"jpeg".to_vec(), "front.jpg"));

        let err = store.add(candidate).unwrap_err();

        assert!(matches!(err, BookmapError::PhotoWrite { .. }));
        assert!(store.is_empty());
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn test_failed_write_rolls_back_add() {
        let mut store = make_store();
        store.add(NewBookmark::new("Kept", 1.0, 1.0)).unwrap();
        store.backend().set_simulate_write_error(true);

        let err = store.add(NewBookmark::new("Lost", 2.0, 2.0)).unwrap_err();

        assert!(matches!(err, BookmapError::Persistence(_)));
        assert_eq!(names(&store), vec!["Kept"]);
        assert_eq!(store.backend().rows().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_removes_all_and_only_exact_matches() {
        let mut store = make_store();
        for name in ["Twin", "twin", "Other", "Twin"] {
            store.add(NewBookmark::new(name, 0.0, 0.0)).unwrap();
        }

        let removed = store.delete("Twin").unwrap();

        assert_eq!(removed.len(), 2);
        assert_eq!(names(&store), vec!["twin", "Other"]);
        assert_eq!(store.backend().rows().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_without_match_succeeds_unchanged() {
        let mut store = make_store();
        store.add(NewBookmark::new("A", 0.0, 0.0)).unwrap();

        assert!(store.delete("B").unwrap().is_empty());
        assert_eq!(names(&store), vec!["A"]);
    }

    #[test]
    fn test_failed_write_rolls_back_delete() {
        let mut store = make_store();
        store.add(NewBookmark::new("A", 0.0, 0.0)).unwrap();
        store.add(NewBookmark::new("B", 0.0, 0.0)).unwrap();
        store.backend().set_simulate_write_error(true);

        let err = store.delete("A").unwrap_err();

        assert!(matches!(err, BookmapError::Persistence(_)));
        assert_eq!(names(&store), vec!["A", "B"]);
    }

    #[test]
    fn test_add_delete_delete_scenario() {
        let mut store = make_store();
        store
            .add(NewBookmark::new("Cafe X", 37.50, 127.00).with_category(Category::Cafe))
            .unwrap();
        assert_eq!(store.len(), 1);

        store.delete("Cafe X").unwrap();
        assert_eq!(store.len(), 0);

        assert!(store.delete("Cafe X").is_ok());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_search_is_case_insensitive_on_name_and_description() {
        let mut store = make_store();
        store
            .add(NewBookmark::new("Cafe Noir", 1.0, 1.0).with_description("quiet"))
            .unwrap();
        store.add(NewBookmark::new("Library", 2.0, 2.0)).unwrap();

        assert_eq!(store.search(Some("noir")).count(), 1);
        assert_eq!(store.search(Some("NOIR")).count(), 1);
        assert_eq!(store.search(Some("QUIET")).next().unwrap().name, "Cafe Noir");
        assert_eq!(store.search(Some("bar")).count(), 0);
    }

    #[test]
    fn test_empty_search_returns_everything_in_order() {
        let mut store = make_store();
        for name in ["c", "a", "b"] {
            store.add(NewBookmark::new(name, 0.0, 0.0)).unwrap();
        }
        let all: Vec<&str> = store.search(Some("")).map(|b| b.name.as_str()).collect();
        assert_eq!(all, vec!["c", "a", "b"]);
        assert_eq!(store.search(None).count(), 3);
        assert_eq!(store.search(Some("   ")).count(), 3);
    }

    #[test]
    fn test_search_is_restartable_and_read_only() {
        let mut store = make_store();
        store.add(NewBookmark::new("Alpha", 0.0, 0.0)).unwrap();
        store.add(NewBookmark::new("Beta", 0.0, 0.0)).unwrap();

        let first: Vec<_> = store.search(Some("alpha")).cloned().collect();
        let second: Vec<_> = store.search(Some("beta")).cloned().collect();

        assert_eq!(first[0].name, "Alpha");
        assert_eq!(second[0].name, "Beta");
        assert_eq!(store.len(), 2);
        assert_eq!(store.backend().write_count(), 2);
    }

    #[test]
    fn test_filter_by_category() {
        let mut store = make_store();
        store
            .add(NewBookmark::new("Bean", 0.0, 0.0).with_category(Category::Cafe))
            .unwrap();
        store
            .add(NewBookmark::new("Bistro", 0.0, 0.0).with_category(Category::Restaurant))
            .unwrap();

        let cafes: Vec<_> = store
            .filter(&BookmarkQuery::default().with_category(Category::Cafe))
            .collect();
        assert_eq!(cafes.len(), 1);
        assert_eq!(cafes[0].name, "Bean");

        let none: Vec<_> = store
            .filter(&BookmarkQuery::term("bean").with_category(Category::Restaurant))
            .collect();
        assert!(none.is_empty());
    }

    #[test]
    fn test_center_point_follows_last_added() {
        let mut store = make_store();
        assert_eq!(store.center_point(), Coordinate::DEFAULT_CENTER);

        store.add(NewBookmark::new("A", 10.0, 20.0)).unwrap();
        assert_eq!(store.center_point(), Coordinate::new(10.0, 20.0).unwrap());

        store.add(NewBookmark::new("B", 30.0, 40.0)).unwrap();
        assert_eq!(store.center_point(), Coordinate::new(30.0, 40.0).unwrap());
    }

    #[test]
    fn test_center_point_uses_configured_fallback() {
        let fallback = Coordinate::new(35.1796, 129.0756).unwrap();
        let store = make_store().with_fallback_center(fallback);
        assert_eq!(store.center_point(), fallback);
    }

    #[test]
    fn test_reload_round_trips_collection() {
        let mut store = make_store();
        store
            .add(
                NewBookmark::new("Cafe Noir", 37.123456, 127.654321)
                    .with_category(Category::Cafe)
                    .with_description("quiet, \"good\" coffee"),
            )
            .unwrap();
        store
            .add(NewBookmark::new("Library", -33.8688, 151.2093).with_category(Category::StudySpot))
            .unwrap();
        let before = store.records().to_vec();

        let report = store.load();

        assert!(report.is_clean());
        assert_eq!(report.backfilled, 0);
        assert_eq!(store.records(), before.as_slice());
    }
}
