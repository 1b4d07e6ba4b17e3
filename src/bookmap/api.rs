//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every bookmap operation, whatever the UI.
//!
//! It dispatches to `commands/*.rs`, normalizes raw inputs (category names,
//! `"lat,lon"` click strings) and returns `Result<CmdResult>`. It does no
//! printing and holds no business rules of its own.
//!
//! ## Generic Over Storage
//!
//! `BookmapApi<B, P>` is generic over the table backend and the photo store:
//! - Production: `BookmapApi<CsvBackend, FsPhotoStore>` via [`BookmapApi::open`]
//! - Testing: `BookmapApi<MemBackend, MemPhotoStore>`

use crate::commands;
use crate::config::BookmapConfig;
use crate::error::Result;
use crate::model::{Category, Coordinate, NewBookmark};
use crate::store::csv_backend::CsvBackend;
use crate::store::photo::FsPhotoStore;
use crate::store::{BookmarkQuery, BookmarkStore, LoadReport, PhotoStore, TabularBackend};

/// The main API facade for bookmap operations.
pub struct BookmapApi<B: TabularBackend, P: PhotoStore> {
    store: BookmarkStore<B, P>,
    paths: BookmapPaths,
    load_report: LoadReport,
}

impl BookmapApi<CsvBackend, FsPhotoStore> {
    /// Open the file-backed store under `paths.data_dir`, honoring its config.
    pub fn open(paths: BookmapPaths) -> Result<Self> {
        let config = BookmapConfig::load(&paths.data_dir)?;
        let backend = CsvBackend::new(config.data_file_path(&paths.data_dir));
        let photos = FsPhotoStore::new(config.photo_dir_path(&paths.data_dir));
        let store =
            BookmarkStore::new(backend, photos).with_fallback_center(config.fallback_center);
        Ok(Self::new(store, paths))
    }
}

impl<B: TabularBackend, P: PhotoStore> BookmapApi<B, P> {
    /// Wrap a store and hydrate it from its backend.
    pub fn new(mut store: BookmarkStore<B, P>, paths: BookmapPaths) -> Self {
        let load_report = store.load();
        Self {
            store,
            paths,
            load_report,
        }
    }

    pub fn add_bookmark(&mut self, candidate: NewBookmark) -> Result<CmdResult> {
        commands::add::run(&mut self.store, candidate)
    }

    pub fn delete_bookmarks(&mut self, name: &str) -> Result<CmdResult> {
        commands::delete::run(&mut self.store, name)
    }

    pub fn list_bookmarks(&self, term: Option<&str>, category: Option<&str>) -> Result<CmdResult> {
        let query = BookmarkQuery {
            term: term.map(str::to_string),
            category: parse_category(category)?,
        };
        commands::list::run(&self.store, &query)
    }

    pub fn center(&self, click: Option<&str>) -> Result<CmdResult> {
        commands::center::run(&self.store, parse_click(click)?)
    }

    pub fn markers(&self, click: Option<&str>) -> Result<CmdResult> {
        commands::markers::run(&self.store, parse_click(click)?)
    }

    pub fn photo_paths(&self, name: &str) -> Result<CmdResult> {
        commands::photo::run(&self.store, name)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn init(&self) -> Result<CmdResult> {
        commands::init::run(&self.paths)
    }

    /// Messages describing a degraded load, empty when the table was clean.
    pub fn load_messages(&self) -> Vec<CmdMessage> {
        let report = &self.load_report;
        let mut messages = Vec::new();
        if report.malformed {
            messages.push(CmdMessage::warning(format!(
                "Bookmark file {} could not be read; starting with an empty list",
                self.store.backend().location()
            )));
        } else if report.skipped > 0 {
            messages.push(CmdMessage::warning(format!(
                "Skipped {} unreadable row(s) in {}",
                report.skipped,
                self.store.backend().location()
            )));
        }
        messages
    }

    /// Current map center when no click is known; seeds add defaults.
    pub fn default_coordinate(&self) -> Coordinate {
        self.store.center_point()
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub fn store(&self) -> &BookmarkStore<B, P> {
        &self.store
    }

    pub fn paths(&self) -> &BookmapPaths {
        &self.paths
    }
}

fn parse_category(category: Option<&str>) -> Result<Option<Category>> {
    category.map(str::parse).transpose()
}

fn parse_click(click: Option<&str>) -> Result<Option<Coordinate>> {
    click.map(str::parse).transpose()
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{
    BookmapPaths, CenterSource, CmdMessage, CmdResult, Marker, MessageLevel,
};
