use crate::config::BookmapConfig;
use crate::model::{Bookmark, Coordinate};
use std::path::PathBuf;

pub mod add;
pub mod center;
pub mod config;
pub mod delete;
pub mod init;
pub mod list;
pub mod markers;
pub mod photo;

pub use center::CenterSource;
pub use markers::Marker;

/// Where bookmap keeps its files.
#[derive(Debug, Clone)]
pub struct BookmapPaths {
    pub data_dir: PathBuf,
}

impl BookmapPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_bookmarks: Vec<Bookmark>,
    pub listed_bookmarks: Vec<Bookmark>,
    pub markers: Vec<Marker>,
    pub center: Option<(Coordinate, CenterSource)>,
    pub photo_paths: Vec<PathBuf>,
    pub config: Option<BookmapConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_bookmarks(mut self, bookmarks: Vec<Bookmark>) -> Self {
        self.affected_bookmarks = bookmarks;
        self
    }

    pub fn with_listed_bookmarks(mut self, bookmarks: Vec<Bookmark>) -> Self {
        self.listed_bookmarks = bookmarks;
        self
    }

    pub fn with_markers(mut self, markers: Vec<Marker>) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_center(mut self, center: Coordinate, source: CenterSource) -> Self {
        self.center = Some((center, source));
        self
    }

    pub fn with_photo_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.photo_paths = paths;
        self
    }

    pub fn with_config(mut self, config: BookmapConfig) -> Self {
        self.config = Some(config);
        self
    }
}
