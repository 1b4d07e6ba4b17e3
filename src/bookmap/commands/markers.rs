//! Marker feed for an external map renderer.
//!
//! bookmap does not draw maps. It hands a renderer one marker per bookmark,
//! colored by category, plus the center to open the map on.

use crate::commands::CmdResult;
use crate::commands::center::resolve_center;
use crate::error::Result;
use crate::model::{Bookmark, Category, Coordinate};
use crate::store::{BookmarkStore, PhotoStore, TabularBackend};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub name: String,
    pub category: Category,
    pub coordinate: Coordinate,
    pub color: &'static str,
    pub tooltip: String,
    /// HTML snippet: bold name, then the description when there is one.
    /// Both are escaped.
    pub popup: String,
}

impl From<&Bookmark> for Marker {
    fn from(bookmark: &Bookmark) -> Self {
        let popup = if bookmark.description.is_empty() {
            escape_html(&bookmark.name)
        } else {
            format!(
                "<b>{}</b><br>{}",
                escape_html(&bookmark.name),
                escape_html(&bookmark.description)
            )
        };
        Self {
            name: bookmark.name.clone(),
            category: bookmark.category,
            coordinate: bookmark.coordinate(),
            color: bookmark.category.marker_color(),
            tooltip: bookmark.name.clone(),
            popup,
        }
    }
}

/// Escape text for use inside the popup HTML.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn run<B: TabularBackend, P: PhotoStore>(
    store: &BookmarkStore<B, P>,
    click: Option<Coordinate>,
) -> Result<CmdResult> {
    let markers = store.records().iter().map(Marker::from).collect();
    let (center, source) = resolve_center(click, store);
    Ok(CmdResult::default()
        .with_markers(markers)
        .with_center(center, source))
}
