use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::Coordinate;
use crate::store::{BookmarkStore, PhotoStore, TabularBackend};
use serde::Serialize;
use std::fmt;

/// Which rule picked the map center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CenterSource {
    Click,
    LastBookmark,
    Fallback,
}

impl fmt::Display for CenterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CenterSource::Click => "last map click",
            CenterSource::LastBookmark => "most recent bookmark",
            CenterSource::Fallback => "default center",
        };
        f.write_str(s)
    }
}

/// Pick the map center: click location > last-added bookmark > fallback.
///
/// The click comes from the map renderer, so this precedence lives here and
/// not in the store.
pub fn resolve_center<B: TabularBackend, P: PhotoStore>(
    click: Option<Coordinate>,
    store: &BookmarkStore<B, P>,
) -> (Coordinate, CenterSource) {
    match click {
        Some(point) => (point, CenterSource::Click),
        None if store.is_empty() => (store.center_point(), CenterSource::Fallback),
        None => (store.center_point(), CenterSource::LastBookmark),
    }
}

pub fn run<B: TabularBackend, P: PhotoStore>(
    store: &BookmarkStore<B, P>,
    click: Option<Coordinate>,
) -> Result<CmdResult> {
    let (center, source) = resolve_center(click, store);
    Ok(CmdResult::default().with_center(center, source))
}
