use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{BookmarkStore, PhotoStore, TabularBackend};

/// Paths of the photos attached to every bookmark named `name`.
pub fn run<B: TabularBackend, P: PhotoStore>(
    store: &BookmarkStore<B, P>,
    name: &str,
) -> Result<CmdResult> {
    let matching: Vec<_> = store.records().iter().filter(|b| b.name == name).collect();
    let mut result = CmdResult::default();

    if matching.is_empty() {
        result.add_message(CmdMessage::info(format!("No bookmark named '{}'", name)));
        return Ok(result);
    }

    let paths: Vec<_> = matching
        .iter()
        .filter_map(|b| b.photo_reference.as_ref())
        .map(|r| store.photos().path(r))
        .collect();

    if paths.is_empty() {
        result.add_message(CmdMessage::info(format!("'{}' has no photo attached", name)));
    } else {
        for path in &paths {
            if !path.exists() {
                result.add_message(CmdMessage::warning(format!(
                    "Photo file is missing: {}",
                    path.display()
                )));
            }
        }
    }

    Ok(result.with_photo_paths(paths))
}
