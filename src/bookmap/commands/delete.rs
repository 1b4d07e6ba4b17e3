use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{BookmarkStore, PhotoStore, TabularBackend};

pub fn run<B: TabularBackend, P: PhotoStore>(
    store: &mut BookmarkStore<B, P>,
    name: &str,
) -> Result<CmdResult> {
    let removed = store.delete(name)?;
    let mut result = CmdResult::default();

    match removed.len() {
        0 => result.add_message(CmdMessage::info(format!("No bookmark named '{}'", name))),
        1 => result.add_message(CmdMessage::success(format!("Bookmark deleted: {}", name))),
        n => result.add_message(CmdMessage::success(format!(
            "Deleted {} bookmarks named '{}'",
            n, name
        ))),
    }

    Ok(result.with_affected_bookmarks(removed))
}
