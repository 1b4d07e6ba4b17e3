use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::NewBookmark;
use crate::store::{BookmarkStore, PhotoStore, TabularBackend};

pub fn run<B: TabularBackend, P: PhotoStore>(
    store: &mut BookmarkStore<B, P>,
    candidate: NewBookmark,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    match store.add(candidate)? {
        Some(bookmark) => {
            let bookmark = bookmark.clone();
            result.add_message(CmdMessage::success(format!(
                "Bookmark saved: {} ({})",
                bookmark.name, bookmark.category
            )));
            Ok(result.with_affected_bookmarks(vec![bookmark]))
        }
        None => {
            result.add_message(CmdMessage::warning(
                "Bookmark name cannot be blank; nothing was added",
            ));
            Ok(result)
        }
    }
}
