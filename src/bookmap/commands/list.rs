use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::{BookmarkQuery, BookmarkStore, PhotoStore, TabularBackend};

pub fn run<B: TabularBackend, P: PhotoStore>(
    store: &BookmarkStore<B, P>,
    query: &BookmarkQuery,
) -> Result<CmdResult> {
    let listed = store.filter(query).cloned().collect();
    Ok(CmdResult::default().with_listed_bookmarks(listed))
}
