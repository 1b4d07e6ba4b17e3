use crate::commands::{BookmapPaths, CmdMessage, CmdResult};
use crate::config::BookmapConfig;
use crate::error::{BookmapError, Result};
use std::fs;

/// Create the data directory and a default config if they are missing.
pub fn run(paths: &BookmapPaths) -> Result<CmdResult> {
    let dir = &paths.data_dir;
    fs::create_dir_all(dir).map_err(BookmapError::Io)?;

    let mut result = CmdResult::default();
    if BookmapConfig::exists_in(dir) {
        result.add_message(CmdMessage::info(format!(
            "Bookmark store already initialized at {}",
            dir.display()
        )));
        return Ok(result);
    }

    let config = BookmapConfig::default();
    config.save(dir)?;
    fs::create_dir_all(config.photo_dir_path(dir)).map_err(BookmapError::Io)?;
    result.add_message(CmdMessage::success(format!(
        "Initialized bookmark store at {}",
        dir.display()
    )));
    Ok(result.with_config(config))
}
