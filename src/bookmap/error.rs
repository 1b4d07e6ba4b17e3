use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookmapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing table could not be written. The in-memory collection has
    /// already been rolled back when this is returned from a mutation.
    #[error("Could not save bookmarks: {0}")]
    Persistence(String),

    #[error("Could not store photo for '{name}': {reason}")]
    PhotoWrite { name: String, reason: String },

    #[error("Photo not found: {0}")]
    PhotoNotFound(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, BookmapError>;
