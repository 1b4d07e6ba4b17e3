use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.1.0" for releases, "0.1.0@abc1234 2026-01-15" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("BOOKMAP_GIT_HASH");
    const COMMIT_DATE: &str = env!("BOOKMAP_COMMIT_DATE");
    const IS_RELEASE: &str = env!("BOOKMAP_IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "bookmap", bin_name = "bookmap", version = get_version())]
#[command(about = "Keep a personal map of bookmarked places", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding bookmarks.csv, photos/ and config.json
    /// (defaults to $BOOKMAP_HOME, then the platform data directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Verbose logging to stderr (repeat for more)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bookmark a place
    #[command(alias = "a")]
    Add {
        /// Name of the place
        name: String,

        /// Latitude (defaults to the current map center)
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude (defaults to the current map center)
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,

        /// cafe, restaurant, study-spot, travel-spot or other
        #[arg(short, long)]
        category: Option<String>,

        /// Free-text description
        #[arg(short, long)]
        description: Option<String>,

        /// Image file to attach
        #[arg(long, value_name = "FILE")]
        photo: Option<PathBuf>,
    },

    /// Delete every bookmark with this exact name
    #[command(alias = "rm")]
    Delete { name: String },

    /// List bookmarks, optionally filtered
    #[command(alias = "ls")]
    List {
        /// Case-insensitive text to look for in name or description
        term: Option<String>,

        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Print the map center
    Center {
        /// Last clicked map point as "lat,lon"
        #[arg(long, allow_hyphen_values = true)]
        click: Option<String>,
    },

    /// Print the marker feed for a map renderer as JSON
    Markers {
        /// Last clicked map point as "lat,lon"
        #[arg(long, allow_hyphen_values = true)]
        click: Option<String>,
    },

    /// Print the path of the photo attached to a bookmark
    Photo { name: String },

    /// Get or set configuration
    Config {
        /// Configuration key (data-file, photo-dir, fallback-center)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Create the data directory and default config
    Init,
}
