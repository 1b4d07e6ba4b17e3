use bookmap::api::{BookmapApi, BookmapPaths, CmdMessage, ConfigAction, MessageLevel};
use bookmap::config::{BookmapConfig, KEYS};
use bookmap::error::{BookmapError, Result};
use bookmap::model::{Bookmark, Category, Coordinate, NewBookmark, PhotoUpload};
use bookmap::store::csv_backend::CsvBackend;
use bookmap::store::photo::FsPhotoStore;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use log::LevelFilter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: BookmapApi<CsvBackend, FsPhotoStore>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let mut ctx = init_context(&cli)?;
    report_load(&ctx.api.load_messages());

    match cli.command {
        Some(Commands::Add {
            name,
            lat,
            lon,
            category,
            description,
            photo,
        }) => handle_add(&mut ctx, name, lat, lon, category, description, photo),
        Some(Commands::Delete { name }) => handle_delete(&mut ctx, &name),
        Some(Commands::List { term, category }) => handle_list(&ctx, term, category),
        Some(Commands::Center { click }) => handle_center(&ctx, click),
        Some(Commands::Markers { click }) => handle_markers(&ctx, click),
        Some(Commands::Photo { name }) => handle_photo(&ctx, &name),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        Some(Commands::Init) => handle_init(&ctx),
        None => handle_list(&ctx, None, None),
    }
}

/// Default level is warn; each -v raises it. RUST_LOG still wins per module.
fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp(None);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    // A logger may already be installed when embedded; keep it.
    let _ = builder.try_init();
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = std::env::var_os("BOOKMAP_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "bookmap", "bookmap")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| BookmapError::Config("Could not determine a data directory".to_string()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli)?;
    log::debug!("Using data directory {}", data_dir.display());
    let api = BookmapApi::open(BookmapPaths::new(data_dir))?;
    Ok(AppContext { api })
}

fn read_photo(path: &Path) -> Result<PhotoUpload> {
    let bytes = std::fs::read(path).map_err(BookmapError::Io)?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("photo")
        .to_string();
    Ok(PhotoUpload::new(bytes, filename))
}

fn handle_add(
    ctx: &mut AppContext,
    name: String,
    lat: Option<f64>,
    lon: Option<f64>,
    category: Option<String>,
    description: Option<String>,
    photo: Option<PathBuf>,
) -> Result<()> {
    // Missing coordinates fall back to where the map would open
    let center = ctx.api.default_coordinate();
    let category = match category {
        Some(c) => c.parse::<Category>()?,
        None => Category::default(),
    };

    let mut candidate = NewBookmark::new(
        name,
        lat.unwrap_or(center.latitude),
        lon.unwrap_or(center.longitude),
    )
    .with_category(category)
    .with_description(description.unwrap_or_default());

    if let Some(path) = photo {
        candidate = candidate.with_photo(read_photo(&path)?);
    }

    let result = ctx.api.add_bookmark(candidate)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, name: &str) -> Result<()> {
    let result = ctx.api.delete_bookmarks(name)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext, term: Option<String>, category: Option<String>) -> Result<()> {
    let result = ctx
        .api
        .list_bookmarks(term.as_deref(), category.as_deref())?;
    print_bookmarks(&result.listed_bookmarks);
    print_messages(&result.messages);
    Ok(())
}

fn handle_center(ctx: &AppContext, click: Option<String>) -> Result<()> {
    let result = ctx.api.center(click.as_deref())?;
    if let Some((center, source)) = result.center {
        println!(
            "{}  {}",
            format_coordinate(center),
            format!("({})", source).dimmed()
        );
    }
    print_messages(&result.messages);
    Ok(())
}

#[derive(Serialize)]
struct MarkerFeed<'a> {
    center: Coordinate,
    markers: &'a [bookmap::api::Marker],
}

fn handle_markers(ctx: &AppContext, click: Option<String>) -> Result<()> {
    let result = ctx.api.markers(click.as_deref())?;
    let center = result
        .center
        .map(|(c, _)| c)
        .unwrap_or(Coordinate::DEFAULT_CENTER);
    let feed = MarkerFeed {
        center,
        markers: &result.markers,
    };
    println!("{}", serde_json::to_string_pretty(&feed)?);
    Ok(())
}

fn handle_photo(ctx: &AppContext, name: &str) -> Result<()> {
    let result = ctx.api.photo_paths(name)?;
    for path in &result.photo_paths {
        println!("{}", path.display());
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if let Some(config) = &result.config
        && result.messages.is_empty()
    {
        print_config(config);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_init(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.init()?;
    print_messages(&result.messages);
    Ok(())
}

fn print_config(config: &BookmapConfig) {
    for key in KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// Load diagnostics go to stderr so stdout stays parseable (`markers`).
fn report_load(messages: &[CmdMessage]) {
    for message in messages {
        eprintln!("{}", message.content.yellow());
    }
}

const LINE_WIDTH: usize = 100;
const CATEGORY_WIDTH: usize = 12;
const COORD_WIDTH: usize = 24;
const PHOTO_MARKER: &str = "▣";

fn category_colored(category: Category) -> ColoredString {
    let label = format!("{:<width$}", category.as_str(), width = CATEGORY_WIDTH);
    match category {
        Category::Cafe => label.green(),
        Category::Restaurant => label.red(),
        Category::StudySpot => label.blue(),
        Category::TravelSpot => label.truecolor(255, 165, 0),
        Category::Other => label.bright_black(),
    }
}

fn format_coordinate(c: Coordinate) -> String {
    format!("{:.6}, {:.6}", c.latitude, c.longitude)
}

fn print_bookmarks(bookmarks: &[Bookmark]) {
    if bookmarks.is_empty() {
        println!("No bookmarks found.");
        return;
    }

    for (i, b) in bookmarks.iter().enumerate() {
        let idx_str = format!("{:>3}. ", i + 1);
        let photo = if b.photo_reference.is_some() {
            format!("{} ", PHOTO_MARKER)
        } else {
            "  ".to_string()
        };

        let text = if b.description.is_empty() {
            b.name.clone()
        } else {
            format!("{}  {}", b.name, b.description.replace('\n', " "))
        };

        let fixed = idx_str.width() + photo.width() + CATEGORY_WIDTH + 1 + COORD_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let text_display = truncate_to_width(&text, available);
        let padding = available.saturating_sub(text_display.width());

        println!(
            "{}{}{} {}{}{}",
            idx_str.yellow(),
            photo,
            category_colored(b.category),
            text_display,
            " ".repeat(padding),
            format!("{:>width$}", format_coordinate(b.coordinate()), width = COORD_WIDTH).dimmed()
        );
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}
