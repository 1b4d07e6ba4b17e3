//! Column layout of the bookmark table and the row <-> record mapping.
//!
//! # Versions
//!
//! - v1 (original dashboard): `이름,위도,경도,설명`, i.e. name, latitude,
//!   longitude, description with Korean headers. No category, no photo.
//! - v2 (current): `name,category,latitude,longitude,description,photo_reference`.
//!
//! Reads accept both header spellings. Columns missing from older files are
//! back-filled with defaults (category `other`, no photo); the row is kept.
//! Writes always produce the current layout.

use super::backend::Row;
use crate::model::{Bookmark, Category, Coordinate, PhotoRef};
use thiserror::Error;

pub const HEADER: [&str; 6] = [
    "name",
    "category",
    "latitude",
    "longitude",
    "description",
    "photo_reference",
];

const NAME: &[&str] = &["name", "이름"];
const CATEGORY: &[&str] = &["category"];
const LATITUDE: &[&str] = &["latitude", "위도"];
const LONGITUDE: &[&str] = &["longitude", "경도"];
const DESCRIPTION: &[&str] = &["description", "설명"];
const PHOTO_REFERENCE: &[&str] = &["photo_reference"];

/// Why a persisted row could not become a bookmark.
#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("blank name")]
    BlankName,

    #[error("invalid {column} '{value}'")]
    InvalidNumber { column: &'static str, value: String },
}

/// A decoded row plus whether any field had to be defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRow {
    pub bookmark: Bookmark,
    pub backfilled: bool,
}

fn field<'a>(row: &'a Row, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .find_map(|alias| row.get(*alias))
        .map(String::as_str)
}

fn number(row: &Row, aliases: &[&'static str]) -> Result<f64, RowError> {
    let column = aliases[0];
    let raw = field(row, aliases).ok_or(RowError::MissingColumn(column))?;
    let value = raw.trim().parse::<f64>().map_err(|_| RowError::InvalidNumber {
        column,
        value: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(RowError::InvalidNumber {
            column,
            value: raw.to_string(),
        });
    }
    Ok(value)
}

/// Map one persisted row onto a bookmark.
///
/// Out-of-range coordinates are clamped rather than rejected; older files
/// were written without any range check.
pub fn decode_row(row: &Row) -> Result<DecodedRow, RowError> {
    let name = field(row, NAME)
        .ok_or(RowError::MissingColumn("name"))?
        .trim();
    if name.is_empty() {
        return Err(RowError::BlankName);
    }

    let latitude = number(row, LATITUDE)?;
    let longitude = number(row, LONGITUDE)?;
    let coordinate =
        Coordinate::clamped(latitude, longitude).ok_or_else(|| RowError::InvalidNumber {
            column: "latitude",
            value: latitude.to_string(),
        })?;

    let mut backfilled = false;

    let category = match field(row, CATEGORY) {
        // Unknown or empty text degrades to the default category.
        Some(raw) => raw.parse().unwrap_or_default(),
        None => {
            backfilled = true;
            Category::default()
        }
    };

    let photo_reference = match field(row, PHOTO_REFERENCE) {
        Some(raw) if !raw.trim().is_empty() => Some(PhotoRef::new(raw.trim())),
        Some(_) => None,
        None => {
            backfilled = true;
            None
        }
    };

    let description = field(row, DESCRIPTION).unwrap_or_default().to_string();

    Ok(DecodedRow {
        bookmark: Bookmark {
            name: name.to_string(),
            category,
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            description,
            photo_reference,
        },
        backfilled,
    })
}

/// Field values in `HEADER` order.
pub fn encode(bookmark: &Bookmark) -> [String; 6] {
    [
        bookmark.name.clone(),
        bookmark.category.as_str().to_string(),
        bookmark.latitude.to_string(),
        bookmark.longitude.to_string(),
        bookmark.description.clone(),
        bookmark
            .photo_reference
            .as_ref()
            .map(|r| r.as_str().to_string())
            .unwrap_or_default(),
    ]
}

/// `encode` as a `Row`, for backends that keep rows rather than text.
pub fn encode_row(bookmark: &Bookmark) -> Row {
    HEADER
        .iter()
        .map(|h| h.to_string())
        .zip(encode(bookmark))
        .collect()
}
