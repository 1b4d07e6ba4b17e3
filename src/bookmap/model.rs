use crate::error::{BookmapError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed vocabulary used for marker coloring and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Cafe,
    Restaurant,
    StudySpot,
    TravelSpot,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Cafe,
        Category::Restaurant,
        Category::StudySpot,
        Category::TravelSpot,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cafe => "cafe",
            Category::Restaurant => "restaurant",
            Category::StudySpot => "study-spot",
            Category::TravelSpot => "travel-spot",
            Category::Other => "other",
        }
    }

    /// Marker color a map renderer should use for this category.
    pub fn marker_color(&self) -> &'static str {
        match self {
            Category::Cafe => "green",
            Category::Restaurant => "red",
            Category::StudySpot => "blue",
            Category::TravelSpot => "orange",
            Category::Other => "gray",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = BookmapError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| {
                BookmapError::Api(format!(
                    "Unknown category '{}' (expected one of: cafe, restaurant, study-spot, travel-spot, other)",
                    s
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Seoul City Hall. Used when nothing better is known.
    pub const DEFAULT_CENTER: Coordinate = Coordinate {
        latitude: 37.5665,
        longitude: 126.9780,
    };

    /// Builds a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(BookmapError::InvalidCoordinate(format!(
                "latitude {} is outside [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(BookmapError::InvalidCoordinate(format!(
                "longitude {} is outside [-180, 180]",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Clamps finite values into range. Returns `None` for NaN or infinities.
    pub fn clamped(latitude: f64, longitude: f64) -> Option<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        Some(Self {
            latitude: latitude.clamp(-90.0, 90.0),
            longitude: longitude.clamp(-180.0, 180.0),
        })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Parses `"lat,lon"`.
impl FromStr for Coordinate {
    type Err = BookmapError;

    fn from_str(s: &str) -> Result<Self> {
        let (lat, lon) = s.split_once(',').ok_or_else(|| {
            BookmapError::InvalidCoordinate(format!("expected 'lat,lon', got '{}'", s))
        })?;
        let parse = |part: &str| {
            part.trim().parse::<f64>().map_err(|_| {
                BookmapError::InvalidCoordinate(format!("'{}' is not a number", part.trim()))
            })
        };
        Coordinate::new(parse(lat)?, parse(lon)?)
    }
}

/// Opaque handle to a stored photo attachment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(String);

impl PhotoRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One saved place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub name: String,
    pub category: Category,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    pub photo_reference: Option<PhotoRef>,
}

impl Bookmark {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Raw photo payload supplied when a bookmark is created.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub original_filename: String,
}

impl PhotoUpload {
    pub fn new(bytes: Vec<u8>, original_filename: impl Into<String>) -> Self {
        Self {
            bytes,
            original_filename: original_filename.into(),
        }
    }
}

/// Candidate passed to `BookmarkStore::add`.
#[derive(Debug, Clone)]
pub struct NewBookmark {
    pub name: String,
    pub category: Category,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    pub photo: Option<PhotoUpload>,
}

impl NewBookmark {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            category: Category::default(),
            latitude,
            longitude,
            description: String::new(),
            photo: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_photo(mut self, photo: PhotoUpload) -> Self {
        self.photo = Some(photo);
        self
    }
}
