//! Core type definitions for resolved titles, images and aggregate results.
//!
//! Every upstream adapter translates its own response shape into these types
//! before anything else in posterdeck sees the data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of title a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// A feature film (also used for collections and fallback matches).
    Movie,
    /// A TV series, including anime and drama series.
    Series,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => write!(f, "movie"),
            Self::Series => write!(f, "series"),
        }
    }
}

/// Endpoint family of a provider identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderScope {
    /// Movie endpoints (`/movie/{id}`).
    Movie,
    /// TV endpoints (`/tv/{id}`).
    Tv,
    /// Collection endpoints (`/collection/{id}`).
    Collection,
}

impl ProviderScope {
    /// Path segment used by the provider's REST API.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
            Self::Collection => "collection",
        }
    }
}

impl fmt::Display for ProviderScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Typed reference to a title inside the primary provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderRef {
    pub scope: ProviderScope,
    pub id: u64,
}

impl ProviderRef {
    pub fn new(scope: ProviderScope, id: u64) -> Self {
        Self { scope, id }
    }
}

impl fmt::Display for ProviderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.scope, self.id)
    }
}

/// Role of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Poster,
    Backdrop,
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Poster => write!(f, "poster"),
            Self::Backdrop => write!(f, "backdrop"),
        }
    }
}

/// A single candidate image produced by a source adapter.
///
/// `structured` items come from a provider's dedicated images endpoint and
/// carry trusted dimensions; scraped items usually have no size information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageItem {
    /// Fully-qualified image URL. Also the deduplication identity.
    pub url: String,
    pub kind: ImageKind,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Provider popularity signal (vote count for structured images).
    pub popularity: Option<f64>,
    pub structured: bool,
    /// Short tag of the source that produced this image (e.g. `"tmdb"`).
    pub source: String,
}

impl ImageItem {
    /// Build an image scraped from a search page: unknown size, popularity 1.
    pub fn scraped(url: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: ImageKind::Poster,
            width: None,
            height: None,
            popularity: Some(1.0),
            structured: false,
            source: source.into(),
        }
    }

    /// Pixel area, treating a missing dimension as zero.
    pub fn area(&self) -> u64 {
        u64::from(self.width.unwrap_or(0)) * u64::from(self.height.unwrap_or(0))
    }
}

/// The canonical metadata record chosen for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRecord {
    pub media_kind: MediaKind,
    /// Primary-provider identifier; `None` for fallback-only matches.
    pub provider: Option<ProviderRef>,
    pub title: String,
    pub release_year: Option<u16>,
    /// Audience rating on a 0-10 scale.
    pub rating: Option<f64>,
    pub genres: Vec<String>,
    pub overview: String,
    /// IMDb identifier (`tt...`), if known.
    pub imdb_id: Option<String>,
}

/// Human-facing content type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "TV Show")]
    TvShow,
    #[serde(rename = "K-Drama")]
    KDrama,
    Donghua,
    Manga,
    Anime,
    Collection,
    Movie,
    /// Generic label used when no keyword matched and no kind is known.
    #[serde(rename = "Movie/TV")]
    MovieOrTv,
}

impl ContentType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TvShow => "TV Show",
            Self::KDrama => "K-Drama",
            Self::Donghua => "Donghua",
            Self::Manga => "Manga",
            Self::Anime => "Anime",
            Self::Collection => "Collection",
            Self::Movie => "Movie",
            Self::MovieOrTv => "Movie/TV",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The unit returned to consumers: caption fields plus ranked images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub title: String,
    pub year: Option<u16>,
    pub rating: Option<f64>,
    pub genres: Vec<String>,
    pub overview: String,
    pub content_type: ContentType,
    /// Images ordered by descending score, best first.
    pub images: Vec<ImageItem>,
}

impl AggregateResult {
    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }
}

/// Time window for trending lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrendingWindow {
    #[default]
    Day,
    Week,
}

impl TrendingWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

impl std::str::FromStr for TrendingWindow {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "week" | "weekly" => Ok(Self::Week),
            _ => Err(format!("Unknown trending window: {}", s)),
        }
    }
}

/// A single entry in a trending list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingTitle {
    pub title: String,
    pub rating: Option<f64>,
    pub media_kind: MediaKind,
}
