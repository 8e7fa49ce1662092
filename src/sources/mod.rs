//! Upstream source adapters.
//!
//! Each adapter wraps exactly one upstream and normalizes its responses into
//! posterdeck's typed shapes. Adapters never return errors: network failures,
//! timeouts, bad statuses and malformed bodies all collapse to an empty result,
//! and an adapter without credentials returns empty without touching the
//! network.
//!
//! # Module layout
//!
//! - [`http`] -- Shared cache-aware HTTP fetcher.
//! - [`tmdb`] -- Primary structured catalog (search, details, images, trending).
//! - [`omdb`] -- Fallback exact-title lookup.
//! - [`scrape`] -- Registry of scraped image sources over one generic procedure,
//!   plus the IMDb title page source.

pub mod error;
pub mod http;
pub mod omdb;
pub mod scrape;
pub mod tmdb;

use async_trait::async_trait;
use posterdeck_common::{ImageItem, MediaKind, ProviderRef, TrendingWindow};

pub use error::FetchError;
pub use http::Fetcher;
pub use omdb::OmdbSource;
pub use scrape::{build_registry, ImdbSource, ScrapeSource, SearchEngine};
pub use tmdb::TmdbSource;

// ---------------------------------------------------------------------------
// Normalized adapter output
// ---------------------------------------------------------------------------

/// Kind of a catalog search hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Movie,
    Series,
    Collection,
    /// Anything else the catalog returns (people, for instance).
    Other,
}

/// A single search hit from the primary catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub kind: CandidateKind,
    pub id: u64,
    pub title: String,
    /// Release or first-air date as returned (usually `YYYY-MM-DD`).
    pub release_date: Option<String>,
    pub rating: Option<f64>,
    pub overview: Option<String>,
}

/// Detail record for a catalog title.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogDetails {
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub rating: Option<f64>,
    pub genres: Vec<String>,
    pub overview: Option<String>,
    pub imdb_id: Option<String>,
}

/// Positive match from the fallback lookup, fields as the upstream reports them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackTitle {
    pub title: String,
    /// Year text, possibly a range such as `"2019–2022"`.
    pub year: Option<String>,
    pub plot: Option<String>,
    /// Rating text; `"N/A"` when unavailable.
    pub rating: Option<String>,
    /// Comma-joined genre list.
    pub genre: Option<String>,
    pub imdb_id: Option<String>,
}

/// Year from the first four characters of a date or year string
/// (`"2023-04-15"`, `"2019–2022"`).
pub fn parse_year(date: &str) -> Option<u16> {
    date.get(..4)
        .filter(|y| y.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|y| y.parse::<u16>().ok())
}

// ---------------------------------------------------------------------------
// Adapter traits
// ---------------------------------------------------------------------------

/// The primary structured catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short, lowercase identifier (e.g. `"tmdb"`).
    fn name(&self) -> &'static str;

    /// `true` when credentials are configured.
    fn is_available(&self) -> bool;

    /// Multi-type search, in the catalog's relevance order.
    async fn search_multi(&self, query: &str, year: Option<u16>) -> Vec<Candidate>;

    /// Collection (franchise) search.
    async fn search_collection(&self, query: &str) -> Vec<Candidate>;

    async fn details(&self, target: ProviderRef) -> Option<CatalogDetails>;

    /// Official posters and backdrops, all marked `structured`.
    async fn images(&self, target: ProviderRef) -> Vec<ImageItem>;

    async fn trending(&self, kind: MediaKind, window: TrendingWindow) -> Vec<Candidate>;
}

/// The secondary exact-title lookup.
#[async_trait]
pub trait FallbackSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool;

    async fn find_by_title(&self, title: &str, year: Option<u16>) -> Option<FallbackTitle>;
}

/// What an unstructured image source searches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageQuery<'a> {
    /// Final display title of the aggregate.
    pub title: &'a str,
    /// IMDb title id (`tt...`), when any source reported one.
    pub imdb_id: Option<&'a str>,
}

impl<'a> ImageQuery<'a> {
    pub fn new(title: &'a str, imdb_id: Option<&'a str>) -> Self {
        Self { title, imdb_id }
    }
}

/// An unstructured image source.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Tag attached to every image this source emits.
    fn tag(&self) -> &str;

    async fn fetch_images(&self, query: ImageQuery<'_>) -> Vec<ImageItem>;
}
