use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Verbose logging for posterdeck crates
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub scraping: ScrapingConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportConfig {
    /// Credential presented by the front end (bearer token for the HTTP API).
    /// Mandatory: startup fails without it.
    #[serde(default)]
    pub token: Option<String>,

    /// Number of images per page in paginated presentations
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    6
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            token: None,
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    /// TMDB v3 API key. Absent disables the primary catalog.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// OMDb API key. Absent disables the fallback lookup.
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    /// Language tag sent to TMDB (e.g. "en-US")
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_tmdb_base_url")]
    pub tmdb_base_url: String,

    #[serde(default = "default_tmdb_image_base")]
    pub tmdb_image_base: String,

    #[serde(default = "default_omdb_base_url")]
    pub omdb_base_url: String,
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base() -> String {
    "https://image.tmdb.org/t/p/original".to_string()
}

fn default_omdb_base_url() -> String {
    "http://www.omdbapi.com/".to_string()
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            omdb_api_key: None,
            language: default_language(),
            tmdb_base_url: default_tmdb_base_url(),
            tmdb_image_base: default_tmdb_image_base(),
            omdb_base_url: default_omdb_base_url(),
        }
    }
}

impl ProvidersConfig {
    /// TMDB key, treating an empty string as unset.
    pub fn tmdb_key(&self) -> Option<&str> {
        non_empty(&self.tmdb_api_key)
    }

    /// OMDb key, treating an empty string as unset.
    pub fn omdb_key(&self) -> Option<&str> {
        non_empty(&self.omdb_api_key)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrapingConfig {
    /// Master switch for all scraped image sources
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Image search endpoint used for site-restricted sources
    #[serde(default = "default_google_url")]
    pub google_url: String,

    /// Unrestricted image search endpoint
    #[serde(default = "default_bing_url")]
    pub bing_url: String,

    /// Include the unrestricted Bing image source
    #[serde(default = "default_true")]
    pub bing_enabled: bool,

    /// Include posters from the IMDb title page when an IMDb id is known
    #[serde(default = "default_true")]
    pub imdb_enabled: bool,

    #[serde(default = "default_imdb_url")]
    pub imdb_url: String,

    /// Site-restricted sources, queried in this order
    #[serde(default = "default_sources")]
    pub sources: Vec<ScrapeSourceConfig>,
}

fn default_true() -> bool {
    true
}

fn default_google_url() -> String {
    "https://www.google.com/search".to_string()
}

fn default_bing_url() -> String {
    "https://www.bing.com/images/search".to_string()
}

fn default_imdb_url() -> String {
    "https://www.imdb.com".to_string()
}

fn default_sources() -> Vec<ScrapeSourceConfig> {
    [
        ("fanart", "fanart.tv"),
        ("theposterdb", "theposterdb.com"),
        ("tvdb", "thetvdb.com"),
        ("anidb", "anidb.net"),
        ("mal", "myanimelist.net"),
        ("alphacoders", "alphacoders.com"),
        ("wallhaven", "wallhaven.cc"),
        ("cinematerial", "cinematerial.com"),
        ("movieposterdb", "movieposterdb.com"),
        ("wikimedia", "upload.wikimedia.org"),
    ]
    .into_iter()
    .map(|(tag, site)| ScrapeSourceConfig {
        tag: tag.to_string(),
        site: site.to_string(),
    })
    .collect()
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            google_url: default_google_url(),
            bing_url: default_bing_url(),
            bing_enabled: true,
            imdb_enabled: true,
            imdb_url: default_imdb_url(),
            sources: default_sources(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScrapeSourceConfig {
    /// Tag attached to every image from this source
    pub tag: String,

    /// Site restriction appended to the search text (`site:<site>`)
    pub site: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// External cache address for distributed deployments. Not used by the
    /// in-process cache.
    #[serde(default)]
    pub redis_url: Option<String>,
}

fn default_ttl() -> u64 {
    900
}

fn default_capacity() -> usize {
    512
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            capacity: default_capacity(),
            redis_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Per-request timeout for every upstream call
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent sent to scraped search engines
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64)".to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.8".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

/// Weights of the image ranking score. Empirical; tune freely.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ScoringConfig {
    /// Multiplier for pixel area (width x height)
    #[serde(default = "default_resolution_weight")]
    pub resolution_weight: f64,

    /// Multiplier for provider popularity
    #[serde(default = "default_popularity_weight")]
    pub popularity_weight: f64,

    /// Flat bonus for images from a provider's official images endpoint
    #[serde(default = "default_structured_bonus")]
    pub structured_bonus: f64,
}

fn default_resolution_weight() -> f64 {
    3.0
}

fn default_popularity_weight() -> f64 {
    5.0
}

fn default_structured_bonus() -> f64 {
    50.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            resolution_weight: default_resolution_weight(),
            popularity_weight: default_popularity_weight(),
            structured_bonus: default_structured_bonus(),
        }
    }
}
