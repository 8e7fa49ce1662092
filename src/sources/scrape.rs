//! Scraped image sources.
//!
//! Every scraped source runs the same procedure: query an image search engine,
//! scan the returned markup for direct image links, and emit unstructured
//! poster items. Sources differ only by data (tag, engine, site restriction),
//! so they live in a registry built from configuration. The IMDb source runs
//! the same link scan over a title's media page, keyed by IMDb id.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use posterdeck_common::ImageItem;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

use crate::config::ScrapingConfig;

use super::http::{Fetcher, Params};
use super::{ImageQuery, ImageSource};

static IMAGE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)https://[^"'\s<>]+?\.(?:jpg|jpeg|png)"#).expect("image URL pattern is valid")
});

/// Resizing/cropping modifiers of an IMDb image URL (`._V1_QL75_UX190_.jpg`).
static IMDB_SIZE_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\._V1_[^/]*?\.(jpg|jpeg|png)$").expect("IMDb size pattern is valid")
});

/// Path fragment of title artwork on IMDb's image CDN.
const IMDB_TITLE_ART: &str = "/images/M/";

/// Extract direct image links from markup, in document order.
///
/// Links containing any of `blocked` (thumbnail CDNs, placeholders) are dropped.
pub fn extract_image_urls(markup: &str, blocked: &[String]) -> Vec<String> {
    IMAGE_URL
        .find_iter(markup)
        .map(|m| m.as_str())
        .filter(|url| !blocked.iter().any(|host| url.contains(host.as_str())))
        .map(str::to_string)
        .collect()
}

/// An image search engine reachable by a GET with a text query.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    pub name: String,
    pub endpoint: String,
    /// Extra query parameters sent with every search.
    pub extra_params: Vec<(String, String)>,
    /// Host fragments whose links are never emitted.
    pub blocked_hosts: Vec<String>,
}

impl SearchEngine {
    /// Google image search (`tbm=isch`); drops `gstatic` thumbnails.
    pub fn google(endpoint: impl Into<String>) -> Self {
        Self {
            name: "google".to_string(),
            endpoint: endpoint.into(),
            extra_params: vec![("tbm".to_string(), "isch".to_string())],
            blocked_hosts: vec!["gstatic".to_string()],
        }
    }

    /// Bing image search; drops `mm.bing.net` thumbnails.
    pub fn bing(endpoint: impl Into<String>) -> Self {
        Self {
            name: "bing".to_string(),
            endpoint: endpoint.into(),
            extra_params: Vec::new(),
            blocked_hosts: vec!["mm.bing.net".to_string()],
        }
    }
}

/// One registry entry: an engine, optionally restricted to a site.
pub struct ScrapeSource {
    tag: String,
    site: Option<String>,
    engine: Arc<SearchEngine>,
    fetcher: Fetcher,
}

impl ScrapeSource {
    pub fn new(
        tag: impl Into<String>,
        site: Option<String>,
        engine: Arc<SearchEngine>,
        fetcher: Fetcher,
    ) -> Self {
        Self {
            tag: tag.into(),
            site,
            engine,
            fetcher,
        }
    }

    /// Search text sent to the engine for `title`.
    pub fn search_text(&self, title: &str) -> String {
        match &self.site {
            Some(site) => format!("{title} site:{site}"),
            None => title.to_string(),
        }
    }
}

#[async_trait]
impl ImageSource for ScrapeSource {
    fn tag(&self) -> &str {
        &self.tag
    }

    async fn fetch_images(&self, query: ImageQuery<'_>) -> Vec<ImageItem> {
        let mut params: Params = vec![("q".to_string(), self.search_text(query.title))];
        params.extend(self.engine.extra_params.iter().cloned());

        let Some(markup) = self.fetcher.get_markup(&self.engine.endpoint, &params).await else {
            return Vec::new();
        };

        let items: Vec<ImageItem> = extract_image_urls(&markup, &self.engine.blocked_hosts)
            .into_iter()
            .map(|url| ImageItem::scraped(url, self.tag.as_str()))
            .collect();

        debug!(source = %self.tag, engine = %self.engine.name, count = items.len(), "Scraped images");
        items
    }
}

/// Full-size variant of an IMDb image URL; other URLs pass through.
pub fn imdb_full_size(url: &str) -> String {
    IMDB_SIZE_SUFFIX.replace(url, "._V1_.$1").into_owned()
}

/// Posters from an IMDb title's media page.
///
/// Emits nothing unless the query carries an IMDb id.
pub struct ImdbSource {
    base_url: String,
    fetcher: Fetcher,
}

impl ImdbSource {
    pub fn new(base_url: impl Into<String>, fetcher: Fetcher) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            fetcher,
        }
    }

    fn media_page(&self, imdb_id: &str) -> String {
        format!("{}/title/{imdb_id}/mediaindex/", self.base_url)
    }
}

#[async_trait]
impl ImageSource for ImdbSource {
    fn tag(&self) -> &str {
        "imdb"
    }

    async fn fetch_images(&self, query: ImageQuery<'_>) -> Vec<ImageItem> {
        let Some(imdb_id) = query.imdb_id.filter(|id| id.starts_with("tt")) else {
            return Vec::new();
        };

        let Some(markup) = self.fetcher.get_markup(&self.media_page(imdb_id), &Vec::new()).await
        else {
            return Vec::new();
        };

        let items: Vec<ImageItem> = extract_image_urls(&markup, &[])
            .into_iter()
            .filter(|url| url.contains(IMDB_TITLE_ART))
            .map(|url| ImageItem::scraped(imdb_full_size(&url), "imdb"))
            .collect();

        debug!(source = "imdb", imdb_id = %imdb_id, count = items.len(), "Scraped images");
        items
    }
}

/// Build the scraped-source registry in configured order.
///
/// The IMDb title page source, when enabled, comes first. Site-restricted
/// sources go through Google; the unrestricted Bing source, when enabled,
/// comes last.
pub fn build_registry(scraping: &ScrapingConfig, fetcher: &Fetcher) -> Vec<Arc<dyn ImageSource>> {
    if !scraping.enabled {
        return Vec::new();
    }

    let mut registry: Vec<Arc<dyn ImageSource>> = Vec::new();
    if scraping.imdb_enabled {
        registry.push(Arc::new(ImdbSource::new(
            scraping.imdb_url.clone(),
            fetcher.clone(),
        )));
    }

    let google = Arc::new(SearchEngine::google(scraping.google_url.clone()));
    registry.extend(scraping.sources.iter().map(|source| {
        Arc::new(ScrapeSource::new(
            source.tag.clone(),
            Some(source.site.clone()),
            Arc::clone(&google),
            fetcher.clone(),
        )) as Arc<dyn ImageSource>
    }));

    if scraping.bing_enabled {
        let bing = Arc::new(SearchEngine::bing(scraping.bing_url.clone()));
        registry.push(Arc::new(ScrapeSource::new("bing", None, bing, fetcher.clone())));
    }

    registry
}
