//! In-memory source doubles shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use posterdeck_common::{ImageItem, ImageKind, MediaKind, ProviderRef, TrendingWindow};

use crate::sources::{
    Candidate, CandidateKind, CatalogDetails, CatalogSource, FallbackSource, FallbackTitle,
    ImageQuery, ImageSource,
};

pub fn candidate(kind: CandidateKind, id: u64, title: &str) -> Candidate {
    Candidate {
        kind,
        id,
        title: title.to_string(),
        release_date: None,
        rating: None,
        overview: None,
    }
}

pub fn structured(url: &str, width: u32, height: u32, votes: f64) -> ImageItem {
    ImageItem {
        url: url.to_string(),
        kind: ImageKind::Poster,
        width: Some(width),
        height: Some(height),
        popularity: Some(votes),
        structured: true,
        source: "tmdb".to_string(),
    }
}

#[derive(Default)]
pub struct StubCatalog {
    pub available: bool,
    pub multi: Vec<Candidate>,
    pub collections: Vec<Candidate>,
    pub details: Option<CatalogDetails>,
    pub images: Vec<ImageItem>,
    pub trending: Vec<Candidate>,
    pub multi_calls: AtomicUsize,
    pub collection_calls: AtomicUsize,
    pub details_calls: AtomicUsize,
    pub images_calls: AtomicUsize,
    pub trending_calls: AtomicUsize,
}

impl StubCatalog {
    pub fn available() -> Self {
        Self {
            available: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.multi_calls.load(Ordering::SeqCst)
            + self.collection_calls.load(Ordering::SeqCst)
            + self.details_calls.load(Ordering::SeqCst)
            + self.images_calls.load(Ordering::SeqCst)
            + self.trending_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for StubCatalog {
    fn name(&self) -> &'static str {
        "stub-catalog"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn search_multi(&self, _query: &str, _year: Option<u16>) -> Vec<Candidate> {
        self.multi_calls.fetch_add(1, Ordering::SeqCst);
        self.multi.clone()
    }

    async fn search_collection(&self, _query: &str) -> Vec<Candidate> {
        self.collection_calls.fetch_add(1, Ordering::SeqCst);
        self.collections.clone()
    }

    async fn details(&self, _target: ProviderRef) -> Option<CatalogDetails> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        self.details.clone()
    }

    async fn images(&self, _target: ProviderRef) -> Vec<ImageItem> {
        self.images_calls.fetch_add(1, Ordering::SeqCst);
        self.images.clone()
    }

    async fn trending(&self, _kind: MediaKind, _window: TrendingWindow) -> Vec<Candidate> {
        self.trending_calls.fetch_add(1, Ordering::SeqCst);
        self.trending.clone()
    }
}

#[derive(Default)]
pub struct StubFallback {
    pub result: Option<FallbackTitle>,
    pub calls: AtomicUsize,
}

impl StubFallback {
    pub fn returning(result: FallbackTitle) -> Self {
        Self {
            result: Some(result),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FallbackSource for StubFallback {
    fn name(&self) -> &'static str {
        "stub-fallback"
    }

    fn is_available(&self) -> bool {
        self.result.is_some()
    }

    async fn find_by_title(&self, _title: &str, _year: Option<u16>) -> Option<FallbackTitle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

pub struct StubImages {
    pub tag: String,
    pub urls: Vec<String>,
    /// Time spent before answering.
    pub delay: Duration,
    pub titles: Mutex<Vec<String>>,
    pub imdb_ids: Mutex<Vec<Option<String>>>,
}

impl StubImages {
    pub fn new(tag: &str, urls: &[&str]) -> Self {
        Self {
            tag: tag.to_string(),
            urls: urls.iter().map(|u| u.to_string()).collect(),
            delay: Duration::ZERO,
            titles: Mutex::new(Vec::new()),
            imdb_ids: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.titles.lock().len()
    }
}

#[async_trait]
impl ImageSource for StubImages {
    fn tag(&self) -> &str {
        &self.tag
    }

    async fn fetch_images(&self, query: ImageQuery<'_>) -> Vec<ImageItem> {
        self.titles.lock().push(query.title.to_string());
        self.imdb_ids.lock().push(query.imdb_id.map(str::to_string));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.urls
            .iter()
            .map(|url| ImageItem::scraped(url.as_str(), self.tag.as_str()))
            .collect()
    }
}
