//! Aggregate façade: resolve, enrich, merge images, classify.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use posterdeck_common::{
    AggregateResult, MediaKind, ResolvedRecord, TrendingTitle, TrendingWindow,
};
use rand::seq::SliceRandom;
use tracing::info;

use crate::cache::{SharedCache, TtlCache};
use crate::config::{Config, ScoringConfig};
use crate::images::ImageMerger;
use crate::sources::{
    build_registry, parse_year, CandidateKind, CatalogDetails, CatalogSource, FallbackSource,
    Fetcher, ImageQuery, ImageSource, OmdbSource, TmdbSource,
};

use super::classify::classify;
use super::resolver::Resolver;

/// Entry point of the core. Owns the shared cache and every source built on it.
pub struct Aggregator {
    cache: SharedCache,
    catalog: Arc<dyn CatalogSource>,
    resolver: Resolver,
    merger: ImageMerger,
}

impl Aggregator {
    /// Wire the production sources from configuration around one cache.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache: SharedCache = Arc::new(TtlCache::new(
            config.cache.capacity,
            Duration::from_secs(config.cache.ttl_secs),
        ));
        let fetcher =
            Fetcher::new(Arc::clone(&cache), &config.http).context("Failed to build HTTP client")?;

        let catalog: Arc<dyn CatalogSource> =
            Arc::new(TmdbSource::new(fetcher.clone(), &config.providers));
        let fallback: Arc<dyn FallbackSource> =
            Arc::new(OmdbSource::new(fetcher.clone(), &config.providers));
        let scrapers = build_registry(&config.scraping, &fetcher);

        info!(
            catalog = catalog.is_available(),
            fallback = fallback.is_available(),
            scrapers = scrapers.len(),
            "Sources configured"
        );

        Ok(Self::with_sources(
            cache,
            catalog,
            fallback,
            scrapers,
            config.scoring,
        ))
    }

    /// Assemble an aggregator from explicit sources.
    pub fn with_sources(
        cache: SharedCache,
        catalog: Arc<dyn CatalogSource>,
        fallback: Arc<dyn FallbackSource>,
        scrapers: Vec<Arc<dyn ImageSource>>,
        weights: ScoringConfig,
    ) -> Self {
        let resolver = Resolver::standard(Arc::clone(&cache), Arc::clone(&catalog), fallback);
        let merger = ImageMerger::new(Arc::clone(&catalog), scrapers, weights);
        Self {
            cache,
            catalog,
            resolver,
            merger,
        }
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    /// Metadata and ranked images for `query`, or `None` when no source knows
    /// the title.
    ///
    /// The resolution and every successful upstream response are cached, so a
    /// repeated call within the TTL issues no network request. The result
    /// itself is rebuilt each time; an upstream that failed is retried.
    pub async fn aggregate(&self, query: &str, year: Option<u16>) -> Option<Arc<AggregateResult>> {
        let record = self.resolver.resolve(query, year).await?;

        let details = match record.provider {
            Some(target) if self.catalog.is_available() => self.catalog.details(target).await,
            _ => None,
        };
        let imdb_id = details
            .as_ref()
            .and_then(|d| d.imdb_id.clone())
            .or_else(|| record.imdb_id.clone());

        let mut result = overlay(&record, details, query);
        result.images = self
            .merger
            .merge_images(&record, ImageQuery::new(&result.title, imdb_id.as_deref()))
            .await;

        info!(
            query = %query,
            title = %result.title,
            content_type = %result.content_type,
            images = result.images.len(),
            "Aggregated title"
        );

        Some(Arc::new(result))
    }

    /// Up to `limit` trending titles of `kind`, in catalog order.
    pub async fn trending(
        &self,
        kind: MediaKind,
        window: TrendingWindow,
        limit: usize,
    ) -> Vec<TrendingTitle> {
        if !self.catalog.is_available() {
            return Vec::new();
        }

        self.catalog
            .trending(kind, window)
            .await
            .into_iter()
            .filter(|c| !c.title.trim().is_empty())
            .map(|c| TrendingTitle {
                media_kind: match c.kind {
                    CandidateKind::Series => MediaKind::Series,
                    _ => MediaKind::Movie,
                },
                title: c.title,
                rating: c.rating,
            })
            .take(limit)
            .collect()
    }

    /// A random sample of this week's trending movies.
    pub async fn recommend(&self, count: usize) -> Vec<TrendingTitle> {
        let pool = self
            .trending(MediaKind::Movie, TrendingWindow::Week, usize::MAX)
            .await;

        let mut rng = rand::thread_rng();
        pool.choose_multiple(&mut rng, count).cloned().collect()
    }
}

/// Combine the resolved record with catalog details.
///
/// Details win field by field; the record fills gaps and the raw query is the
/// last-resort title.
fn overlay(record: &ResolvedRecord, details: Option<CatalogDetails>, query: &str) -> AggregateResult {
    let details = details.unwrap_or_default();

    let title = details
        .title
        .or_else(|| Some(record.title.clone()).filter(|t| !t.trim().is_empty()))
        .unwrap_or_else(|| query.to_string());

    let year = details
        .release_date
        .as_deref()
        .and_then(parse_year)
        .or(record.release_year);

    let genres = if details.genres.is_empty() {
        record.genres.clone()
    } else {
        details.genres
    };

    AggregateResult {
        title,
        year,
        rating: details.rating.or(record.rating),
        genres,
        overview: details
            .overview
            .unwrap_or_else(|| record.overview.clone()),
        content_type: classify(query, Some(record.media_kind)),
        images: Vec::new(),
    }
}
