//! Canonical record selection.
//!
//! The [`Resolver`] walks an ordered list of [`ResolverStrategy`] values and
//! returns the first record any of them produces. Strategies run strictly in
//! sequence, so lower-priority sources are never contacted once a
//! higher-priority one has matched. Whole decisions are memoized per
//! `(query, year)` in the shared cache; misses are not memoized.

use std::sync::Arc;

use async_trait::async_trait;
use posterdeck_common::{MediaKind, ProviderRef, ProviderScope, ResolvedRecord};
use tracing::{debug, info};

use crate::cache::{request_key, CacheValue, SharedCache};
use crate::sources::{parse_year, Candidate, CandidateKind, CatalogSource, FallbackSource, FallbackTitle};

/// One step of the resolution cascade.
#[async_trait]
pub trait ResolverStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    async fn resolve(&self, query: &str, year: Option<u16>) -> Option<ResolvedRecord>;
}

fn from_candidate(candidate: &Candidate, media_kind: MediaKind, scope: ProviderScope) -> ResolvedRecord {
    ResolvedRecord {
        media_kind,
        provider: Some(ProviderRef::new(scope, candidate.id)),
        title: candidate.title.clone(),
        release_year: candidate.release_date.as_deref().and_then(parse_year),
        rating: candidate.rating,
        genres: Vec::new(),
        overview: candidate.overview.clone().unwrap_or_default(),
        imdb_id: None,
    }
}

/// First movie or series hit of the catalog's multi search.
pub struct PrimaryMultiSearch {
    catalog: Arc<dyn CatalogSource>,
}

impl PrimaryMultiSearch {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ResolverStrategy for PrimaryMultiSearch {
    fn name(&self) -> &'static str {
        "primary-multi"
    }

    async fn resolve(&self, query: &str, year: Option<u16>) -> Option<ResolvedRecord> {
        if !self.catalog.is_available() {
            return None;
        }

        self.catalog
            .search_multi(query, year)
            .await
            .iter()
            .find_map(|candidate| match candidate.kind {
                CandidateKind::Movie => Some(from_candidate(candidate, MediaKind::Movie, ProviderScope::Movie)),
                CandidateKind::Series => Some(from_candidate(candidate, MediaKind::Series, ProviderScope::Tv)),
                _ => None,
            })
    }
}

/// First hit of the catalog's collection search, typed as a movie.
pub struct PrimaryCollectionSearch {
    catalog: Arc<dyn CatalogSource>,
}

impl PrimaryCollectionSearch {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ResolverStrategy for PrimaryCollectionSearch {
    fn name(&self) -> &'static str {
        "primary-collection"
    }

    async fn resolve(&self, query: &str, _year: Option<u16>) -> Option<ResolvedRecord> {
        if !self.catalog.is_available() {
            return None;
        }

        self.catalog
            .search_collection(query)
            .await
            .first()
            .map(|candidate| from_candidate(candidate, MediaKind::Movie, ProviderScope::Collection))
    }
}

/// Exact-title lookup against the fallback source, typed as a movie.
pub struct FallbackTitleLookup {
    fallback: Arc<dyn FallbackSource>,
}

impl FallbackTitleLookup {
    pub fn new(fallback: Arc<dyn FallbackSource>) -> Self {
        Self { fallback }
    }
}

/// Fallback ratings are text; `"N/A"` and unparseable values mean unrated.
fn parse_rating(rating: Option<&str>) -> Option<f64> {
    rating
        .map(str::trim)
        .filter(|r| !r.is_empty() && *r != "N/A")
        .and_then(|r| r.parse::<f64>().ok())
}

fn split_genres(genre: Option<&str>) -> Vec<String> {
    genre
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty() && *g != "N/A")
        .map(str::to_string)
        .collect()
}

impl From<FallbackTitle> for ResolvedRecord {
    fn from(found: FallbackTitle) -> Self {
        ResolvedRecord {
            media_kind: MediaKind::Movie,
            provider: None,
            release_year: found.year.as_deref().and_then(parse_year),
            rating: parse_rating(found.rating.as_deref()),
            genres: split_genres(found.genre.as_deref()),
            overview: found.plot.filter(|p| p != "N/A").unwrap_or_default(),
            imdb_id: found.imdb_id.filter(|id| id.starts_with("tt")),
            title: found.title,
        }
    }
}

#[async_trait]
impl ResolverStrategy for FallbackTitleLookup {
    fn name(&self) -> &'static str {
        "fallback-title"
    }

    async fn resolve(&self, query: &str, year: Option<u16>) -> Option<ResolvedRecord> {
        if !self.fallback.is_available() {
            return None;
        }

        self.fallback
            .find_by_title(query, year)
            .await
            .map(ResolvedRecord::from)
    }
}

/// Ordered, memoizing resolution cascade.
pub struct Resolver {
    strategies: Vec<Box<dyn ResolverStrategy>>,
    cache: SharedCache,
}

impl Resolver {
    pub fn new(cache: SharedCache, strategies: Vec<Box<dyn ResolverStrategy>>) -> Self {
        Self { strategies, cache }
    }

    /// The standard cascade: catalog multi search, catalog collection search,
    /// then the fallback title lookup.
    pub fn standard(
        cache: SharedCache,
        catalog: Arc<dyn CatalogSource>,
        fallback: Arc<dyn FallbackSource>,
    ) -> Self {
        Self::new(
            cache,
            vec![
                Box::new(PrimaryMultiSearch::new(Arc::clone(&catalog))),
                Box::new(PrimaryCollectionSearch::new(catalog)),
                Box::new(FallbackTitleLookup::new(fallback)),
            ],
        )
    }

    /// Strategy names in priority order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Resolve `query` to a canonical record, or `None` when nothing matches.
    pub async fn resolve(&self, query: &str, year: Option<u16>) -> Option<Arc<ResolvedRecord>> {
        let key = resolve_key(query, year);
        if let Some(CacheValue::Resolved(record)) = self.cache.get(&key) {
            debug!(query = %query, "Resolver cache hit");
            return Some(record);
        }

        for strategy in &self.strategies {
            if let Some(record) = strategy.resolve(query, year).await {
                debug!(
                    query = %query,
                    strategy = strategy.name(),
                    title = %record.title,
                    kind = %record.media_kind,
                    "Resolved title"
                );
                let record = Arc::new(record);
                self.cache.set(key, CacheValue::Resolved(Arc::clone(&record)));
                return Some(record);
            }
        }

        info!(query = %query, year = ?year, "No source matched query");
        None
    }
}

fn resolve_key(query: &str, year: Option<u16>) -> String {
    let year = year.map(|y| y.to_string()).unwrap_or_default();
    request_key("resolve", query, &[("year".to_string(), year)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TtlCache;
    use crate::testing::{candidate, StubCatalog, StubFallback};
    use std::time::Duration;

    fn cache() -> SharedCache {
        Arc::new(TtlCache::new(64, Duration::from_secs(900)))
    }

    fn heat() -> FallbackTitle {
        FallbackTitle {
            title: "Heat".into(),
            year: Some("1995".into()),
            plot: Some("Thieves.".into()),
            rating: Some("8.3".into()),
            genre: Some("Action, Crime , Drama".into()),
            imdb_id: Some("tt0113277".into()),
        }
    }

    #[tokio::test]
    async fn multi_search_skips_non_title_kinds() {
        let catalog = Arc::new(StubCatalog {
            multi: vec![
                candidate(CandidateKind::Other, 1, "A Person"),
                candidate(CandidateKind::Series, 123, "Naruto"),
                candidate(CandidateKind::Movie, 5, "Naruto the Movie"),
            ],
            ..StubCatalog::available()
        });
        let fallback = Arc::new(StubFallback::returning(heat()));
        let resolver = Resolver::standard(cache(), catalog.clone(), fallback.clone());

        let record = resolver.resolve("naruto", None).await.unwrap();
        assert_eq!(record.media_kind, MediaKind::Series);
        assert_eq!(record.provider, Some(ProviderRef::new(ProviderScope::Tv, 123)));
        assert_eq!(catalog.collection_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn collection_search_is_second() {
        let catalog = Arc::new(StubCatalog {
            collections: vec![candidate(CandidateKind::Collection, 10, "Star Wars Collection")],
            ..StubCatalog::available()
        });
        let fallback = Arc::new(StubFallback::returning(heat()));
        let resolver = Resolver::standard(cache(), catalog, fallback.clone());

        let record = resolver.resolve("star wars saga", None).await.unwrap();
        assert_eq!(record.media_kind, MediaKind::Movie);
        assert_eq!(
            record.provider,
            Some(ProviderRef::new(ProviderScope::Collection, 10))
        );
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn fallback_lookup_synthesizes_movie() {
        let catalog = Arc::new(StubCatalog::available());
        let fallback = Arc::new(StubFallback::returning(heat()));
        let resolver = Resolver::standard(cache(), catalog, fallback.clone());

        let record = resolver.resolve("Heat", Some(1995)).await.unwrap();
        assert_eq!(record.media_kind, MediaKind::Movie);
        assert_eq!(record.provider, None);
        assert_eq!(record.release_year, Some(1995));
        assert_eq!(record.rating, Some(8.3));
        assert_eq!(record.genres, vec!["Action", "Crime", "Drama"]);
        assert_eq!(record.imdb_id.as_deref(), Some("tt0113277"));
        assert_eq!(fallback.calls(), 1);
    }

    #[test]
    fn fallback_rating_na_is_absent() {
        let record = ResolvedRecord::from(FallbackTitle {
            title: "Obscure".into(),
            year: Some("2019–2022".into()),
            rating: Some("N/A".into()),
            genre: Some("N/A".into()),
            plot: Some("N/A".into()),
            ..FallbackTitle::default()
        });
        assert_eq!(record.rating, None);
        assert_eq!(record.release_year, Some(2019));
        assert!(record.genres.is_empty());
        assert_eq!(record.overview, "");
    }

    #[tokio::test]
    async fn nothing_matches_is_none_and_not_memoized() {
        let catalog = Arc::new(StubCatalog::available());
        let fallback = Arc::new(StubFallback::default());
        let resolver = Resolver::standard(cache(), catalog.clone(), fallback);

        assert!(resolver.resolve("zzzz", None).await.is_none());
        assert!(resolver.resolve("zzzz", None).await.is_none());
        assert_eq!(catalog.multi_calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unavailable_sources_are_skipped() {
        let catalog = Arc::new(StubCatalog::default());
        let fallback = Arc::new(StubFallback::default());
        let resolver = Resolver::standard(cache(), catalog.clone(), fallback.clone());

        assert!(resolver.resolve("dune", None).await.is_none());
        assert_eq!(catalog.calls(), 0);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn success_is_memoized_per_query_and_year() {
        let catalog = Arc::new(StubCatalog {
            multi: vec![candidate(CandidateKind::Movie, 1, "Dune")],
            ..StubCatalog::available()
        });
        let resolver = Resolver::standard(cache(), catalog.clone(), Arc::new(StubFallback::default()));

        let first = resolver.resolve("dune", Some(2021)).await.unwrap();
        let second = resolver.resolve("dune", Some(2021)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(catalog.multi_calls.load(std::sync::atomic::Ordering::SeqCst), 1);

        resolver.resolve("dune", None).await.unwrap();
        assert_eq!(catalog.multi_calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn standard_order() {
        let resolver = Resolver::standard(
            cache(),
            Arc::new(StubCatalog::default()),
            Arc::new(StubFallback::default()),
        );
        assert_eq!(
            resolver.strategy_names(),
            vec!["primary-multi", "primary-collection", "fallback-title"]
        );
    }
}
