use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use posterdeck_common::{ImageItem, ResolvedRecord};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::ScoringConfig;
use crate::sources::{CatalogSource, ImageQuery, ImageSource};

use super::score::rank;

/// Content identity of an image: SHA-256 of its trimmed URL.
pub fn url_hash(url: &str) -> String {
    hex::encode(Sha256::digest(url.trim().as_bytes()))
}

/// Drop repeated URLs, keeping the first occurrence.
pub fn dedupe(items: Vec<ImageItem>) -> Vec<ImageItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(url_hash(&item.url)))
        .collect()
}

/// Fans out to every image-capable source and produces one ranked list.
pub struct ImageMerger {
    catalog: Arc<dyn CatalogSource>,
    sources: Vec<Arc<dyn ImageSource>>,
    weights: ScoringConfig,
}

impl ImageMerger {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        sources: Vec<Arc<dyn ImageSource>>,
        weights: ScoringConfig,
    ) -> Self {
        Self {
            catalog,
            sources,
            weights,
        }
    }

    /// Tags of the scraped sources, in registry order.
    pub fn source_tags(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.tag()).collect()
    }

    /// Structured images for the record's catalog entry plus scraped images
    /// for `query`, deduplicated and ordered best first.
    ///
    /// The structured fetch and every scraped source run concurrently. A slow
    /// source delays the result by at most its own timeout.
    pub async fn merge_images(
        &self,
        record: &ResolvedRecord,
        query: ImageQuery<'_>,
    ) -> Vec<ImageItem> {
        let structured = async {
            match record.provider {
                Some(target) if self.catalog.is_available() => self.catalog.images(target).await,
                _ => Vec::new(),
            }
        };
        let scraped = join_all(self.sources.iter().map(|source| source.fetch_images(query)));

        let (structured, scraped) = futures::join!(structured, scraped);

        let structured_count = structured.len();
        let mut all = structured;
        for batch in scraped {
            all.extend(batch);
        }
        let total = all.len();

        let unique = dedupe(all);
        debug!(
            title = %query.title,
            structured = structured_count,
            total,
            unique = unique.len(),
            "Merged images"
        );

        rank(unique, &self.weights)
    }
}
