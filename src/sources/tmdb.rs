//! TMDB (The Movie Database) catalog source.
//!
//! Implements [`CatalogSource`] over the TMDB v3 REST API. Response bodies are
//! decoded into private structs and normalized before leaving this module.

use async_trait::async_trait;
use posterdeck_common::{ImageItem, ImageKind, MediaKind, ProviderRef, ProviderScope, TrendingWindow};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::ProvidersConfig;

use super::http::{Fetcher, Params};
use super::{Candidate, CandidateKind, CatalogDetails, CatalogSource};

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbPage<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TmdbMultiResult {
    id: u64,
    media_type: Option<String>,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    overview: Option<String>,
    vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TmdbCollectionResult {
    id: u64,
    name: Option<String>,
    overview: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbDetail {
    title: Option<String>,
    name: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    vote_average: Option<f64>,
    genres: Option<Vec<TmdbGenre>>,
    imdb_id: Option<String>,
    external_ids: Option<TmdbExternalIds>,
    /// Collection members, used to date a collection by its first part.
    parts: Option<Vec<TmdbPart>>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TmdbExternalIds {
    imdb_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbPart {
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbImagesResponse {
    posters: Option<Vec<TmdbImage>>,
    backdrops: Option<Vec<TmdbImage>>,
}

#[derive(Debug, Deserialize)]
struct TmdbImage {
    file_path: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    vote_count: Option<f64>,
}

// ---------------------------------------------------------------------------
// Source implementation
// ---------------------------------------------------------------------------

/// TMDB catalog source.
///
/// Without an API key every operation returns empty without a request.
pub struct TmdbSource {
    fetcher: Fetcher,
    api_key: Option<String>,
    language: String,
    base_url: String,
    image_base: String,
}

impl TmdbSource {
    pub fn new(fetcher: Fetcher, providers: &ProvidersConfig) -> Self {
        Self {
            fetcher,
            api_key: providers.tmdb_key().map(str::to_string),
            language: providers.language.clone(),
            base_url: providers.tmdb_base_url.trim_end_matches('/').to_string(),
            image_base: providers.tmdb_image_base.trim_end_matches('/').to_string(),
        }
    }

    /// GET `path` with credentials and decode the body as `T`.
    async fn request<T: DeserializeOwned>(&self, path: &str, extra: &[(&str, &str)]) -> Option<T> {
        let api_key = self.api_key.as_deref()?;

        let mut params: Params = vec![
            ("api_key".to_string(), api_key.to_string()),
            ("language".to_string(), self.language.clone()),
        ];
        params.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));

        let url = format!("{}{path}", self.base_url);
        let body = self.fetcher.get_json(&url, &params).await?;

        match T::deserialize(body.as_ref()) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(path = %path, error = %e, "Unexpected TMDB response shape");
                None
            }
        }
    }

    fn image_url(&self, path: &str) -> String {
        format!("{}{path}", self.image_base)
    }

    fn to_images(&self, images: Option<Vec<TmdbImage>>, kind: ImageKind) -> Vec<ImageItem> {
        images
            .unwrap_or_default()
            .into_iter()
            .filter_map(|img| {
                let path = img.file_path.filter(|p| !p.is_empty())?;
                Some(ImageItem {
                    url: self.image_url(&path),
                    kind,
                    width: img.width,
                    height: img.height,
                    popularity: img.vote_count,
                    structured: true,
                    source: "tmdb".to_string(),
                })
            })
            .collect()
    }

    /// `en-US` -> `en,null`, so untagged artwork is not filtered out.
    fn image_languages(&self) -> String {
        let primary = self.language.split('-').next().unwrap_or("en");
        format!("{primary},null")
    }
}

/// Keep ratings only when the title has actually been rated.
fn rated(vote_average: Option<f64>) -> Option<f64> {
    vote_average.filter(|v| *v > 0.0)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<TmdbMultiResult> for Candidate {
    fn from(r: TmdbMultiResult) -> Self {
        let kind = match r.media_type.as_deref() {
            Some("movie") => CandidateKind::Movie,
            Some("tv") => CandidateKind::Series,
            Some("collection") => CandidateKind::Collection,
            _ => CandidateKind::Other,
        };
        Candidate {
            kind,
            id: r.id,
            title: r.title.or(r.name).unwrap_or_default(),
            release_date: non_empty(r.release_date.or(r.first_air_date)),
            rating: rated(r.vote_average),
            overview: non_empty(r.overview),
        }
    }
}

#[async_trait]
impl CatalogSource for TmdbSource {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search_multi(&self, query: &str, year: Option<u16>) -> Vec<Candidate> {
        let year_str = year.map(|y| y.to_string());
        let mut params = vec![("query", query)];
        if let Some(ref y) = year_str {
            params.push(("year", y.as_str()));
        }

        debug!(query = %query, "TMDB multi search");
        self.request::<TmdbPage<TmdbMultiResult>>("/search/multi", &params)
            .await
            .map(|page| page.results.into_iter().map(Candidate::from).collect())
            .unwrap_or_default()
    }

    async fn search_collection(&self, query: &str) -> Vec<Candidate> {
        debug!(query = %query, "TMDB collection search");
        self.request::<TmdbPage<TmdbCollectionResult>>("/search/collection", &[("query", query)])
            .await
            .map(|page| {
                page.results
                    .into_iter()
                    .map(|r| Candidate {
                        kind: CandidateKind::Collection,
                        id: r.id,
                        title: r.name.unwrap_or_default(),
                        release_date: None,
                        rating: None,
                        overview: non_empty(r.overview),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn details(&self, target: ProviderRef) -> Option<CatalogDetails> {
        let path = format!("/{}/{}", target.scope.path_segment(), target.id);
        let extra: &[(&str, &str)] = match target.scope {
            ProviderScope::Tv => &[("append_to_response", "external_ids")],
            _ => &[],
        };

        let detail: TmdbDetail = self.request(&path, extra).await?;

        let release_date = detail.release_date.or(detail.first_air_date).or_else(|| {
            detail
                .parts
                .unwrap_or_default()
                .into_iter()
                .filter_map(|p| non_empty(p.release_date))
                .min()
        });

        Some(CatalogDetails {
            title: non_empty(detail.title.or(detail.name)),
            release_date: non_empty(release_date),
            rating: rated(detail.vote_average),
            genres: detail
                .genres
                .unwrap_or_default()
                .into_iter()
                .map(|g| g.name)
                .collect(),
            overview: non_empty(detail.overview),
            imdb_id: non_empty(
                detail
                    .imdb_id
                    .or_else(|| detail.external_ids.and_then(|ids| ids.imdb_id)),
            ),
        })
    }

    async fn images(&self, target: ProviderRef) -> Vec<ImageItem> {
        let path = format!("/{}/{}/images", target.scope.path_segment(), target.id);
        let languages = self.image_languages();

        let Some(body) = self
            .request::<TmdbImagesResponse>(&path, &[("include_image_language", &languages)])
            .await
        else {
            return Vec::new();
        };

        let mut items = self.to_images(body.posters, ImageKind::Poster);
        items.extend(self.to_images(body.backdrops, ImageKind::Backdrop));
        debug!(target = %target, count = items.len(), "TMDB images");
        items
    }

    async fn trending(&self, kind: MediaKind, window: TrendingWindow) -> Vec<Candidate> {
        let segment = match kind {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        };
        let path = format!("/trending/{segment}/{}", window.as_str());
        let fallback_kind = match kind {
            MediaKind::Movie => CandidateKind::Movie,
            MediaKind::Series => CandidateKind::Series,
        };

        self.request::<TmdbPage<TmdbMultiResult>>(&path, &[])
            .await
            .map(|page| {
                page.results
                    .into_iter()
                    .map(|r| {
                        let mut candidate = Candidate::from(r);
                        if candidate.kind == CandidateKind::Other {
                            candidate.kind = fallback_kind;
                        }
                        candidate
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
