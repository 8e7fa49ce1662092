//! OMDb fallback lookup.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::ProvidersConfig;

use super::http::Fetcher;
use super::{FallbackSource, FallbackTitle};

/// Exact-title response. OMDb reports failures in-band with `Response: "False"`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbTitle {
    response: Option<String>,
    title: Option<String>,
    year: Option<String>,
    plot: Option<String>,
    genre: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
}

pub struct OmdbSource {
    fetcher: Fetcher,
    api_key: Option<String>,
    base_url: String,
}

impl OmdbSource {
    pub fn new(fetcher: Fetcher, providers: &ProvidersConfig) -> Self {
        Self {
            fetcher,
            api_key: providers.omdb_key().map(str::to_string),
            base_url: providers.omdb_base_url.clone(),
        }
    }
}

#[async_trait]
impl FallbackSource for OmdbSource {
    fn name(&self) -> &'static str {
        "omdb"
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn find_by_title(&self, title: &str, year: Option<u16>) -> Option<FallbackTitle> {
        let api_key = self.api_key.as_deref()?;

        let mut params = vec![
            ("apikey".to_string(), api_key.to_string()),
            ("t".to_string(), title.to_string()),
        ];
        if let Some(y) = year {
            params.push(("y".to_string(), y.to_string()));
        }

        debug!(title = %title, "OMDb title lookup");
        let body = self.fetcher.get_json(&self.base_url, &params).await?;
        let found = OmdbTitle::deserialize(body.as_ref()).ok()?;

        if found.response.as_deref() != Some("True") {
            debug!(title = %title, "OMDb reported no match");
            return None;
        }

        Some(FallbackTitle {
            title: found.title.unwrap_or_else(|| title.to_string()),
            year: found.year,
            plot: found.plot,
            rating: found.imdb_rating,
            genre: found.genre,
            imdb_id: found.imdb_id,
        })
    }
}
