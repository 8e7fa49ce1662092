//! Shared upstream fetcher.
//!
//! Every adapter issues its GET requests through a [`Fetcher`]: one reqwest
//! client with the configured timeout, consulting the shared cache before the
//! network and storing only successful, parseable responses.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{request_key, CacheValue, SharedCache};
use crate::config::HttpConfig;

use super::FetchError;

/// Query parameters of one upstream request.
pub type Params = Vec<(String, String)>;

/// Cache-aware HTTP GET helper shared by all adapters.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    cache: SharedCache,
    accept_language: String,
}

impl Fetcher {
    /// Build the shared client. Fails when the configured timeout or user
    /// agent cannot be applied.
    pub fn new(cache: SharedCache, http: &HttpConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .user_agent(http.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            cache,
            accept_language: http.accept_language.clone(),
        })
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    /// GET a JSON document. `None` on any failure.
    pub async fn get_json(&self, url: &str, params: &Params) -> Option<Arc<serde_json::Value>> {
        let key = request_key("json", url, params);
        if let Some(CacheValue::Json(value)) = self.cache.get(&key) {
            debug!(url = %url, "Cache hit");
            return Some(value);
        }

        match self.fetch_json(url, params).await {
            Ok(value) => {
                let value = Arc::new(value);
                self.cache.set(key, CacheValue::Json(Arc::clone(&value)));
                Some(value)
            }
            Err(e) => {
                log_failure(&e);
                None
            }
        }
    }

    /// GET a markup page with browser-like headers. `None` on any failure.
    pub async fn get_markup(&self, url: &str, params: &Params) -> Option<Arc<str>> {
        let key = request_key("markup", url, params);
        if let Some(CacheValue::Markup(body)) = self.cache.get(&key) {
            debug!(url = %url, "Cache hit");
            return Some(body);
        }

        match self.fetch_markup(url, params).await {
            Ok(body) => {
                let body: Arc<str> = Arc::from(body);
                self.cache.set(key, CacheValue::Markup(Arc::clone(&body)));
                Some(body)
            }
            Err(e) => {
                log_failure(&e);
                None
            }
        }
    }

    async fn fetch_json(&self, url: &str, params: &Params) -> Result<serde_json::Value, FetchError> {
        let bytes = self
            .send(self.client.get(url).query(params), url)
            .await?
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(FetchError::EmptyBody {
                url: url.to_string(),
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| FetchError::Malformed {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn fetch_markup(&self, url: &str, params: &Params) -> Result<String, FetchError> {
        let request = self
            .client
            .get(url)
            .query(params)
            .header(reqwest::header::ACCEPT_LANGUAGE, &self.accept_language);

        let body = self
            .send(request, url)
            .await?
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody {
                url: url.to_string(),
            });
        }
        Ok(body)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, FetchError> {
        debug!(url = %url, "Upstream GET");
        let resp = request
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(resp)
    }
}

fn log_failure(error: &FetchError) {
    if error.is_not_found() {
        debug!(error = %error, "Upstream returned no result");
    } else {
        warn!(error = %error, "Upstream request failed; treating as empty");
    }
}

/// Build a parameter list from borrowed pairs.
pub fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
