//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which starts a wiremock server standing in for
//! every upstream (catalog, fallback, both image search engines) and builds a
//! production [`Aggregator`] pointed at it. The [`with_server`] constructor
//! also starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use posterdeck::config::Config;
use posterdeck::metadata::Aggregator;
use posterdeck::server::{create_router, AppContext};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-token";
pub const TMDB_KEY: &str = "tmdb-key";
pub const OMDB_KEY: &str = "omdb-key";

/// Test harness wrapping a mock upstream and an aggregator wired to it.
pub struct TestHarness {
    pub upstream: MockServer,
    pub config: Config,
    pub aggregator: Arc<Aggregator>,
}

/// Configuration pointing every upstream at `upstream`, with both API keys set.
pub fn config_for(upstream: &MockServer) -> Config {
    let mut config = Config::default();
    config.transport.token = Some(TOKEN.to_string());
    config.transport.page_size = 3;
    config.providers.tmdb_api_key = Some(TMDB_KEY.to_string());
    config.providers.omdb_api_key = Some(OMDB_KEY.to_string());
    config.providers.tmdb_base_url = format!("{}/tmdb", upstream.uri());
    config.providers.tmdb_image_base = "https://image.test/original".to_string();
    config.providers.omdb_base_url = format!("{}/omdb/", upstream.uri());
    config.scraping.google_url = format!("{}/google/search", upstream.uri());
    config.scraping.bing_url = format!("{}/bing/images/search", upstream.uri());
    config.scraping.imdb_url = format!("{}/imdb", upstream.uri());
    config.http.timeout_secs = 2;
    config
}

impl TestHarness {
    /// Create a harness with both provider keys configured.
    pub async fn new() -> Self {
        let upstream = MockServer::start().await;
        let config = config_for(&upstream);
        Self::from_parts(upstream, config)
    }

    /// Create a harness, letting the caller adjust the configuration.
    pub async fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let upstream = MockServer::start().await;
        let mut config = config_for(&upstream);
        adjust(&mut config);
        Self::from_parts(upstream, config)
    }

    fn from_parts(upstream: MockServer, config: Config) -> Self {
        let aggregator =
            Arc::new(Aggregator::from_config(&config).expect("failed to build aggregator"));
        Self {
            upstream,
            config,
            aggregator,
        }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new().await;
        let ctx = AppContext::new(
            Arc::clone(&harness.aggregator),
            Arc::new(harness.config.clone()),
        );
        let app = create_router(ctx);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    // -----------------------------------------------------------------------
    // Upstream fixtures
    // -----------------------------------------------------------------------

    /// Catalog multi search for `query` answering with `results`.
    pub async fn mock_multi(&self, query: &str, results: Value, expected: u64) {
        Mock::given(method("GET"))
            .and(path("/tmdb/search/multi"))
            .and(query_param("api_key", TMDB_KEY))
            .and(query_param("query", query))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": results })))
            .expect(expected)
            .mount(&self.upstream)
            .await;
    }

    /// Catalog collection search answering with `results`.
    pub async fn mock_collections(&self, results: Value, expected: u64) {
        Mock::given(method("GET"))
            .and(path("/tmdb/search/collection"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": results })))
            .expect(expected)
            .mount(&self.upstream)
            .await;
    }

    /// Detail endpoint for `scope/id`.
    pub async fn mock_details(&self, scope: &str, id: u64, body: Value, expected: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/tmdb/{scope}/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(expected)
            .mount(&self.upstream)
            .await;
    }

    /// Images endpoint for `scope/id`.
    pub async fn mock_images(&self, scope: &str, id: u64, body: Value, expected: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/tmdb/{scope}/{id}/images")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(expected)
            .mount(&self.upstream)
            .await;
    }

    /// Fallback lookup answering with `body` for any title.
    pub async fn mock_omdb(&self, body: Value, expected: u64) {
        Mock::given(method("GET"))
            .and(path("/omdb/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(expected)
            .mount(&self.upstream)
            .await;
    }

    /// Site-restricted image search for `title` on `site` returning markup
    /// with one direct link and one blocked thumbnail.
    pub async fn mock_site_search(&self, title: &str, site: &str) {
        let markup = format!(
            r#"<div><img src="https://encrypted-tbn0.gstatic.com/{site}.jpg">
               <a href="https://{site}/posters/{}.jpg">poster</a></div>"#,
            title.to_lowercase().replace(' ', "-")
        );
        Mock::given(method("GET"))
            .and(path("/google/search"))
            .and(query_param("q", format!("{title} site:{site}")))
            .and(query_param("tbm", "isch"))
            .respond_with(ResponseTemplate::new(200).set_body_string(markup))
            .mount(&self.upstream)
            .await;
    }

    /// Unrestricted image search for `title` returning `urls`.
    pub async fn mock_bing(&self, title: &str, urls: &[&str]) {
        let markup: String = urls
            .iter()
            .map(|u| format!(r#"<a class="iusc" href="{u}"></a>"#))
            .collect();
        Mock::given(method("GET"))
            .and(path("/bing/images/search"))
            .and(query_param("q", title))
            .respond_with(ResponseTemplate::new(200).set_body_string(markup))
            .mount(&self.upstream)
            .await;
    }

    /// IMDb media page for `imdb_id` listing `urls`.
    pub async fn mock_imdb_page(&self, imdb_id: &str, urls: &[&str]) {
        let markup: String = urls.iter().map(|u| format!(r#"<img src="{u}">"#)).collect();
        Mock::given(method("GET"))
            .and(path(format!("/imdb/title/{imdb_id}/mediaindex/")))
            .respond_with(ResponseTemplate::new(200).set_body_string(markup))
            .expect(1)
            .mount(&self.upstream)
            .await;
    }

    /// Site tags and hosts of the configured site-restricted sources.
    pub fn sites(&self) -> Vec<(String, String)> {
        self.config
            .scraping
            .sources
            .iter()
            .map(|s| (s.tag.clone(), s.site.clone()))
            .collect()
    }
}
