mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file, apply environment overrides and
/// validate the result.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config)?;
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations, falling back to defaults plus
/// environment overrides when no file is found.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./posterdeck.toml",
        "~/.config/posterdeck/config.toml",
        "/etc/posterdeck/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config)?;
    validate_config(&config)?;
    Ok(config)
}

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary variable lookup.
///
/// Unset variables leave the file value untouched; numeric variables that fail
/// to parse are an error.
pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup("BOT_TOKEN") {
        config.transport.token = Some(token);
    }
    if let Some(key) = lookup("TMDB_API_KEY") {
        config.providers.tmdb_api_key = Some(key);
    }
    if let Some(key) = lookup("OMDB_API_KEY") {
        config.providers.omdb_api_key = Some(key);
    }
    if let Some(url) = lookup("REDIS_URL") {
        config.cache.redis_url = Some(url);
    }
    if let Some(debug) = lookup("DEBUG") {
        config.debug = debug.eq_ignore_ascii_case("true");
    }
    if let Some(language) = lookup("DEFAULT_LANGUAGE") {
        config.providers.language = language;
    }
    if let Some(size) = lookup("POSTER_PAGE_SIZE") {
        config.transport.page_size = size
            .trim()
            .parse()
            .with_context(|| format!("Invalid POSTER_PAGE_SIZE: {size}"))?;
    }
    if let Some(ttl) = lookup("CACHE_TTL_SECONDS") {
        config.cache.ttl_secs = ttl
            .trim()
            .parse()
            .with_context(|| format!("Invalid CACHE_TTL_SECONDS: {ttl}"))?;
    }
    if let Some(timeout) = lookup("REQUEST_TIMEOUT") {
        config.http.timeout_secs = timeout
            .trim()
            .parse()
            .with_context(|| format!("Invalid REQUEST_TIMEOUT: {timeout}"))?;
    }
    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let token_missing = config
        .transport
        .token
        .as_deref()
        .map(|t| t.trim().is_empty())
        .unwrap_or(true);
    if token_missing {
        anyhow::bail!(posterdeck_common::Error::config(
            "transport token is required (set transport.token or BOT_TOKEN)"
        ));
    }

    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.transport.page_size == 0 {
        anyhow::bail!("Page size must be at least 1");
    }

    if config.cache.capacity == 0 {
        anyhow::bail!("Cache capacity must be at least 1");
    }

    if config.http.timeout_secs == 0 {
        anyhow::bail!("Request timeout must be at least 1 second");
    }

    for source in &config.scraping.sources {
        if source.tag.trim().is_empty() || source.site.trim().is_empty() {
            anyhow::bail!("Scrape sources need both a tag and a site");
        }
    }

    Ok(())
}

/// Optional features the configuration leaves switched off, as log notes.
pub fn degraded_features(config: &Config) -> Vec<&'static str> {
    let mut notes = Vec::new();
    if config.providers.tmdb_key().is_none() {
        notes.push("TMDB API key not configured; primary catalog disabled");
    }
    if config.providers.omdb_key().is_none() {
        notes.push("OMDb API key not configured; fallback lookup disabled");
    }
    if config.cache.redis_url.is_some() {
        notes.push("External cache address configured; in-process cache is used");
    }
    notes
}

/// Log each entry of [`degraded_features`]. Call once logging is initialised.
pub fn log_degraded_features(config: &Config) {
    for note in degraded_features(config) {
        tracing::info!("{note}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use std::io::Write;

    fn with_token() -> Config {
        let mut config = Config::default();
        config.transport.token = Some("secret".into());
        config
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.transport.page_size, 6);
        assert_eq!(config.cache.ttl_secs, 900);
        assert_eq!(config.cache.capacity, 512);
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.providers.language, "en-US");
        assert_eq!(config.scraping.sources.len(), 10);
        assert_eq!(config.scoring.resolution_weight, 3.0);
        assert_eq!(config.scoring.popularity_weight, 5.0);
        assert_eq!(config.scoring.structured_bonus, 50.0);
        assert!(!config.debug);
    }

    #[test]
    fn missing_token_is_fatal() {
        let err = validate_config(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("transport token"));

        let mut config = Config::default();
        config.transport.token = Some("   ".into());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn missing_provider_keys_are_not_errors() {
        let config = with_token();
        assert!(config.providers.tmdb_key().is_none());
        assert!(config.providers.omdb_key().is_none());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn degraded_features_name_missing_keys() {
        let mut config = with_token();
        let notes = degraded_features(&config);
        assert_eq!(notes.len(), 2);
        assert!(notes[0].contains("TMDB"));
        assert!(notes[1].contains("OMDb"));

        config.providers.tmdb_api_key = Some("k".into());
        config.providers.omdb_api_key = Some("k".into());
        assert!(degraded_features(&config).is_empty());

        config.cache.redis_url = Some("redis://localhost".into());
        assert_eq!(degraded_features(&config).len(), 1);
    }

    #[test]
    fn empty_provider_key_counts_as_unset() {
        let mut config = with_token();
        config.providers.tmdb_api_key = Some(String::new());
        assert!(config.providers.tmdb_key().is_none());
    }

    #[test]
    fn zero_page_size_rejected() {
        let mut config = with_token();
        config.transport.page_size = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn overrides_apply_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("BOT_TOKEN", "tok"),
            ("TMDB_API_KEY", "tmdb"),
            ("OMDB_API_KEY", "omdb"),
            ("DEBUG", "TRUE"),
            ("DEFAULT_LANGUAGE", "ja-JP"),
            ("POSTER_PAGE_SIZE", "9"),
            ("CACHE_TTL_SECONDS", "60"),
            ("REQUEST_TIMEOUT", "3"),
            ("REDIS_URL", "redis://localhost"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        apply_overrides_from(&mut config, |k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.transport.token.as_deref(), Some("tok"));
        assert_eq!(config.providers.tmdb_key(), Some("tmdb"));
        assert_eq!(config.providers.omdb_key(), Some("omdb"));
        assert!(config.debug);
        assert_eq!(config.providers.language, "ja-JP");
        assert_eq!(config.transport.page_size, 9);
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.http.timeout_secs, 3);
        assert_eq!(config.cache.redis_url.as_deref(), Some("redis://localhost"));
    }

    #[test]
    fn malformed_numeric_override_is_an_error() {
        let mut config = Config::default();
        let result = apply_overrides_from(&mut config, |k| {
            (k == "CACHE_TTL_SECONDS").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn parses_toml_sections() {
        let toml_str = r#"
            debug = true

            [transport]
            token = "abc"
            page_size = 4

            [providers]
            tmdb_api_key = "k"

            [cache]
            ttl_secs = 30
            capacity = 8

            [scoring]
            structured_bonus = 100.0

            [[scraping.sources]]
            tag = "fanart"
            site = "fanart.tv"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.debug);
        assert_eq!(config.transport.page_size, 4);
        assert_eq!(config.providers.tmdb_key(), Some("k"));
        assert_eq!(config.cache.capacity, 8);
        assert_eq!(config.scoring.structured_bonus, 100.0);
        assert_eq!(config.scoring.resolution_weight, 3.0);
        assert_eq!(config.scraping.sources.len(), 1);
        assert!(config.scraping.bing_enabled);
    }

    #[test]
    #[serial]
    fn load_config_reads_file_and_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[transport]\ntoken = \"from-file\"").unwrap();

        std::env::set_var("REQUEST_TIMEOUT", "7");
        let config = load_config(file.path());
        std::env::remove_var("REQUEST_TIMEOUT");

        let config = config.unwrap();
        assert_eq!(config.transport.token.as_deref(), Some("from-file"));
        assert_eq!(config.http.timeout_secs, 7);
    }
}
