mod cli;

use posterdeck::{
    caption::render_caption, config, metadata::Aggregator, query::parse_query, server,
    session::{page_start, PagingSession},
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use posterdeck_common::{MediaKind, TrendingTitle, TrendingWindow};
use std::path::Path;
use std::sync::Arc;

const TRENDING_LIMIT: usize = 10;

fn init_logging(verbose: bool) {
    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if verbose {
            "posterdeck=debug,posterdeck_common=debug,tower_http=debug".to_string()
        } else {
            "posterdeck=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();
}

fn load(config_path: Option<&Path>, verbose: bool) -> Result<config::Config> {
    let config = config::load_config_or_default(config_path)?;
    init_logging(verbose || config.debug);
    config::log_degraded_features(&config);
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = load(cli.config.as_deref(), cli.verbose)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(serve(config))
        }
        Commands::Search {
            query,
            year,
            page,
            json,
        } => {
            let config = load(cli.config.as_deref(), cli.verbose)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(search(&config, &query.join(" "), year, page, json))
        }
        Commands::Trending { kind, week } => {
            let config = load(cli.config.as_deref(), cli.verbose)?;
            let window = if week {
                TrendingWindow::Week
            } else {
                TrendingWindow::Day
            };
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(trending(&config, kind.into(), window))
        }
        Commands::Recommend { count } => {
            let config = load(cli.config.as_deref(), cli.verbose)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(recommend(&config, count))
        }
        Commands::Validate {
            config: config_path,
        } => {
            init_logging(cli.verbose);
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("posterdeck {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn serve(config: config::Config) -> Result<()> {
    tracing::info!("Starting posterdeck server");
    let aggregator = Arc::new(Aggregator::from_config(&config)?);
    server::start_server(config, aggregator).await
}

async fn search(
    config: &config::Config,
    text: &str,
    year: Option<u16>,
    page: usize,
    json: bool,
) -> Result<()> {
    let parsed = parse_query(text).context("Invalid search query")?;
    let year = year.or(parsed.year);

    let aggregator = Aggregator::from_config(config)?;
    let Some(result) = aggregator.aggregate(&parsed.title, year).await else {
        println!("No results found for \"{}\".", parsed.title);
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(result.as_ref())?);
        return Ok(());
    }

    println!("{}", render_caption(&result, None));

    let page_size = config.transport.page_size;
    let session = PagingSession::new(result);
    if session.is_empty() {
        println!("\nNo posters found.");
        return Ok(());
    }

    let page = page.max(1);
    let page_count = session.page_count(page_size);
    println!(
        "\nPosters: {} (page {}/{})",
        session.len(),
        page.min(page_count),
        page_count
    );
    let start = page_start(page, page_size);
    for (i, image) in session.page(page, page_size).iter().enumerate() {
        let size = match (image.width, image.height) {
            (Some(w), Some(h)) => format!("{w}x{h}"),
            _ => "?".to_string(),
        };
        println!(
            "  {:>3}. [{}] {} {} ({})",
            start + i + 1,
            image.source,
            image.kind,
            image.url,
            size
        );
    }

    Ok(())
}

fn print_titles(titles: &[TrendingTitle]) {
    if titles.is_empty() {
        println!("Nothing to show (is the TMDB API key configured?)");
        return;
    }
    for (i, title) in titles.iter().enumerate() {
        let rating = title
            .rating
            .map(|r| format!("{r:.1}"))
            .unwrap_or_else(|| "N/A".to_string());
        println!("{:>2}. {} (⭐ {})", i + 1, title.title, rating);
    }
}

async fn trending(config: &config::Config, kind: MediaKind, window: TrendingWindow) -> Result<()> {
    let aggregator = Aggregator::from_config(config)?;
    let titles = aggregator.trending(kind, window, TRENDING_LIMIT).await;
    println!("Trending {} ({}):", kind, window.as_str());
    print_titles(&titles);
    Ok(())
}

async fn recommend(config: &config::Config, count: usize) -> Result<()> {
    let aggregator = Aggregator::from_config(config)?;
    let titles = aggregator.recommend(count).await;
    println!("Recommended this week:");
    print_titles(&titles);
    Ok(())
}

fn validate_config(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Configuration is valid");
    println!(
        "  Server: {}:{}",
        config.server.host, config.server.port
    );
    println!(
        "  TMDB: {}",
        if config.providers.tmdb_key().is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!(
        "  OMDb: {}",
        if config.providers.omdb_key().is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!(
        "  Scraped sources: {}",
        if config.scraping.enabled {
            config.scraping.sources.len()
                + usize::from(config.scraping.bing_enabled)
                + usize::from(config.scraping.imdb_enabled)
        } else {
            0
        }
    );
    println!(
        "  Cache: {} entries, {}s TTL",
        config.cache.capacity, config.cache.ttl_secs
    );
    println!("  Page size: {}", config.transport.page_size);

    Ok(())
}
