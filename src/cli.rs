use clap::{Parser, Subcommand, ValueEnum};
use posterdeck_common::MediaKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "posterdeck")]
#[command(author, version, about = "Poster and metadata aggregation for movies, TV and anime")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Look up a title and list its ranked posters
    Search {
        /// Title to search for; a trailing four-digit year is split off
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Release year (overrides a year in the query text)
        #[arg(short, long)]
        year: Option<u16>,

        /// Page of images to show (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Output the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show trending titles
    Trending {
        #[arg(value_enum)]
        kind: KindArg,

        /// Use the weekly list instead of the daily one
        #[arg(long)]
        week: bool,
    },

    /// Suggest a few of this week's trending movies
    Recommend {
        /// Number of suggestions
        #[arg(short = 'n', long, default_value = "5")]
        count: usize,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Movie,
    Tv,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Movie => MediaKind::Movie,
            KindArg::Tv => MediaKind::Series,
        }
    }
}
