//! Quran Client CLI - Command line tool for browsing the quran.com content API.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quran_client_core::{AppConfig, QuranClient, SearchRequest, VersesRequest};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "quran")]
#[command(
    author,
    version,
    about = "Browse Quran chapters, verses and recitations",
    long_about = None
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Quran API base URL
    #[arg(long, env = "QURAN_API_BASE", global = true)]
    api_base: Option<String>,

    /// Response cache lifetime in seconds (0 = disable caching)
    #[arg(long, env = "QURAN_CACHE_TTL", global = true)]
    cache_ttl: Option<u64>,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all chapters
    Chapters,

    /// Show one chapter
    Chapter {
        id: u32,
    },

    /// List the verses of a chapter
    Verses {
        chapter: u32,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 50)]
        per_page: u32,

        /// Translation resource ids (e.g., "131,20")
        #[arg(short, long, value_delimiter = ',')]
        translations: Vec<u32>,
    },

    /// Show a verse by key (e.g., "2:255")
    Verse {
        key: String,

        #[arg(short, long, value_delimiter = ',')]
        translations: Vec<u32>,
    },

    /// Show a random verse
    Random {
        #[arg(short, long, value_delimiter = ',')]
        translations: Vec<u32>,
    },

    /// List recitation audio for a chapter
    Audio {
        chapter: u32,

        /// Reciter id (default from config)
        #[arg(short, long)]
        reciter: Option<u32>,
    },

    /// List available reciters
    Reciters,

    /// Search verses and translations
    Search {
        query: String,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        size: u32,

        #[arg(short, long, value_delimiter = ',')]
        translations: Vec<u32>,
    },
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;

    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        println!("{out}");
    }

    Ok(())
}

async fn run(client: &QuranClient, command: Command) -> Result<()> {
    match command {
        Command::Chapters => print_json(&client.chapters().await),
        Command::Chapter { id } => {
            let chapter = client
                .chapter(id)
                .await
                .with_context(|| format!("Chapter {id} not found"))?;
            print_json(&chapter)
        }
        Command::Verses {
            chapter,
            page,
            per_page,
            translations,
        } => {
            let request = VersesRequest {
                page,
                per_page,
                translations,
            };
            let verses = client
                .chapter_verses(chapter, &request)
                .await
                .with_context(|| format!("Failed to fetch verses of chapter {chapter}"))?;
            print_json(&verses)
        }
        Command::Verse { key, translations } => {
            let verse = client
                .verse(&key, &translations)
                .await
                .with_context(|| format!("Failed to fetch verse {key}"))?;
            print_json(&verse)
        }
        Command::Random { translations } => print_json(&client.random_verse(&translations).await),
        Command::Audio { chapter, reciter } => {
            print_json(&client.chapter_audio(chapter, reciter).await)
        }
        Command::Reciters => print_json(&client.reciters().await),
        Command::Search {
            query,
            page,
            size,
            translations,
        } => {
            let request = SearchRequest {
                query,
                page,
                size,
                translations,
            };
            let results = client
                .search(&request)
                .await
                .with_context(|| format!("Search for '{}' failed", request.query))?;
            print_json(&results)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load or create config
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };

    // Override config with CLI arguments
    if let Some(api_base) = args.api_base {
        config.api.base_url = api_base;
    }
    if let Some(ttl) = args.cache_ttl {
        config.cache.ttl_seconds = ttl;
    }
    config.validate().context("Invalid configuration")?;

    let client = QuranClient::new(config).context("Failed to initialize client")?;
    let source = client.source_info();
    info!("Using {} API at {}", source.name, source.base_url);

    run(&client, args.command).await
}
