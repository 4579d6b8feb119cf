use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tweetcard::{app, config::Config, logging};

#[derive(Parser)]
#[command(name = "tweetcard")]
#[command(about = "Read, like, retweet and reply to tweets in the terminal")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Act as this user
    #[arg(short, long)]
    user: Option<String>,

    /// Load tweets from a JSON file instead of the demo feed
    #[arg(short, long)]
    feed: Option<PathBuf>,

    /// Simulated service latency in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Start on the detail view of this tweet
    #[arg(long, value_name = "ID")]
    open: Option<String>,

    /// Do not capture the mouse
    #[arg(long)]
    no_mouse: bool,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config.or_else(Config::default_path) {
        Some(path) => path,
        None => anyhow::bail!("could not determine a config directory, pass --config"),
    };

    if cli.init_config {
        if config_path.exists() {
            println!("Config already exists at {}", config_path.display());
        } else {
            Config::write_default(&config_path)?;
            println!("Wrote default config to {}", config_path.display());
        }
        return Ok(());
    }

    let mut config = Config::load(&config_path)?;
    if let Some(user) = cli.user {
        config.username = user;
    }
    if let Some(feed) = cli.feed {
        config.feed_path = Some(feed);
    }
    if let Some(latency_ms) = cli.latency_ms {
        config.latency_ms = latency_ms;
    }
    if cli.no_mouse {
        config.mouse = false;
    }

    logging::init(config.log_path().as_deref()).context("failed to set up logging")?;
    tracing::info!(config = %config_path.display(), "loaded config");

    app::launch(config, cli.open).await
}
