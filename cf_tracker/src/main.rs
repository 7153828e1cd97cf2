mod cmd;
mod config;
mod modules;
mod types;

use crate::{
    cmd::{
        migrate::{self, MigrateArgs},
        recommend::{self, RecommendArgs},
        server::{self, ServerArgs},
    },
    config::AppConfig,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::{env, str::FromStr};
use tokio::runtime::Builder;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{self, time::OffsetTime},
};

#[derive(Debug, Parser)]
#[command(name = "cf_tracker")]
#[command(about = "Codeforces personal tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the HTTP API.
    Server(ServerArgs),
    /// Create or upgrade the bookmark schema.
    Migrate(MigrateArgs),
    /// Print problems a handle has never submitted to.
    Recommend(RecommendArgs),
}

fn main() -> Result<()> {
    dotenv().ok();

    let log_level = env::var("RUST_LOG").unwrap_or(String::from("info"));
    let filter = EnvFilter::builder()
        .with_default_directive(
            LevelFilter::from_str(&log_level)
                .unwrap_or(LevelFilter::INFO)
                .into(),
        )
        .from_env_lossy();
    let format = fmt::format()
        .with_level(true)
        .with_target(true)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_timer(OffsetTime::local_rfc_3339().context("couldn't determine local time offset")?);
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(format)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let config = AppConfig::from_env()?;
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    match Cli::parse().command {
        Commands::Server(args) => runtime.block_on(server::run(args, &config)),
        Commands::Migrate(args) => runtime.block_on(migrate::run(args, &config)),
        Commands::Recommend(args) => runtime.block_on(recommend::run(args, &config)),
    }
    .context("command failed")
}
