use crate::{cmd::connect_store, config::AppConfig};
use anyhow::{Context, Result};
use clap::Args;

#[derive(Debug, Args)]
pub struct MigrateArgs {}

pub async fn run(_args: MigrateArgs, config: &AppConfig) -> Result<()> {
    tracing::info!("Run migrations on {}", config.database_url);
    let store = connect_store(&config.database_url).await?;

    store.initialize().await.with_context(|| {
        let message = "failed to migrate bookmark database";
        tracing::error!(message);
        message
    })?;

    Ok(())
}
