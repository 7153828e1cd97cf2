pub mod migrate;
pub mod recommend;
pub mod server;

use crate::modules::bookmarks::BookmarkStore;
use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Opens the bookmark database, creating the file when it does not exist yet.
pub async fn connect_store(database_url: &str) -> Result<BookmarkStore> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| {
            let message = format!("invalid DATABASE_URL: {}", database_url);
            tracing::error!(message);
            message
        })?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| {
            let message = "Failed to create database connection pool.";
            tracing::error!(message);
            message
        })?;

    Ok(BookmarkStore::new(pool))
}
