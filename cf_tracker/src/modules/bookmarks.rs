use crate::{
    modules::migration::MIGRATOR,
    types::{
        bookmark::{Bookmark, NewBookmark},
        tables::BookmarkRow,
    },
};
use cf_tracker_libs::api::ProblemKey;
use sqlx::{sqlite::Sqlite, Pool};
use std::collections::HashSet;
use thiserror::Error;

type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("failed to run migrations: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("failed to convert tags: {0}")]
    TagsError(#[from] serde_json::Error),
}

/// Bookmarked problems persisted in SQLite.
///
/// Nothing prevents the same (contest_id, index) from being stored twice;
/// callers that want a single bookmark per problem must check first.
#[derive(Debug, Clone)]
pub struct BookmarkStore {
    pool: Pool<Sqlite>,
}

impl BookmarkStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Creates the schema if needed. Safe to call on every start.
    pub async fn initialize(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await?;
        tracing::info!("Bookmark schema is ready.");
        Ok(())
    }

    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// All bookmarks, most recent first.
    pub async fn list_bookmarks(&self) -> Result<Vec<Bookmark>> {
        let rows: Vec<BookmarkRow> = sqlx::query_as(
            r#"
            SELECT id, contest_id, idx, name, rating, tags, url, created_at
            FROM bookmarks
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let bookmarks = rows
            .into_iter()
            .map(Bookmark::try_from)
            .collect::<std::result::Result<Vec<Bookmark>, _>>()?;
        Ok(bookmarks)
    }

    pub async fn list_bookmarked_keys(&self) -> Result<HashSet<ProblemKey>> {
        let rows: Vec<(Option<i32>, String)> =
            sqlx::query_as("SELECT contest_id, idx FROM bookmarks")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(contest_id, index)| ProblemKey::new(contest_id, index))
            .collect())
    }

    pub async fn add_bookmark(&self, bookmark: &NewBookmark) -> Result<Bookmark> {
        let tags = serde_json::to_string(&bookmark.tags)?;

        let row: BookmarkRow = sqlx::query_as(
            r#"
            INSERT INTO bookmarks (contest_id, idx, name, rating, tags, url)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, contest_id, idx, name, rating, tags, url, created_at
            "#,
        )
        .bind(bookmark.contest_id)
        .bind(&bookmark.index)
        .bind(&bookmark.name)
        .bind(bookmark.rating)
        .bind(tags)
        .bind(&bookmark.url)
        .fetch_one(&self.pool)
        .await?;

        let bookmark = Bookmark::try_from(row)?;
        tracing::info!("Bookmark {} saved for problem {}.", bookmark.id, bookmark.key());
        Ok(bookmark)
    }

    /// Deletes every bookmark of the problem and reports whether any existed.
    pub async fn remove_bookmark(&self, contest_id: Option<i32>, index: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE contest_id IS ? AND idx = ?")
            .bind(contest_id)
            .bind(index)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected();
        if deleted > 0 {
            tracing::info!("{} bookmarks of {} deleted.", deleted, ProblemKey::new(contest_id, index));
        }
        Ok(deleted > 0)
    }
}
