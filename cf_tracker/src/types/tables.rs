use chrono::NaiveDateTime;
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct BookmarkRow {
    pub id: i64,
    pub contest_id: Option<i32>,
    pub idx: String,
    pub name: String,
    pub rating: Option<i32>,
    pub tags: String, // JSON array
    pub url: String,
    pub created_at: NaiveDateTime,
}
