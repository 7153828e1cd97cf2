use crate::types::tables::BookmarkRow;
use cf_tracker_libs::api::ProblemKey;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payload for creating a bookmark. Problem fields are copied as they are
/// at bookmark time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewBookmark {
    pub contest_id: Option<i32>,
    #[validate(length(min = 1))]
    pub index: String,
    pub name: String,
    pub rating: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(length(min = 1))]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub contest_id: Option<i32>,
    pub index: String,
    pub name: String,
    pub rating: Option<i32>,
    pub tags: Vec<String>,
    pub url: String,
    pub created_at: NaiveDateTime,
}

impl Bookmark {
    pub fn key(&self) -> ProblemKey {
        ProblemKey::new(self.contest_id, self.index.clone())
    }
}

impl TryFrom<BookmarkRow> for Bookmark {
    type Error = serde_json::Error;

    fn try_from(row: BookmarkRow) -> Result<Self, Self::Error> {
        Ok(Bookmark {
            id: row.id,
            contest_id: row.contest_id,
            index: row.idx,
            name: row.name,
            rating: row.rating,
            tags: serde_json::from_str(&row.tags)?,
            url: row.url,
            created_at: row.created_at,
        })
    }
}
