use crate::{
    modules::{bookmarks::BookmarkStore, error::TrackerError},
    types::bookmark::{Bookmark, NewBookmark},
};
use cf_tracker_libs::{
    api::{Problem, ProblemFilter, ProblemKey, ProblemWithStatus, Submission, UnattemptedQuery, UserInfo},
    ContestData,
};
use std::collections::HashSet;

type Result<T> = std::result::Result<T, TrackerError>;

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 500;

/// One page of the problem listing, `page` starts at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemPage {
    pub handle: Option<String>,
    pub filter: ProblemFilter,
    pub page: usize,
    pub page_size: usize,
}

impl Default for ProblemPage {
    fn default() -> Self {
        Self {
            handle: None,
            filter: ProblemFilter::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Stable sort by ascending rating, unrated problems last.
pub fn sort_by_rating(problems: &mut [Problem]) {
    problems.sort_by_key(|problem| (problem.rating.is_none(), problem.rating.unwrap_or(0)));
}

pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Vec<T> {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    items.into_iter().skip(start).take(page_size).collect()
}

/// Joins the Codeforces data with local bookmarks.
pub struct TrackerService<A> {
    api: A,
    store: BookmarkStore,
}

impl<A: ContestData> TrackerService<A> {
    pub fn new(api: A, store: BookmarkStore) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &BookmarkStore {
        &self.store
    }

    /// Solved keys of `handle`, or nothing when the lookup fails.
    async fn solved_or_empty(&self, handle: Option<&str>) -> HashSet<ProblemKey> {
        let handle = match handle.map(str::trim) {
            Some(handle) if !handle.is_empty() => handle,
            _ => return HashSet::new(),
        };

        match self.api.get_user_solved(handle).await {
            Ok(solved) => solved,
            Err(e) => {
                tracing::warn!("ignore solved problems of {} cause: {}", handle, e);
                HashSet::new()
            }
        }
    }

    pub async fn list_problems(&self, query: &ProblemPage) -> Result<Vec<ProblemWithStatus>> {
        let (problems, solved, bookmarked) = tokio::join!(
            self.api.get_all_problems(&query.filter),
            self.solved_or_empty(query.handle.as_deref()),
            self.store.list_bookmarked_keys(),
        );
        let mut problems = problems?;
        let bookmarked = bookmarked?;

        sort_by_rating(&mut problems);
        let page_size = query.page_size.clamp(1, MAX_PAGE_SIZE);

        Ok(paginate(problems, query.page.max(1), page_size)
            .into_iter()
            .map(|problem| ProblemWithStatus::new(problem, &solved, &bookmarked))
            .collect())
    }

    pub async fn count_problems(&self, filter: &ProblemFilter) -> Result<usize> {
        Ok(self.api.get_all_problems(filter).await?.len())
    }

    pub async fn user_info(&self, handle: &str) -> Result<UserInfo> {
        Ok(self.api.get_user_info(handle).await?)
    }

    /// Solved problems as sorted `{contest_id}_{index}` tokens.
    pub async fn solved_tokens(&self, handle: &str) -> Result<Vec<String>> {
        let mut keys: Vec<ProblemKey> = self.api.get_user_solved(handle).await?.into_iter().collect();
        keys.sort();
        Ok(keys.iter().map(ProblemKey::to_string).collect())
    }

    pub async fn submissions(&self, handle: &str) -> Result<Vec<Submission>> {
        Ok(self.api.get_user_submissions(handle).await?)
    }

    pub async fn unattempted_problems(
        &self,
        handle: &str,
        query: &UnattemptedQuery,
    ) -> Result<Vec<Problem>> {
        Ok(self.api.get_unattempted_problems(handle, query).await?)
    }

    pub async fn tags(&self) -> Result<Vec<String>> {
        Ok(self.api.get_all_tags().await?)
    }

    pub async fn friends(&self, only_online: bool) -> Result<Vec<String>> {
        Ok(self.api.get_user_friends(only_online).await?)
    }

    pub async fn bookmarks(&self) -> Result<Vec<Bookmark>> {
        Ok(self.store.list_bookmarks().await?)
    }

    pub async fn add_bookmark(&self, bookmark: &NewBookmark) -> Result<Bookmark> {
        Ok(self.store.add_bookmark(bookmark).await?)
    }

    pub async fn remove_bookmark(&self, contest_id: Option<i32>, index: &str) -> Result<()> {
        if self.store.remove_bookmark(contest_id, index).await? {
            Ok(())
        } else {
            Err(TrackerError::NotFound(String::from("Bookmark not found")))
        }
    }
}
