use crate::modules::bookmarks::BookmarkStore;
use async_trait::async_trait;
use cf_tracker_libs::{
    codeforces::{client::Result, model::*},
    CodeforcesApi, CodeforcesError,
};
use sqlx::sqlite::SqlitePoolOptions;
use std::collections::HashMap;

/// In-memory stand-in for the Codeforces API.
#[derive(Debug, Default)]
pub struct FakeCodeforces {
    pub problems: Vec<RawProblem>,
    pub submissions: HashMap<String, Vec<RawSubmission>>,
    pub problemset_down: bool,
}

impl FakeCodeforces {
    pub fn with_problems(problems: Vec<RawProblem>) -> Self {
        Self {
            problems,
            ..Default::default()
        }
    }

    pub fn submit(mut self, handle: &str, problem: RawProblem, verdict: &str) -> Self {
        let submissions = self.submissions.entry(handle.to_string()).or_default();
        let sequence = submissions.len() as i64;
        submissions.insert(
            0,
            RawSubmission {
                id: sequence + 1,
                verdict: Some(verdict.to_string()),
                creation_time_seconds: 1_700_000_000 + sequence,
                programming_language: Some(String::from("Rust 2021")),
                problem,
            },
        );
        self
    }
}

#[async_trait]
impl CodeforcesApi for FakeCodeforces {
    async fn fetch_user_info(&self, handle: &str) -> Result<Vec<RawUser>> {
        if !self.submissions.contains_key(handle) {
            return Err(CodeforcesError::NotFoundError(format!(
                "handles: User with handle {} not found",
                handle
            )));
        }
        Ok(vec![RawUser {
            handle: handle.to_string(),
            rating: Some(1500),
            ..Default::default()
        }])
    }

    async fn fetch_user_status(&self, handle: &str, _count: u32) -> Result<Vec<RawSubmission>> {
        self.submissions.get(handle).cloned().ok_or_else(|| {
            CodeforcesError::NotFoundError(format!("handle: User with handle {} not found", handle))
        })
    }

    async fn fetch_problemset(&self, _tags: &[String]) -> Result<RawProblemset> {
        if self.problemset_down {
            return Err(CodeforcesError::UpstreamError(String::from(
                "Call limit exceeded",
            )));
        }
        Ok(RawProblemset {
            problems: self.problems.clone(),
            problem_statistics: vec![],
        })
    }

    async fn fetch_user_friends(&self, _only_online: bool) -> Result<Vec<String>> {
        Ok(vec![])
    }
}

pub fn raw_problem(contest_id: i32, index: &str, rating: Option<i32>, tags: &[&str]) -> RawProblem {
    RawProblem {
        contest_id: Some(contest_id),
        index: index.to_string(),
        name: format!("Problem {}{}", contest_id, index),
        rating,
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        ..Default::default()
    }
}

/// Initialized store on a private in-memory database.
pub async fn memory_store() -> BookmarkStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = BookmarkStore::new(pool);
    store.initialize().await.unwrap();
    store
}
