use crate::{
    api::*,
    codeforces::{
        client::{CodeforcesApi, CodeforcesError, Result},
        model::*,
    },
};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Page size used to pull a user's entire submission history in one call.
pub const SUBMISSION_HISTORY_LIMIT: u32 = 10000;

fn problem_key(problem: &RawProblem) -> ProblemKey {
    ProblemKey::new(problem.contest_id, problem.index.clone())
}

fn to_problem(problem: RawProblem, solved_count: Option<i32>) -> Problem {
    let url = problem_key(&problem).url();
    Problem {
        contest_id: problem.contest_id,
        index: problem.index,
        name: problem.name,
        rating: problem.rating,
        tags: problem.tags,
        url,
        solved_count,
    }
}

fn to_user_info(user: RawUser, requested: &str) -> UserInfo {
    let handle = if user.handle.is_empty() {
        requested.to_string()
    } else {
        user.handle
    };

    UserInfo {
        handle,
        rating: user.rating,
        max_rating: user.max_rating,
        rank: user.rank,
        max_rank: user.max_rank,
        avatar: user.title_photo.filter(|photo| !photo.is_empty()).or(user.avatar),
        contribution: user.contribution,
    }
}

fn to_submission(submission: RawSubmission) -> Submission {
    let url = problem_key(&submission.problem).url();
    let problem = submission.problem;
    Submission {
        id: submission.id,
        verdict: submission.verdict,
        time_seconds: submission.creation_time_seconds,
        language: submission.programming_language,
        problem: SubmissionProblem {
            contest_id: problem.contest_id,
            index: problem.index,
            name: problem.name,
            rating: problem.rating,
            tags: problem.tags,
            url,
        },
    }
}

/// Normalized views over the Codeforces API.
#[async_trait]
pub trait ContestData: CodeforcesApi {
    async fn get_user_info(&self, handle: &str) -> Result<UserInfo> {
        let user = self
            .fetch_user_info(handle)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                CodeforcesError::NotFoundError(format!(
                    "handles: User with handle {} not found",
                    handle
                ))
            })?;

        Ok(to_user_info(user, handle))
    }

    /// Keys of every problem the user has an accepted submission for.
    async fn get_user_solved(&self, handle: &str) -> Result<HashSet<ProblemKey>> {
        let submissions = self
            .fetch_user_status(handle, SUBMISSION_HISTORY_LIMIT)
            .await?;

        Ok(submissions
            .iter()
            .filter(|submission| submission.verdict.as_deref() == Some(ACCEPTED_VERDICT))
            .map(|submission| problem_key(&submission.problem))
            .collect())
    }

    /// Submissions in the platform's order, newest first.
    async fn get_user_submissions(&self, handle: &str) -> Result<Vec<Submission>> {
        let submissions = self
            .fetch_user_status(handle, SUBMISSION_HISTORY_LIMIT)
            .await?;

        Ok(submissions.into_iter().map(to_submission).collect())
    }

    async fn get_all_problems(&self, filter: &ProblemFilter) -> Result<Vec<Problem>> {
        let problemset = self.fetch_problemset(&filter.tags).await?;

        let solved_counts: HashMap<ProblemKey, i32> = problemset
            .problem_statistics
            .into_iter()
            .map(|stat| {
                (
                    ProblemKey::new(stat.contest_id, stat.index),
                    stat.solved_count.unwrap_or(0),
                )
            })
            .collect();

        let problems: Vec<Problem> = problemset
            .problems
            .into_iter()
            .filter(|problem| filter.rating.contains(problem.rating))
            .filter(|problem| filter.matches_tags(&problem.tags))
            .map(|problem| {
                let solved_count = solved_counts
                    .get(&problem_key(&problem))
                    .copied()
                    .unwrap_or(0);
                to_problem(problem, Some(solved_count))
            })
            .collect();

        tracing::info!("{} problems matched the filter {:?}", problems.len(), filter);

        Ok(problems)
    }

    /// Problems the user has never submitted to, whatever the verdict.
    async fn get_unattempted_problems(
        &self,
        handle: &str,
        query: &UnattemptedQuery,
    ) -> Result<Vec<Problem>> {
        let (problemset, submissions) = futures::try_join!(
            self.fetch_problemset(&query.tags),
            self.fetch_user_status(handle, SUBMISSION_HISTORY_LIMIT)
        )?;

        let attempted: HashSet<ProblemKey> = submissions
            .iter()
            .map(|submission| problem_key(&submission.problem))
            .collect();

        let filter = ProblemFilter {
            tags: query.tags.clone(),
            rating: RatingRange::default(),
        };
        let mut candidates: Vec<RawProblem> = problemset
            .problems
            .into_iter()
            .filter(|problem| query.rating.map_or(true, |rating| problem.rating == Some(rating)))
            .filter(|problem| filter.matches_tags(&problem.tags))
            .filter(|problem| !attempted.contains(&problem_key(problem)))
            .collect();

        if query.random {
            candidates.shuffle(&mut rand::thread_rng());
        }
        candidates.truncate(query.count);

        Ok(candidates
            .into_iter()
            .map(|problem| to_problem(problem, None))
            .collect())
    }

    /// Every tag in the catalog, sorted and de-duplicated.
    async fn get_all_tags(&self) -> Result<Vec<String>> {
        let problemset = self.fetch_problemset(&[]).await?;

        let tags: BTreeSet<String> = problemset
            .problems
            .into_iter()
            .flat_map(|problem| problem.tags)
            .collect();

        Ok(tags.into_iter().collect())
    }

    async fn get_user_friends(&self, only_online: bool) -> Result<Vec<String>> {
        if !self.is_authorized() {
            return Ok(Vec::new());
        }
        self.fetch_user_friends(only_online).await
    }
}

impl<T: CodeforcesApi> ContestData for T {}
