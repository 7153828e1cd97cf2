use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};

const PROBLEM_URL_BASE: &str = "https://codeforces.com/problemset/problem";

/// Natural key of a problem across the catalog, submissions and bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProblemKey {
    pub contest_id: Option<i32>,
    pub index: String,
}

impl ProblemKey {
    pub fn new(contest_id: Option<i32>, index: impl Into<String>) -> Self {
        Self {
            contest_id,
            index: index.into(),
        }
    }

    pub fn url(&self) -> String {
        match self.contest_id {
            Some(contest_id) => format!("{}/{}/{}", PROBLEM_URL_BASE, contest_id, self.index),
            None => format!("{}/null/{}", PROBLEM_URL_BASE, self.index),
        }
    }
}

/// `{contest_id}_{index}`, a missing contest id renders as `null`.
impl fmt::Display for ProblemKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.contest_id {
            Some(contest_id) => write!(f, "{}_{}", contest_id, self.index),
            None => write!(f, "null_{}", self.index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub handle: String,
    pub rating: Option<i32>,
    pub max_rating: Option<i32>,
    pub rank: Option<String>,
    pub max_rank: Option<String>,
    pub avatar: Option<String>,
    pub contribution: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub contest_id: Option<i32>,
    pub index: String,
    pub name: String,
    pub rating: Option<i32>,
    pub tags: Vec<String>,
    pub url: String,
    pub solved_count: Option<i32>,
}

impl Problem {
    pub fn key(&self) -> ProblemKey {
        ProblemKey::new(self.contest_id, self.index.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemWithStatus {
    #[serde(flatten)]
    pub problem: Problem,
    pub is_solved: bool,
    pub is_bookmarked: bool,
}

impl ProblemWithStatus {
    pub fn new(
        problem: Problem,
        solved: &HashSet<ProblemKey>,
        bookmarked: &HashSet<ProblemKey>,
    ) -> Self {
        let key = problem.key();
        Self {
            is_solved: solved.contains(&key),
            is_bookmarked: bookmarked.contains(&key),
            problem,
        }
    }
}

/// Problem reference embedded in a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionProblem {
    pub contest_id: Option<i32>,
    pub index: String,
    pub name: String,
    pub rating: Option<i32>,
    pub tags: Vec<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub verdict: Option<String>,
    pub time_seconds: i64,
    pub language: Option<String>,
    pub problem: SubmissionProblem,
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        self.verdict.as_deref() == Some(ACCEPTED_VERDICT)
    }
}

pub const ACCEPTED_VERDICT: &str = "OK";

/// Inclusive rating bounds. A problem without a rating never matches once
/// either bound is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl RatingRange {
    pub fn new(min: Option<i32>, max: Option<i32>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, rating: Option<i32>) -> bool {
        if self.is_unbounded() {
            return true;
        }

        match rating {
            Some(rating) => {
                self.min.map_or(true, |min| min <= rating)
                    && self.max.map_or(true, |max| rating <= max)
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemFilter {
    pub tags: Vec<String>,
    pub rating: RatingRange,
}

impl ProblemFilter {
    pub fn matches_tags(&self, tags: &[String]) -> bool {
        self.tags.is_empty() || tags.iter().any(|tag| self.tags.contains(tag))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnattemptedQuery {
    pub tags: Vec<String>,
    pub rating: Option<i32>,
    pub count: usize,
    pub random: bool,
}

impl Default for UnattemptedQuery {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            rating: None,
            count: 10,
            random: false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn key_formats_as_token() {
        assert_eq!(ProblemKey::new(Some(1500), "C").to_string(), "1500_C");
        assert_eq!(ProblemKey::new(None, "A1").to_string(), "null_A1");
    }

    #[test]
    fn key_builds_problem_url() {
        assert_eq!(
            ProblemKey::new(Some(4), "A").url(),
            "https://codeforces.com/problemset/problem/4/A"
        );
    }

    #[test]
    fn index_with_underscore_keeps_url_shape() {
        assert_eq!(
            ProblemKey::new(Some(1), "B_2").url(),
            "https://codeforces.com/problemset/problem/1/B_2"
        );
    }

    #[test]
    fn rating_range_bounds_are_inclusive() {
        let range = RatingRange::new(Some(800), Some(900));
        assert!(!range.contains(Some(799)));
        assert!(range.contains(Some(800)));
        assert!(range.contains(Some(900)));
        assert!(!range.contains(Some(901)));
        assert!(!range.contains(None));
    }

    #[test]
    fn unrated_problems_pass_without_bounds() {
        let range = RatingRange::default();
        assert!(range.contains(None));
        assert!(!RatingRange::new(None, Some(3500)).contains(None));
    }

    #[test]
    fn tag_filter_requires_intersection() {
        let filter = ProblemFilter {
            tags: vec![String::from("dp"), String::from("greedy")],
            rating: RatingRange::default(),
        };
        assert!(filter.matches_tags(&[String::from("math"), String::from("dp")]));
        assert!(!filter.matches_tags(&[String::from("math")]));
        assert!(ProblemFilter::default().matches_tags(&[]));
    }

    #[test]
    fn serialize_problem_with_status_flat() {
        let problem = Problem {
            contest_id: Some(1),
            index: String::from("A"),
            name: String::from("Theatre Square"),
            rating: Some(1000),
            tags: vec![String::from("math")],
            url: ProblemKey::new(Some(1), "A").url(),
            solved_count: Some(10),
        };
        let solved = HashSet::from([ProblemKey::new(Some(1), "A")]);
        let item = ProblemWithStatus::new(problem, &solved, &HashSet::new());

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["contest_id"], 1);
        assert_eq!(value["is_solved"], true);
        assert_eq!(value["is_bookmarked"], false);
    }
}
