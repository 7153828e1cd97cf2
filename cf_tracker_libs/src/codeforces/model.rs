use serde::{Deserialize, Serialize};

/// Envelope wrapping every Codeforces API response.
#[derive(Serialize, Deserialize, Debug)]
pub struct CodeforcesResponse<T> {
    pub status: String,
    pub comment: Option<String>,
    pub result: Option<T>,
}

impl<T> CodeforcesResponse<T> {
    pub fn ok(result: T) -> Self {
        Self {
            status: String::from("OK"),
            comment: None,
            result: Some(result),
        }
    }

    pub fn failed(comment: impl ToString) -> Self {
        Self {
            status: String::from("FAILED"),
            comment: Some(comment.to_string()),
            result: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    pub handle: String,
    pub rating: Option<i32>,
    pub max_rating: Option<i32>,
    pub rank: Option<String>,
    pub max_rank: Option<String>,
    pub avatar: Option<String>,
    pub title_photo: Option<String>,
    pub contribution: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawProblem {
    pub contest_id: Option<i32>,
    pub problemset_name: Option<String>,
    #[serde(default)]
    pub index: String,
    #[serde(default)]
    pub name: String,
    pub rating: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawProblemStatistics {
    pub contest_id: Option<i32>,
    #[serde(default)]
    pub index: String,
    pub solved_count: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawProblemset {
    pub problems: Vec<RawProblem>,
    #[serde(default)]
    pub problem_statistics: Vec<RawProblemStatistics>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawSubmission {
    pub id: i64,
    pub verdict: Option<String>,
    #[serde(default)]
    pub creation_time_seconds: i64,
    pub programming_language: Option<String>,
    #[serde(default)]
    pub problem: RawProblem,
}
