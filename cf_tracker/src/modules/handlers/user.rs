use crate::modules::{
    error::TrackerError,
    handlers::{split_tags, ValidatedQuery},
    service::TrackerService,
};
use axum::{
    extract::{Extension, Path},
    Json,
};
use cf_tracker_libs::{
    api::{Problem, Submission, UnattemptedQuery, UserInfo},
    ContestData,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use validator::Validate;

const DEFAULT_UNATTEMPTED_COUNT: usize = 10;

pub async fn user_info<A: ContestData + 'static>(
    Path(handle): Path<String>,
    Extension(service): Extension<Arc<TrackerService<A>>>,
) -> Result<Json<UserInfo>, TrackerError> {
    Ok(Json(service.user_info(&handle).await?))
}

pub async fn solved<A: ContestData + 'static>(
    Path(handle): Path<String>,
    Extension(service): Extension<Arc<TrackerService<A>>>,
) -> Result<Json<Value>, TrackerError> {
    let solved = service.solved_tokens(&handle).await?;
    Ok(Json(json!({ "solved": solved })))
}

pub async fn submissions<A: ContestData + 'static>(
    Path(handle): Path<String>,
    Extension(service): Extension<Arc<TrackerService<A>>>,
) -> Result<Json<Vec<Submission>>, TrackerError> {
    Ok(Json(service.submissions(&handle).await?))
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct UnattemptedParameters {
    #[validate(length(max = 1024))]
    pub tags: Option<String>,
    pub rating: Option<i32>,
    #[validate(range(min = 1, max = 100))]
    pub count: Option<usize>,
    pub random: Option<bool>,
}

impl UnattemptedParameters {
    pub fn to_query(&self) -> UnattemptedQuery {
        UnattemptedQuery {
            tags: split_tags(self.tags.as_deref()),
            rating: self.rating,
            count: self.count.unwrap_or(DEFAULT_UNATTEMPTED_COUNT),
            random: self.random.unwrap_or(false),
        }
    }
}

pub async fn unattempted<A: ContestData + 'static>(
    Path(handle): Path<String>,
    ValidatedQuery(params): ValidatedQuery<UnattemptedParameters>,
    Extension(service): Extension<Arc<TrackerService<A>>>,
) -> Result<Json<Vec<Problem>>, TrackerError> {
    let problems = service
        .unattempted_problems(&handle, &params.to_query())
        .await?;
    Ok(Json(problems))
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct FriendsParameters {
    pub only_online: Option<bool>,
}

pub async fn friends<A: ContestData + 'static>(
    ValidatedQuery(params): ValidatedQuery<FriendsParameters>,
    Extension(service): Extension<Arc<TrackerService<A>>>,
) -> Result<Json<Value>, TrackerError> {
    let friends = service
        .friends(params.only_online.unwrap_or(false))
        .await?;
    Ok(Json(json!({ "friends": friends })))
}
