use crate::modules::{
    error::TrackerError,
    handlers::{split_tags, ValidatedQuery},
    service::{ProblemPage, TrackerService, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
};
use axum::{extract::Extension, Json};
use cf_tracker_libs::{
    api::{ProblemFilter, ProblemWithStatus, RatingRange},
    ContestData,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::time::Instant;
use validator::Validate;

#[derive(Debug, Default, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct ProblemListParameters {
    #[validate(length(max = 64))]
    pub handle: Option<String>,
    #[validate(length(max = 1024))]
    pub tags: Option<String>,
    pub min_rating: Option<i32>,
    pub max_rating: Option<i32>,
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 500))]
    pub page_size: Option<usize>,
}

impl ProblemListParameters {
    pub fn filter(&self) -> ProblemFilter {
        ProblemFilter {
            tags: split_tags(self.tags.as_deref()),
            rating: RatingRange::new(self.min_rating, self.max_rating),
        }
    }

    pub fn to_page(&self) -> ProblemPage {
        ProblemPage {
            handle: self.handle.clone(),
            filter: self.filter(),
            page: self.page.unwrap_or(1),
            page_size: self
                .page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .min(MAX_PAGE_SIZE),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct ProblemCountParameters {
    #[validate(length(max = 1024))]
    pub tags: Option<String>,
    pub min_rating: Option<i32>,
    pub max_rating: Option<i32>,
}

impl ProblemCountParameters {
    pub fn filter(&self) -> ProblemFilter {
        ProblemFilter {
            tags: split_tags(self.tags.as_deref()),
            rating: RatingRange::new(self.min_rating, self.max_rating),
        }
    }
}

pub async fn list_problems<A: ContestData + 'static>(
    ValidatedQuery(params): ValidatedQuery<ProblemListParameters>,
    Extension(service): Extension<Arc<TrackerService<A>>>,
) -> Result<Json<Vec<ProblemWithStatus>>, TrackerError> {
    let start_process = Instant::now();

    let items = service.list_problems(&params.to_page()).await?;

    let time = Instant::now().duration_since(start_process).as_millis();
    tracing::info!(
        target: "querylog",
        "elapsed_time={} hits={} params={}",
        time, items.len(), serde_json::to_string(&params).unwrap_or(String::from(""))
    );

    Ok(Json(items))
}

pub async fn count_problems<A: ContestData + 'static>(
    ValidatedQuery(params): ValidatedQuery<ProblemCountParameters>,
    Extension(service): Extension<Arc<TrackerService<A>>>,
) -> Result<Json<Value>, TrackerError> {
    let count = service.count_problems(&params.filter()).await?;
    Ok(Json(json!({ "count": count })))
}

pub async fn tags<A: ContestData + 'static>(
    Extension(service): Extension<Arc<TrackerService<A>>>,
) -> Result<Json<Value>, TrackerError> {
    let tags = service.tags().await?;
    Ok(Json(json!({ "tags": tags })))
}
