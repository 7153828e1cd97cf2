use crate::{
    modules::{error::TrackerError, service::TrackerService},
    types::bookmark::{Bookmark, NewBookmark},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path,
    },
    http::StatusCode,
    Json,
};
use cf_tracker_libs::ContestData;
use serde_json::{json, Value};
use std::sync::Arc;
use validator::Validate;

pub async fn list_bookmarks<A: ContestData + 'static>(
    Extension(service): Extension<Arc<TrackerService<A>>>,
) -> Result<Json<Vec<Bookmark>>, TrackerError> {
    Ok(Json(service.bookmarks().await?))
}

pub async fn create_bookmark<A: ContestData + 'static>(
    Extension(service): Extension<Arc<TrackerService<A>>>,
    payload: Result<Json<NewBookmark>, JsonRejection>,
) -> Result<(StatusCode, Json<Bookmark>), TrackerError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::error!("Parsing error: {}", rejection);
        TrackerError::Validation(rejection.body_text())
    })?;

    payload.validate().map_err(|rejection| {
        tracing::error!("Validation error: {}", rejection);
        TrackerError::Validation(
            format!("Validation error: [{}]", rejection).replace('\n', ", "),
        )
    })?;

    let bookmark = service.add_bookmark(&payload).await?;
    Ok((StatusCode::CREATED, Json(bookmark)))
}

/// Parses the contest id segment, `null` addresses problems without a contest.
fn parse_contest_id(segment: &str) -> Result<Option<i32>, TrackerError> {
    if segment == "null" {
        return Ok(None);
    }

    segment.parse::<i32>().map(Some).map_err(|e| {
        TrackerError::Validation(format!("invalid contest id [{}]: {}", segment, e))
    })
}

pub async fn delete_bookmark<A: ContestData + 'static>(
    path: Result<Path<(String, String)>, PathRejection>,
    Extension(service): Extension<Arc<TrackerService<A>>>,
) -> Result<Json<Value>, TrackerError> {
    let Path((contest_id, index)) =
        path.map_err(|rejection| TrackerError::Validation(rejection.body_text()))?;
    let contest_id = parse_contest_id(&contest_id)?;

    service.remove_bookmark(contest_id, &index).await?;
    Ok(Json(json!({ "status": "deleted" })))
}
