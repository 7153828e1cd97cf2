pub mod bookmark;
pub mod problem;
pub mod user;

use crate::modules::{error::TrackerError, service::TrackerService};
use axum::{
    async_trait,
    extract::{Extension, FromRequestParts},
    http::StatusCode,
    Json,
};
use cf_tracker_libs::ContestData;
use http::request::Parts;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Client-side hints served by `/api/config`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigResponse {
    pub default_handle: String,
}

pub async fn get_config(Extension(config): Extension<Arc<ConfigResponse>>) -> Json<ConfigResponse> {
    Json(config.as_ref().clone())
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

pub async fn readiness<A: ContestData + 'static>(
    Extension(service): Extension<Arc<TrackerService<A>>>,
) -> StatusCode {
    match service.store().ping().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::error!("bookmark store is not available: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Splits a comma separated `tags` parameter, dropping blanks.
pub fn split_tags(tags: Option<&str>) -> Vec<String> {
    tags.map(|tags| {
        tags.split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// Query string decoded with serde_urlencoded and checked with validator.
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = TrackerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let value: T = serde_urlencoded::from_str(query).map_err(|rejection| {
            tracing::error!("Parsing error: {}", rejection);
            TrackerError::Validation(format!("invalid format query string: [{}]", rejection))
        })?;

        value.validate().map_err(|rejection| {
            tracing::error!("Validation error: {}", rejection);
            TrackerError::Validation(
                format!("Validation error: [{}]", rejection).replace('\n', ", "),
            )
        })?;

        Ok(ValidatedQuery(value))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tags_are_split_on_comma() {
        assert_eq!(
            split_tags(Some("dp, greedy,,math ")),
            vec![
                String::from("dp"),
                String::from("greedy"),
                String::from("math")
            ]
        );
        assert!(split_tags(Some("")).is_empty());
        assert!(split_tags(None).is_empty());
    }
}
