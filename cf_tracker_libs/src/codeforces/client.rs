use crate::codeforces::{
    model::*,
    signature::api_signature,
};
use async_trait::async_trait;
use itertools::Itertools;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::{sync::Semaphore, time::Duration};

pub type Result<T> = std::result::Result<T, CodeforcesError>;

/// Deadline for calls returning a single entity.
pub const SHORT_TIMEOUT: Duration = Duration::from_secs(10);
/// Deadline for catalog and history calls.
pub const BULK_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum CodeforcesError {
    #[error("{0}")]
    NotFoundError(String),
    #[error("{0}")]
    UpstreamError(String),
    #[error("failed to request to Codeforces API: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("failed to deserialize JSON data: {0}")]
    DeserializeError(#[from] serde_json::Error),
    #[error("invalid Codeforces API url given")]
    InvalidUrlError(#[from] url::ParseError),
}

/// Raw access to the Codeforces API methods this crate consumes.
#[async_trait]
pub trait CodeforcesApi: Send + Sync {
    async fn fetch_user_info(&self, handle: &str) -> Result<Vec<RawUser>>;
    async fn fetch_user_status(&self, handle: &str, count: u32) -> Result<Vec<RawSubmission>>;
    async fn fetch_problemset(&self, tags: &[String]) -> Result<RawProblemset>;
    async fn fetch_user_friends(&self, only_online: bool) -> Result<Vec<String>>;

    /// Whether signed methods can be called at all.
    fn is_authorized(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeforcesConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub workers: usize,
    pub short_timeout: Duration,
    pub bulk_timeout: Duration,
}

impl Default for CodeforcesConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://codeforces.com"),
            api_key: None,
            api_secret: None,
            workers: 4,
            short_timeout: SHORT_TIMEOUT,
            bulk_timeout: BULK_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
struct Credentials {
    key: String,
    secret: String,
}

pub struct CodeforcesClient {
    base_url: Url,
    credentials: Option<Credentials>,
    client: Client,
    permits: Semaphore,
    short_timeout: Duration,
    bulk_timeout: Duration,
}

impl CodeforcesClient {
    pub fn new(config: &CodeforcesConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url)?;
        base_url.set_path("");

        let credentials = match (&config.api_key, &config.api_secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some(Credentials {
                    key: key.clone(),
                    secret: secret.clone(),
                })
            }
            _ => None,
        };

        let client = Client::builder().gzip(true).build()?;

        Ok(CodeforcesClient {
            base_url,
            credentials,
            client,
            permits: Semaphore::new(config.workers.max(1)),
            short_timeout: config.short_timeout,
            bulk_timeout: config.bulk_timeout,
        })
    }

    /// Calls one API method and unwraps the response envelope.
    ///
    /// At most `workers` calls are in flight at once, the rest wait for a permit.
    async fn call<T>(&self, method: &str, params: &[(String, String)], timeout: Duration) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.base_url.join(&format!("api/{}", method))?;
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| CodeforcesError::UpstreamError(e.to_string()))?;

        tracing::debug!("call Codeforces API method {}", method);
        let res = self
            .client
            .get(url)
            .query(params)
            .timeout(timeout)
            .send()
            .await?;
        let status = res.status();
        let body = res.bytes().await?;

        match serde_json::from_slice::<CodeforcesResponse<T>>(&body) {
            Ok(response) => unwrap_response(method, response),
            Err(e) if status.is_success() => {
                tracing::error!("failed to deserialize response of {}: {:?}", method, e);
                Err(CodeforcesError::DeserializeError(e))
            }
            Err(_) => {
                let message = format!("unexpected status [{}] from {}", status, method);
                tracing::error!(message);
                Err(CodeforcesError::UpstreamError(message))
            }
        }
    }
}

fn unwrap_response<T>(method: &str, response: CodeforcesResponse<T>) -> Result<T> {
    if response.status == "OK" {
        return response.result.ok_or_else(|| {
            CodeforcesError::UpstreamError(format!("{} returned no result", method))
        });
    }

    let comment = response
        .comment
        .unwrap_or_else(|| String::from("Unknown error"));
    tracing::warn!("Codeforces API method {} failed: {}", method, comment);

    if comment.to_lowercase().contains("not found") {
        Err(CodeforcesError::NotFoundError(comment))
    } else {
        Err(CodeforcesError::UpstreamError(comment))
    }
}

#[async_trait]
impl CodeforcesApi for CodeforcesClient {
    async fn fetch_user_info(&self, handle: &str) -> Result<Vec<RawUser>> {
        let params = [(String::from("handles"), handle.to_string())];
        self.call("user.info", &params, self.short_timeout).await
    }

    async fn fetch_user_status(&self, handle: &str, count: u32) -> Result<Vec<RawSubmission>> {
        let params = [
            (String::from("handle"), handle.to_string()),
            (String::from("from"), String::from("1")),
            (String::from("count"), count.to_string()),
        ];
        self.call("user.status", &params, self.bulk_timeout).await
    }

    async fn fetch_problemset(&self, tags: &[String]) -> Result<RawProblemset> {
        let mut params = vec![];
        if !tags.is_empty() {
            params.push((String::from("tags"), tags.iter().join(";")));
        }
        self.call("problemset.problems", &params, self.bulk_timeout).await
    }

    async fn fetch_user_friends(&self, only_online: bool) -> Result<Vec<String>> {
        let credentials = match &self.credentials {
            Some(credentials) => credentials,
            None => {
                tracing::info!("API key and secret are not configured, skip user.friends");
                return Ok(Vec::new());
            }
        };

        let method = "user.friends";
        let mut params = vec![
            (String::from("apiKey"), credentials.key.clone()),
            (String::from("time"), chrono::Utc::now().timestamp().to_string()),
            (String::from("onlyOnline"), only_online.to_string()),
        ];
        let signature = api_signature(
            &mut rand::thread_rng(),
            method,
            &params,
            &credentials.secret,
        );
        params.push((String::from("apiSig"), signature));

        self.call(method, &params, self.short_timeout).await
    }

    fn is_authorized(&self) -> bool {
        self.credentials.is_some()
    }
}
