use crate::filter::PostFilter;
use crate::types::{
    ApiConfig, Post, PostDraft, PostPatch, Result, Status, TrackerError,
};
use async_trait::async_trait;
use backoff::backoff::Backoff;
use backoff::exponential::ExponentialBackoff;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

/// Post as it travels on the wire. Enum-valued fields are plain strings
/// here; converting to [`Post`] is the integrity boundary where unknown
/// values are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub platform: String,
    pub content_type: String,
    pub status: String,
    pub priority: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub hook: String,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub cta: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub scheduled_at: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub script_final: bool,
    #[serde(default)]
    pub thumbnail_done: bool,
    #[serde(default)]
    pub captions_finalized: bool,
    #[serde(default)]
    pub hashtags_added: bool,
    #[serde(default)]
    pub exported: bool,
    #[serde(default)]
    pub uploaded: bool,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl TryFrom<PostRecord> for Post {
    type Error = TrackerError;

    fn try_from(record: PostRecord) -> Result<Post> {
        fn integrity(id: &str, detail: String) -> TrackerError {
            TrackerError::Integrity {
                id: id.to_string(),
                detail,
            }
        }

        let id = Uuid::parse_str(&record.id)
            .map_err(|e| integrity(&record.id, format!("bad id: {}", e)))?;
        let platform = record.platform.parse().map_err(|e| integrity(&record.id, e))?;
        let content_type = record
            .content_type
            .parse()
            .map_err(|e| integrity(&record.id, e))?;
        let status = record.status.parse().map_err(|e| integrity(&record.id, e))?;
        let priority = record.priority.parse().map_err(|e| integrity(&record.id, e))?;
        let created_at = parse_timestamp(&record.created_at).ok_or_else(|| {
            integrity(&record.id, format!("bad created_at: {}", record.created_at))
        })?;
        let updated_at = record
            .updated_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(created_at);

        Ok(Post {
            id,
            title: record.title,
            description: record.description,
            platform,
            content_type,
            status,
            priority,
            tags: record.tags,
            hook: record.hook,
            script: record.script,
            cta: record.cta,
            caption: record.caption,
            hashtags: record.hashtags,
            scheduled_at: record.scheduled_at.as_deref().and_then(parse_date),
            published_at: record.published_at.as_deref().and_then(parse_date),
            script_final: record.script_final,
            thumbnail_done: record.thumbnail_done,
            captions_finalized: record.captions_finalized,
            hashtags_added: record.hashtags_added,
            exported: record.exported,
            uploaded: record.uploaded,
            created_at,
            updated_at,
        })
    }
}

impl From<&Post> for PostRecord {
    fn from(post: &Post) -> Self {
        PostRecord {
            id: post.id.to_string(),
            title: post.title.clone(),
            description: post.description.clone(),
            platform: post.platform.to_string(),
            content_type: post.content_type.to_string(),
            status: post.status.to_string(),
            priority: post.priority.to_string(),
            tags: post.tags.clone(),
            hook: post.hook.clone(),
            script: post.script.clone(),
            cta: post.cta.clone(),
            caption: post.caption.clone(),
            hashtags: post.hashtags.clone(),
            scheduled_at: post.scheduled_at.map(|d| d.to_string()),
            published_at: post.published_at.map(|d| d.to_string()),
            script_final: post.script_final,
            thumbnail_done: post.thumbnail_done,
            captions_finalized: post.captions_finalized,
            hashtags_added: post.hashtags_added,
            exported: post.exported,
            uploaded: post.uploaded,
            created_at: post.created_at.to_rfc3339(),
            updated_at: Some(post.updated_at.to_rfc3339()),
        }
    }
}

/// Stored dates arrive either as full RFC 3339 timestamps or as bare
/// `YYYY-MM-DD` strings; calendar placement only cares about the date.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    NaiveDate::from_str(raw).ok()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .ok()
}

/// Server-computed dashboard summary, mirrored from `GET /api/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStats {
    pub total: i64,
    pub ideas: i64,
    pub in_progress: i64,
    pub ready: i64,
    pub published: i64,
    #[serde(default)]
    pub by_platform: HashMap<String, i64>,
    #[serde(default)]
    pub by_status: HashMap<String, i64>,
}

/// Storage/API collaborator contract. The board talks to storage only
/// through this trait, so tests run against an in-memory implementation.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<PostRecord>>;
    async fn get_post(&self, id: Uuid) -> Result<PostRecord>;
    async fn create_post(&self, draft: &PostDraft) -> Result<PostRecord>;
    async fn update_post(&self, id: Uuid, patch: &PostPatch) -> Result<PostRecord>;
    async fn delete_post(&self, id: Uuid) -> Result<()>;
    /// Confirmation call for an optimistic stage transition.
    async fn set_status(&self, id: Uuid, status: Status) -> Result<()>;
    async fn stats(&self) -> Result<ServerStats>;
    async fn tags(&self) -> Result<Vec<String>>;
    async fn health(&self) -> Result<bool>;
}

/// Authorization gate injected by the caller. The board refuses every
/// operation before any local mutation when the gate says no.
pub trait AccessGate: Send + Sync {
    fn is_authorized(&self) -> bool;
}

/// Authorized exactly when a bearer token is held.
pub struct TokenGate {
    token: Option<String>,
}

impl TokenGate {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

impl AccessGate for TokenGate {
    fn is_authorized(&self) -> bool {
        self.token.is_some()
    }
}

/// Always-open gate for local/offline use.
pub struct OpenGate;

impl AccessGate for OpenGate {
    fn is_authorized(&self) -> bool {
        true
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: Option<String>,
    message: Option<String>,
}

/// HTTP implementation of [`RemoteStore`] against the tracker API.
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
            config,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut request = self.client.request(method, url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(Self::api_error(response).await)
    }

    async fn api_error(response: reqwest::Response) -> TrackerError {
        let status = response.status();
        let message = match response.json::<ApiErrorBody>().await {
            Ok(body) => body
                .detail
                .or(body.message)
                .unwrap_or_else(|| status.to_string()),
            Err(_) => status.to_string(),
        };
        TrackerError::Api {
            status: status.as_u16(),
            message,
        }
    }

    /// GET with exponential-backoff retries. Only used for idempotent
    /// reads; status confirmations go out exactly once.
    async fn get_with_retry<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds * 16),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(self.config.retry_delay_seconds * 60)),
            ..Default::default()
        };

        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            match self.request(Method::GET, url.clone()).send().await {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.json::<T>().await?);
                }
                Ok(response) => {
                    // Client errors will not heal on retry.
                    if response.status().is_client_error() {
                        return Err(Self::api_error(response).await);
                    }
                    last_error = Some(Self::api_error(response).await);
                }
                Err(e) => {
                    last_error = Some(TrackerError::Http(e));
                }
            }
            if attempt < self.config.max_retries {
                if let Some(delay) = backoff.next_backoff() {
                    warn!("GET {} attempt {} failed, retrying in {:?}", url, attempt + 1, delay);
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| TrackerError::Api {
            status: 0,
            message: "request failed".to_string(),
        }))
    }
}

#[async_trait]
impl RemoteStore for ApiClient {
    async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<PostRecord>> {
        let mut url = self.endpoint("/api/posts")?;
        for (key, value) in filter.to_query() {
            url.query_pairs_mut().append_pair(key, &value);
        }
        debug!("Listing posts: {}", url);
        self.get_with_retry(url).await
    }

    async fn get_post(&self, id: Uuid) -> Result<PostRecord> {
        let url = self.endpoint(&format!("/api/posts/{}", id))?;
        match self.get_with_retry::<PostRecord>(url).await {
            Err(TrackerError::Api { status: 404, .. }) => Err(TrackerError::NotFound { id }),
            other => other,
        }
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<PostRecord> {
        let url = self.endpoint("/api/posts")?;
        let response = self.request(Method::POST, url).json(draft).send().await?;
        Ok(self.check(response).await?.json().await?)
    }

    async fn update_post(&self, id: Uuid, patch: &PostPatch) -> Result<PostRecord> {
        let url = self.endpoint(&format!("/api/posts/{}", id))?;
        let response = self.request(Method::PUT, url).json(patch).send().await?;
        match self.check(response).await {
            Err(TrackerError::Api { status: 404, .. }) => Err(TrackerError::NotFound { id }),
            Err(e) => Err(e),
            Ok(response) => Ok(response.json().await?),
        }
    }

    async fn delete_post(&self, id: Uuid) -> Result<()> {
        let url = self.endpoint(&format!("/api/posts/{}", id))?;
        let response = self.request(Method::DELETE, url).send().await?;
        match self.check(response).await {
            Err(TrackerError::Api { status: 404, .. }) => Err(TrackerError::NotFound { id }),
            Err(e) => Err(e),
            Ok(_) => Ok(()),
        }
    }

    async fn set_status(&self, id: Uuid, status: Status) -> Result<()> {
        let mut url = self.endpoint(&format!("/api/posts/{}/status", id))?;
        url.query_pairs_mut().append_pair("status", status.as_str());
        // Deliberately no retry: a failed confirmation is reported and the
        // optimistic change rolled back, re-attempting is the user's call.
        let response = self.request(Method::PATCH, url).send().await?;
        match self.check(response).await {
            Err(TrackerError::Api { status: 404, .. }) => Err(TrackerError::NotFound { id }),
            Err(e) => Err(e),
            Ok(_) => Ok(()),
        }
    }

    async fn stats(&self) -> Result<ServerStats> {
        let url = self.endpoint("/api/stats")?;
        self.get_with_retry(url).await
    }

    async fn tags(&self) -> Result<Vec<String>> {
        let url = self.endpoint("/api/tags")?;
        self.get_with_retry(url).await
    }

    async fn health(&self) -> Result<bool> {
        let url = self.endpoint("/api/health")?;
        let response = self.request(Method::GET, url).send().await?;
        Ok(response.status().is_success())
    }
}
