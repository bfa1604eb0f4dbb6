use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Publishing platform a post is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Youtube,
    Linkedin,
    Twitter,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Instagram,
        Platform::Youtube,
        Platform::Linkedin,
        Platform::Twitter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Youtube => "youtube",
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "instagram" => Ok(Platform::Instagram),
            "youtube" => Ok(Platform::Youtube),
            "linkedin" => Ok(Platform::Linkedin),
            "twitter" => Ok(Platform::Twitter),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Format of the content being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Reel,
    Carousel,
    Static,
    Video,
    Thread,
    Short,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Reel => "reel",
            ContentType::Carousel => "carousel",
            ContentType::Static => "static",
            ContentType::Video => "video",
            ContentType::Thread => "thread",
            ContentType::Short => "short",
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "reel" => Ok(ContentType::Reel),
            "carousel" => Ok(ContentType::Carousel),
            "static" => Ok(ContentType::Static),
            "video" => Ok(ContentType::Video),
            "thread" => Ok(ContentType::Thread),
            "short" => Ok(ContentType::Short),
            other => Err(format!("unknown content type: {}", other)),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Pipeline stage. The ordering is the board's column order; it is used for
/// display sequencing only. Any stage-to-stage transition is legal, including
/// backward moves, since items get bounced back in real editorial workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idea,
    Scripted,
    Shooting,
    Editing,
    Review,
    Ready,
    Published,
}

impl Status {
    pub const ALL: [Status; 7] = [
        Status::Idea,
        Status::Scripted,
        Status::Shooting,
        Status::Editing,
        Status::Review,
        Status::Ready,
        Status::Published,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Idea => "idea",
            Status::Scripted => "scripted",
            Status::Shooting => "shooting",
            Status::Editing => "editing",
            Status::Review => "review",
            Status::Ready => "ready",
            Status::Published => "published",
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "idea" => Ok(Status::Idea),
            "scripted" => Ok(Status::Scripted),
            "shooting" => Ok(Status::Shooting),
            "editing" => Ok(Status::Editing),
            "review" => Ok(Status::Review),
            "ready" => Ok(Status::Ready),
            "published" => Ok(Status::Published),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A content item moving through the editorial pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub platform: Platform,
    pub content_type: ContentType,
    pub status: Status,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub hook: String,
    pub script: String,
    pub cta: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub scheduled_at: Option<NaiveDate>,
    pub published_at: Option<NaiveDate>,
    pub script_final: bool,
    pub thumbnail_done: bool,
    pub captions_finalized: bool,
    pub hashtags_added: bool,
    pub exported: bool,
    pub uploaded: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Build a post from a draft, assigning a fresh id and timestamps.
    /// Fails with `Validation` when the title is empty or whitespace-only.
    pub fn create(draft: PostDraft) -> Result<Post> {
        draft.validate()?;
        let now = Utc::now();
        Ok(Post {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            platform: draft.platform,
            content_type: draft.content_type,
            status: Status::Idea,
            priority: draft.priority,
            tags: dedup_preserving_order(draft.tags),
            hook: draft.hook,
            script: draft.script,
            cta: draft.cta,
            caption: draft.caption,
            hashtags: dedup_preserving_order(
                draft.hashtags.into_iter().map(|h| normalize_hashtag(&h)).collect(),
            ),
            scheduled_at: draft.scheduled_at,
            published_at: None,
            script_final: false,
            thumbnail_done: false,
            captions_finalized: false,
            hashtags_added: false,
            exported: false,
            uploaded: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Add a tag. Adding one that is already present is a no-op, so the
    /// operation is idempotent.
    pub fn add_tag(&mut self, tag: &str) {
        if !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
    }

    /// Remove a tag if present. Unknown tags are ignored.
    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    /// Add a hashtag, prefixing `#` when absent. Uniqueness is checked
    /// against the normalized form.
    pub fn add_hashtag(&mut self, raw: &str) {
        let normalized = normalize_hashtag(raw);
        if !self.hashtags.iter().any(|h| *h == normalized) {
            self.hashtags.push(normalized);
        }
    }

    /// Remove a hashtag, matching by normalized form.
    pub fn remove_hashtag(&mut self, raw: &str) {
        let normalized = normalize_hashtag(raw);
        self.hashtags.retain(|h| *h != normalized);
    }

    /// Date used for calendar placement: the scheduled date, falling back
    /// to the published date. Posts with neither appear in no day bucket.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.scheduled_at.or(self.published_at)
    }
}

/// Prefix `#` when absent; already-prefixed input passes through unchanged.
pub fn normalize_hashtag(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('#') {
        trimmed.to_string()
    } else {
        format!("#{}", trimmed)
    }
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Creation payload. Title, platform and content type are required; the rest
/// defaults to the empty/unset values in §Post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub platform: Platform,
    pub content_type: ContentType,
    #[serde(default)]
    pub priority: Priority,
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
    pub scheduled_at: Option<NaiveDate>,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, platform: Platform, content_type: ContentType) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            platform,
            content_type,
            priority: Priority::Medium,
            tags: Vec::new(),
            hook: String::new(),
            script: String::new(),
            cta: String::new(),
            caption: String::new(),
            hashtags: Vec::new(),
            scheduled_at: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(TrackerError::Validation("title must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Partial update. Every mutable field is enumerated explicitly; `None`
/// leaves the field untouched on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_final: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_done: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captions_finalized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashtags_added: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            token: None,
            user_agent: "Content-Tracker/0.1".to_string(),
            timeout_seconds: 30,
            max_retries: 3,
            retry_delay_seconds: 2,
        }
    }
}

impl ApiConfig {
    /// Read `TRACKER_API_URL` and `TRACKER_API_TOKEN` from the environment,
    /// falling back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("TRACKER_API_URL") {
            config.base_url = url;
        }
        if let Ok(token) = std::env::var("TRACKER_API_TOKEN") {
            if !token.is_empty() {
                config.token = Some(token);
            }
        }
        config
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("post not found: {id}")]
    NotFound { id: Uuid },

    #[error("sync failed for {id} ({reason}), reverted: {reverted}")]
    Sync { id: Uuid, reason: String, reverted: bool },

    #[error("data integrity error for {id}: {detail}")]
    Integrity { id: String, detail: String },

    #[error("not authorized")]
    Unauthorized,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
