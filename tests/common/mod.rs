use async_trait::async_trait;
use chrono::Utc;
use content_tracker::{
    ContentType, Platform, Post, PostDraft, PostFilter, PostPatch, PostRecord, RemoteStore,
    ServerStats, Status, TrackerError,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

/// Behavior of one upcoming `set_status` call on the mock remote.
#[derive(Debug, Clone, Copy)]
pub struct StatusScript {
    pub delay_ms: u64,
    pub fail: bool,
}

/// In-memory stand-in for the storage/API collaborator. `set_status` calls
/// can be scripted to delay and/or fail, which is how the rollback and
/// supersede paths get exercised.
#[derive(Default)]
pub struct MockRemote {
    posts: Mutex<Vec<PostRecord>>,
    status_scripts: Mutex<VecDeque<StatusScript>>,
    status_calls: AtomicUsize,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(posts: Vec<PostRecord>) -> Self {
        Self {
            posts: Mutex::new(posts),
            ..Self::default()
        }
    }

    /// Queue behavior for the next `set_status` calls, in order. Unscripted
    /// calls succeed immediately.
    pub fn script_status(&self, scripts: &[StatusScript]) {
        let mut queue = self.status_scripts.lock().unwrap();
        queue.extend(scripts.iter().copied());
    }

    pub fn fail_next_status(&self) {
        self.script_status(&[StatusScript { delay_ms: 0, fail: true }]);
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteStore for MockRemote {
    async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<PostRecord>, TrackerError> {
        let _ = filter; // listing filters are exercised locally in these tests
        Ok(self.posts.lock().unwrap().clone())
    }

    async fn get_post(&self, id: Uuid) -> Result<PostRecord, TrackerError> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id.to_string())
            .cloned()
            .ok_or(TrackerError::NotFound { id })
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<PostRecord, TrackerError> {
        let now = Utc::now().to_rfc3339();
        let record = PostRecord {
            id: Uuid::new_v4().to_string(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            platform: draft.platform.to_string(),
            content_type: draft.content_type.to_string(),
            status: Status::Idea.to_string(),
            priority: draft.priority.to_string(),
            tags: draft.tags.clone(),
            hook: draft.hook.clone(),
            script: draft.script.clone(),
            cta: draft.cta.clone(),
            caption: draft.caption.clone(),
            hashtags: draft.hashtags.clone(),
            scheduled_at: draft.scheduled_at.map(|d| d.to_string()),
            published_at: None,
            script_final: false,
            thumbnail_done: false,
            captions_finalized: false,
            hashtags_added: false,
            exported: false,
            uploaded: false,
            created_at: now.clone(),
            updated_at: Some(now),
        };
        self.posts.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_post(&self, id: Uuid, patch: &PostPatch) -> Result<PostRecord, TrackerError> {
        let mut posts = self.posts.lock().unwrap();
        let record = posts
            .iter_mut()
            .find(|r| r.id == id.to_string())
            .ok_or(TrackerError::NotFound { id })?;
        if let Some(title) = &patch.title {
            record.title = title.clone();
        }
        if let Some(description) = &patch.description {
            record.description = description.clone();
        }
        if let Some(status) = patch.status {
            record.status = status.to_string();
        }
        if let Some(priority) = patch.priority {
            record.priority = priority.to_string();
        }
        if let Some(tags) = &patch.tags {
            record.tags = tags.clone();
        }
        if let Some(hashtags) = &patch.hashtags {
            record.hashtags = hashtags.clone();
        }
        if let Some(scheduled_at) = patch.scheduled_at {
            record.scheduled_at = Some(scheduled_at.to_string());
        }
        if let Some(published_at) = patch.published_at {
            record.published_at = Some(published_at.to_string());
        }
        if let Some(script_final) = patch.script_final {
            record.script_final = script_final;
        }
        record.updated_at = Some(Utc::now().to_rfc3339());
        Ok(record.clone())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), TrackerError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|r| r.id != id.to_string());
        if posts.len() == before {
            return Err(TrackerError::NotFound { id });
        }
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: Status) -> Result<(), TrackerError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let script = self
            .status_scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(StatusScript { delay_ms: 0, fail: false });

        if script.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(script.delay_ms)).await;
        }
        if script.fail {
            return Err(TrackerError::Api {
                status: 500,
                message: "simulated remote failure".to_string(),
            });
        }

        let mut posts = self.posts.lock().unwrap();
        let record = posts
            .iter_mut()
            .find(|r| r.id == id.to_string())
            .ok_or(TrackerError::NotFound { id })?;
        record.status = status.to_string();
        Ok(())
    }

    async fn stats(&self) -> Result<ServerStats, TrackerError> {
        let posts = self.posts.lock().unwrap();
        let count = |s: &str| posts.iter().filter(|r| r.status == s).count() as i64;
        let ideas = count("idea");
        let published = count("published");
        Ok(ServerStats {
            total: posts.len() as i64,
            ideas,
            in_progress: posts.len() as i64 - ideas - published,
            ready: count("ready"),
            published,
            by_platform: Default::default(),
            by_status: Default::default(),
        })
    }

    async fn tags(&self) -> Result<Vec<String>, TrackerError> {
        let posts = self.posts.lock().unwrap();
        let mut tags: Vec<String> = posts.iter().flat_map(|r| r.tags.clone()).collect();
        tags.sort();
        tags.dedup();
        Ok(tags)
    }

    async fn health(&self) -> Result<bool, TrackerError> {
        Ok(true)
    }
}

/// Build a post directly for filter/aggregation tests.
pub fn make_post(title: &str, platform: Platform, status: Status) -> Post {
    let mut post = Post::create(PostDraft::new(title, platform, ContentType::Video))
        .expect("valid draft");
    post.status = status;
    post
}

pub fn draft(title: &str) -> PostDraft {
    PostDraft::new(title, Platform::Youtube, ContentType::Video)
}
