use crate::filter::PostFilter;
use crate::remote::{AccessGate, RemoteStore, ServerStats};
use crate::store::PostStore;
use crate::types::{Post, PostDraft, PostPatch, Result, Status, TrackerError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Outcome of a stage transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Remote collaborator acknowledged the new status.
    Confirmed { previous: Status },
    /// Target stage equals the current one; confirmed without a remote call.
    NoOp,
}

/// The pipeline board: single writer of the post collection.
///
/// Stage transitions are applied optimistically, so the caller observes the
/// new status before the remote collaborator has confirmed it. Each item
/// carries a transition generation; a failure only rolls the item back when
/// its generation is still current, so a stale failure never clobbers a
/// newer optimistic value.
pub struct PipelineBoard {
    store: Arc<RwLock<PostStore>>,
    generations: Arc<RwLock<HashMap<Uuid, u64>>>,
    remote: Arc<dyn RemoteStore>,
    gate: Arc<dyn AccessGate>,
}

impl PipelineBoard {
    pub fn new(remote: Arc<dyn RemoteStore>, gate: Arc<dyn AccessGate>) -> Self {
        Self {
            store: Arc::new(RwLock::new(PostStore::new())),
            generations: Arc::new(RwLock::new(HashMap::new())),
            remote,
            gate,
        }
    }

    fn ensure_authorized(&self) -> Result<()> {
        if self.gate.is_authorized() {
            Ok(())
        } else {
            Err(TrackerError::Unauthorized)
        }
    }

    /// Replace the local collection from the remote listing. Records with
    /// an unrecognized status or platform are logged and skipped rather
    /// than failing the whole load.
    pub async fn refresh(&self, filter: &PostFilter) -> Result<usize> {
        self.ensure_authorized()?;
        let records = self.remote.list_posts(filter).await?;
        let total = records.len();

        let mut posts = Vec::with_capacity(total);
        for record in records {
            match Post::try_from(record) {
                Ok(post) => posts.push(post),
                Err(e) => warn!("Skipping malformed post from remote: {}", e),
            }
        }

        let loaded = posts.len();
        let mut store = self.store.write().await;
        store.load(posts);
        info!("Loaded {}/{} posts from remote", loaded, total);
        Ok(loaded)
    }

    /// Create a post. Creation is remote-first: the storage collaborator
    /// assigns the id and timestamps, then the result lands in the local
    /// collection.
    pub async fn create(&self, draft: PostDraft) -> Result<Post> {
        self.ensure_authorized()?;
        draft.validate()?;

        let record = self.remote.create_post(&draft).await?;
        let post = Post::try_from(record)?;
        let mut store = self.store.write().await;
        store.insert(post.clone())?;
        info!("Created post {} ({})", post.id, post.title);
        Ok(post)
    }

    /// Apply a field-level patch remote-first, mirroring the confirmed
    /// result locally.
    pub async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Post> {
        self.ensure_authorized()?;
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(TrackerError::Validation("title must not be empty".to_string()));
            }
        }

        let record = self.remote.update_post(id, &patch).await?;
        let post = Post::try_from(record)?;
        let mut store = self.store.write().await;
        store.replace(post.clone())?;
        debug!("Updated post {}", id);
        Ok(post)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.ensure_authorized()?;
        self.remote.delete_post(id).await?;
        let mut store = self.store.write().await;
        store.remove(id)?;
        info!("Deleted post {}", id);
        Ok(())
    }

    /// Move a post to a new pipeline stage.
    ///
    /// The local status flips synchronously before the remote confirmation
    /// is awaited; on failure the item is rolled back to its previous
    /// status unless a later transition has already superseded this one.
    /// Failures are reported, never retried here.
    pub async fn move_status(&self, id: Uuid, new_status: Status) -> Result<Transition> {
        self.ensure_authorized()?;

        let (previous, generation) = {
            let mut store = self.store.write().await;
            let post = store.get(id).ok_or(TrackerError::NotFound { id })?;
            let previous = post.status;
            if previous == new_status {
                debug!("Post {} already in {}, nothing to confirm", id, new_status);
                return Ok(Transition::NoOp);
            }

            let mut generations = self.generations.write().await;
            let generation = generations.entry(id).and_modify(|g| *g += 1).or_insert(1);
            let generation = *generation;

            store.set_status(id, new_status)?;
            debug!(
                "Optimistically moved {} from {} to {} (generation {})",
                id, previous, new_status, generation
            );
            (previous, generation)
        };

        match self.remote.set_status(id, new_status).await {
            Ok(()) => {
                info!("Confirmed {} -> {} for {}", previous, new_status, id);
                Ok(Transition::Confirmed { previous })
            }
            Err(e) => {
                let reason = e.to_string();
                let reverted = self.revert_if_current(id, generation, previous).await;
                if reverted {
                    warn!("Transition {} -> {} failed for {}, reverted: {}", previous, new_status, id, reason);
                } else {
                    warn!(
                        "Stale transition failure for {} ignored, a newer move superseded it: {}",
                        id, reason
                    );
                }
                Err(TrackerError::Sync { id, reason, reverted })
            }
        }
    }

    /// Roll the item back to `previous` only when `generation` is still the
    /// latest transition for it.
    async fn revert_if_current(&self, id: Uuid, generation: u64, previous: Status) -> bool {
        let mut store = self.store.write().await;
        let generations = self.generations.read().await;
        if generations.get(&id).copied() != Some(generation) {
            return false;
        }
        match store.set_status(id, previous) {
            Ok(_) => true,
            // Deleted while the confirmation was in flight; nothing to restore.
            Err(_) => false,
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Post> {
        let store = self.store.read().await;
        store.get(id).cloned().ok_or(TrackerError::NotFound { id })
    }

    /// Snapshot of the full ordered collection.
    pub async fn posts(&self) -> Vec<Post> {
        let store = self.store.read().await;
        store.snapshot()
    }

    /// Locally filtered snapshot, collection order preserved.
    pub async fn filtered(&self, filter: &PostFilter) -> Vec<Post> {
        let snapshot = {
            let store = self.store.read().await;
            store.snapshot()
        };
        filter.apply(&snapshot).into_iter().cloned().collect()
    }

    /// Server-computed dashboard summary.
    pub async fn server_stats(&self) -> Result<ServerStats> {
        self.remote.stats().await
    }

    /// All distinct tags known to the server.
    pub async fn server_tags(&self) -> Result<Vec<String>> {
        self.remote.tags().await
    }
}
