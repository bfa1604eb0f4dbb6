use crate::types::{Post, Result, Status, TrackerError};
use uuid::Uuid;

/// Insertion-ordered collection of posts keyed by id.
///
/// The store is owned by the pipeline board, which is the only writer.
/// Filter and aggregation code reads snapshots and never holds references
/// across mutations.
#[derive(Debug, Default)]
pub struct PostStore {
    posts: Vec<Post>,
}

impl PostStore {
    pub fn new() -> Self {
        Self { posts: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == id)
    }

    /// Append a post, rejecting a duplicate id.
    pub fn insert(&mut self, post: Post) -> Result<()> {
        if self.get(post.id).is_some() {
            return Err(TrackerError::Integrity {
                id: post.id.to_string(),
                detail: "duplicate post id".to_string(),
            });
        }
        self.posts.push(post);
        Ok(())
    }

    /// Swap an existing post in place, keeping its position in the ordering.
    pub fn replace(&mut self, post: Post) -> Result<()> {
        match self.posts.iter_mut().find(|p| p.id == post.id) {
            Some(slot) => {
                *slot = post;
                Ok(())
            }
            None => Err(TrackerError::NotFound { id: post.id }),
        }
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Post> {
        match self.posts.iter().position(|p| p.id == id) {
            Some(index) => Ok(self.posts.remove(index)),
            None => Err(TrackerError::NotFound { id }),
        }
    }

    /// Replace the whole collection, e.g. after a refresh from the remote.
    pub fn load(&mut self, posts: Vec<Post>) {
        self.posts = posts;
    }

    pub fn set_status(&mut self, id: Uuid, status: Status) -> Result<Status> {
        let post = self.get_mut(id).ok_or(TrackerError::NotFound { id })?;
        let previous = post.status;
        post.status = status;
        Ok(previous)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter()
    }

    /// Clone the ordered collection for filter/aggregation reads.
    pub fn snapshot(&self) -> Vec<Post> {
        self.posts.clone()
    }
}
