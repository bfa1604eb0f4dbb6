use crate::types::{ContentType, Platform, Post, Priority, Status};
use serde::{Deserialize, Serialize};

/// Filter specification over the post collection.
///
/// Every field is optional; absent fields match everything. Provided fields
/// are combined with logical AND, so the default (empty) filter is the
/// identity. The same field names travel as query parameters when listing is
/// delegated to the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Case-insensitive substring match against title or description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Exact membership in the post's tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl PostFilter {
    pub fn is_empty(&self) -> bool {
        self.platform.is_none()
            && self.status.is_none()
            && self.content_type.is_none()
            && self.priority.is_none()
            && self.search.is_none()
            && self.tag.is_none()
    }

    /// Total predicate: never fails, any malformed criterion simply does
    /// not match.
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(platform) = self.platform {
            if post.platform != platform {
                return false;
            }
        }
        if let Some(status) = self.status {
            if post.status != status {
                return false;
            }
        }
        if let Some(content_type) = self.content_type {
            if post.content_type != content_type {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if post.priority != priority {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_title = post.title.to_lowercase().contains(&needle);
            let in_description = post.description.to_lowercase().contains(&needle);
            if !in_title && !in_description {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !post.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        true
    }

    /// Ordered subsequence of `posts` matching all criteria. Collection
    /// order is preserved, never re-sorted.
    pub fn apply<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        posts.iter().filter(|p| self.matches(p)).collect()
    }

    /// Query-string pairs for the server-side listing endpoint.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(platform) = self.platform {
            params.push(("platform", platform.to_string()));
        }
        if let Some(status) = self.status {
            params.push(("status", status.to_string()));
        }
        if let Some(content_type) = self.content_type {
            params.push(("content_type", content_type.to_string()));
        }
        if let Some(priority) = self.priority {
            params.push(("priority", priority.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(tag) = &self.tag {
            params.push(("tag", tag.clone()));
        }
        params
    }
}
