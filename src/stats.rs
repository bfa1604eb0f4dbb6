use crate::types::{Platform, Post, Status};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Locally derived dashboard summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub ideas: usize,
    /// Everything between idea and published.
    pub in_progress: usize,
    pub ready: usize,
    pub published: usize,
}

/// Count per pipeline stage. Every stage is present, zero or not, in
/// pipeline order.
pub fn counts_by_status(posts: &[Post]) -> BTreeMap<Status, usize> {
    let mut counts: BTreeMap<Status, usize> = Status::ALL.iter().map(|s| (*s, 0)).collect();
    for post in posts {
        if let Some(count) = counts.get_mut(&post.status) {
            *count += 1;
        }
    }
    counts
}

/// Count per platform; platforms with no posts are omitted.
pub fn counts_by_platform(posts: &[Post]) -> HashMap<Platform, usize> {
    let mut counts = HashMap::new();
    for post in posts {
        *counts.entry(post.platform).or_insert(0) += 1;
    }
    counts
}

pub fn summary(posts: &[Post]) -> Summary {
    let by_status = counts_by_status(posts);
    let total = posts.len();
    let ideas = by_status[&Status::Idea];
    let ready = by_status[&Status::Ready];
    let published = by_status[&Status::Published];
    Summary {
        total,
        ideas,
        in_progress: total - ideas - published,
        ready,
        published,
    }
}

/// All distinct tags across the collection, sorted. Local mirror of the
/// server's tag listing.
pub fn unique_tags(posts: &[Post]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for post in posts {
        for tag in &post.tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
    }
    tags.sort();
    tags
}
