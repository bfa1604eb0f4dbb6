pub mod board;
pub mod calendar;
pub mod filter;
pub mod remote;
pub mod stats;
pub mod store;
pub mod types;

pub use board::{PipelineBoard, Transition};
pub use calendar::{day_buckets, month_grid, DayBucket};
pub use filter::PostFilter;
pub use remote::{AccessGate, ApiClient, OpenGate, PostRecord, RemoteStore, ServerStats, TokenGate};
pub use stats::{counts_by_platform, counts_by_status, summary, unique_tags, Summary};
pub use store::PostStore;
pub use types::{
    ApiConfig, ContentType, Platform, Post, PostDraft, PostPatch, Priority, Result, Status,
    TrackerError,
};
