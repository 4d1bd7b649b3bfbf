//! Record types for the list-backed collections, as the API serializes them.
//!
//! Timestamps stay as the ISO-8601 strings the backend emits; the dashboard
//! never does date arithmetic on them.

use serde::{Deserialize, Serialize};

use cadence_store::Record;

/// Lifecycle state shared by posts, comments, reactions, and processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Pending,
    Error,
    Queued,
    Success,
    Published,
    Running,
}

/// Where a post is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostTarget {
    Page,
    Group,
}

/// Reaction flavor used by reaction processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReactionType {
    Like,
    Love,
    Care,
    Angry,
    Haha,
    Sad,
    Random,
}

/// Attachment kind for post media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    Image,
    Video,
    #[serde(rename = "GIF")]
    Gif,
    Link,
}

/// Media attached to a post or a post process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub id: i64,
    pub url: String,
    pub type_of: MediaType,
    #[serde(default)]
    pub process_id: Option<i64>,
    #[serde(default)]
    pub post_id: Option<i64>,
    pub created_at: String,
}

/// A single generated post, scheduled or already published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub status: Status,
    pub target: PostTarget,
    pub target_id: String,
    #[serde(default)]
    pub fb_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub process_id: Option<i64>,
    #[serde(default)]
    pub scheduled_for: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub medias: Vec<Media>,
}

/// A scheduled process fanning posts out across pages and groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostProcess {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub text: Option<String>,
    pub status: Status,
    pub use_ai: bool,
    #[serde(default)]
    pub ai_model: Option<String>,
    #[serde(default)]
    pub interval: Option<i64>,
    #[serde(default)]
    pub interval_range_start: Option<i64>,
    #[serde(default)]
    pub interval_range_end: Option<i64>,
    #[serde(default)]
    pub scheduled_for: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub medias: Vec<Media>,
}

/// A scheduled process posting comments under a target post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentProcess {
    pub id: i64,
    pub name: String,
    pub text: String,
    pub status: Status,
    pub use_ai: bool,
    pub post_id: String,
    #[serde(default)]
    pub interval: Option<i64>,
    #[serde(default)]
    pub interval_range_start: Option<i64>,
    #[serde(default)]
    pub interval_range_end: Option<i64>,
    #[serde(default)]
    pub scheduled_for: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub author_id: Option<i64>,
}

/// A scheduled process applying reactions to a target post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionProcess {
    pub id: i64,
    pub name: String,
    pub status: Status,
    pub post_id: String,
    pub type_of: ReactionType,
    #[serde(default)]
    pub interval: Option<i64>,
    #[serde(default)]
    pub interval_range_start: Option<i64>,
    #[serde(default)]
    pub interval_range_end: Option<i64>,
    #[serde(default)]
    pub scheduled_for: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub author_id: Option<i64>,
}

/// A single generated comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub status: Status,
    pub use_ai: bool,
    pub post_id: String,
    #[serde(default)]
    pub fb_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub process_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub scheduled_for: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    pub created_at: String,
}

impl Record for Post {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for PostProcess {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for CommentProcess {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for ReactionProcess {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Comment {
    fn id(&self) -> i64 {
        self.id
    }
}
