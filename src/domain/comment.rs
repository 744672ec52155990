use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A comment joined with its author's username.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author: String,
    pub text: String,
    pub published_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, author_id: Uuid, author: String, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            author,
            text,
            published_at: Utc::now(),
        }
    }
}

/// Row shape for the admin comment list: author, post and text columns.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CommentListEntry {
    pub id: Uuid,
    pub author: String,
    pub post_title: String,
    pub text: String,
    pub published_at: DateTime<Utc>,
}
