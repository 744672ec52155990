use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A blog post row joined with its author's username. Every read query
/// selects the username alongside the post so handlers never issue a
/// per-row author lookup.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author: String,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        author_id: Uuid,
        author: String,
        title: String,
        text: String,
        slug: String,
        image_url: Option<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            author,
            title,
            text,
            slug,
            image_url,
            published_at,
        }
    }
}
