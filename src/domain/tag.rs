use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: Uuid,
    pub title: String,
}

impl Tag {
    /// Titles are stored lowercased so that lookups by title stay
    /// case-insensitive without needing ILIKE.
    pub fn new(title: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.trim().to_lowercase(),
        }
    }
}

/// A tag annotated with the number of posts that carry it, the unit of
/// the popularity ranking.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TagWithPostCount {
    pub id: Uuid,
    pub title: String,
    pub posts_count: i64,
}
