use std::collections::HashMap;

use crate::domain::error::DomainError;
use crate::domain::tag::{Tag, TagWithPostCount};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn find_by_title(&self, title: &str) -> Result<Option<Tag>, DomainError>;
    /// Tags ordered by descending number of posts carrying them.
    async fn popular(&self, limit: i64) -> Result<Vec<TagWithPostCount>, DomainError>;
    /// One query mapping each given post id to its tags. Each tag carries
    /// its global post count so callers never count per tag.
    async fn for_posts(
        &self,
        post_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<TagWithPostCount>>, DomainError>;
    async fn create(&self, tag: Tag) -> Result<Tag, DomainError>;
    async fn rename(&self, id: Uuid, title: &str) -> Result<Option<Tag>, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
    async fn list(&self) -> Result<Vec<Tag>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresTagRepository {
    pool: PgPool,
}

impl PostgresTagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostTagRow {
    post_id: Uuid,
    id: Uuid,
    title: String,
    posts_count: i64,
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_title(&self, title: &str) -> Result<Option<Tag>, DomainError> {
        sqlx::query_as::<_, Tag>("SELECT id, title FROM tags WHERE title = $1")
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find_by_title {}: {}", title, e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn popular(&self, limit: i64) -> Result<Vec<TagWithPostCount>, DomainError> {
        sqlx::query_as::<_, TagWithPostCount>(
            r#"
            SELECT t.id, t.title, COUNT(pt.post_id) AS posts_count
            FROM tags t
            LEFT JOIN post_tags pt ON pt.tag_id = t.id
            GROUP BY t.id, t.title
            ORDER BY posts_count DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching popular tags: {}", e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn for_posts(
        &self,
        post_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<TagWithPostCount>>, DomainError> {
        let rows = sqlx::query_as::<_, PostTagRow>(
            r#"
            SELECT pt.post_id, t.id, t.title,
                   (SELECT COUNT(*) FROM post_tags x WHERE x.tag_id = t.id) AS posts_count
            FROM post_tags pt
            JOIN tags t ON t.id = pt.tag_id
            WHERE pt.post_id = ANY($1)
            ORDER BY t.title
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching tags for posts: {}", e);
            DomainError::Internal(e.to_string())
        })?;

        let mut tags_for_post: HashMap<Uuid, Vec<TagWithPostCount>> = HashMap::new();
        for row in rows {
            tags_for_post
                .entry(row.post_id)
                .or_default()
                .push(TagWithPostCount {
                    id: row.id,
                    title: row.title,
                    posts_count: row.posts_count,
                });
        }
        Ok(tags_for_post)
    }

    async fn create(&self, tag: Tag) -> Result<Tag, DomainError> {
        sqlx::query("INSERT INTO tags (id, title) VALUES ($1, $2)")
            .bind(tag.id)
            .bind(&tag.title)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to create tag: {}", e);
                if e.as_database_error()
                    .and_then(|db| db.constraint())
                    .map(|c| c.contains("tags_title"))
                    == Some(true)
                {
                    DomainError::TagAlreadyExists(tag.title.clone())
                } else {
                    DomainError::Internal(format!("database error: {}", e))
                }
            })?;

        info!(tag_id = %tag.id, title = %tag.title, "tag created");
        Ok(tag)
    }

    async fn rename(&self, id: Uuid, title: &str) -> Result<Option<Tag>, DomainError> {
        let tag = sqlx::query_as::<_, Tag>(
            "UPDATE tags SET title = $1 WHERE id = $2 RETURNING id, title",
        )
        .bind(title)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to rename tag {}: {}", id, e);
            if e.as_database_error()
                .and_then(|db| db.constraint())
                .map(|c| c.contains("tags_title"))
                == Some(true)
            {
                DomainError::TagAlreadyExists(title.to_string())
            } else {
                DomainError::Internal(e.to_string())
            }
        })?;

        if tag.is_some() {
            info!(tag_id = %id, title = %title, "tag renamed");
        }

        Ok(tag)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let deleted = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if deleted.rows_affected() == 0 {
            return Err(DomainError::TagNotFound(id.to_string()));
        }

        info!(tag_id = %id, "tag deleted");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Tag>, DomainError> {
        sqlx::query_as::<_, Tag>("SELECT id, title FROM tags ORDER BY title")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while listing tags: {}", e);
                DomainError::Internal(e.to_string())
            })
    }
}
