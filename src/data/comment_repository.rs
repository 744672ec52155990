use std::collections::HashMap;

use crate::domain::comment::{Comment, CommentListEntry};
use crate::domain::error::DomainError;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments for one post, oldest first.
    async fn for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError>;
    /// One grouped query mapping post id to comment count. Posts without
    /// comments are absent from the map.
    async fn count_for_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>, DomainError>;
    async fn create(&self, comment: Comment) -> Result<Comment, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
    async fn list(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<CommentListEntry>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.post_id, c.author_id, u.username AS author,
                   c.text, c.published_at
            FROM comments c JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.published_at
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching comments for {}: {}", post_id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn count_for_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>, DomainError> {
        let rows = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT post_id, COUNT(id)
            FROM comments
            WHERE post_id = ANY($1)
            GROUP BY post_id
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while counting comments: {}", e);
            DomainError::Internal(e.to_string())
        })?;

        Ok(rows.into_iter().collect())
    }

    async fn create(&self, comment: Comment) -> Result<Comment, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, author_id, text, published_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.text)
        .bind(comment.published_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create comment: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(comment_id = %comment.id, post_id = %comment.post_id, "comment created");
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let deleted = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if deleted.rows_affected() == 0 {
            return Err(DomainError::CommentNotFound(id));
        }

        info!(comment_id = %id, "comment deleted");
        Ok(())
    }

    async fn list(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<CommentListEntry>, DomainError> {
        let limit = limit.unwrap_or(10).min(100) as i64;
        let offset = offset.unwrap_or(0) as i64;

        sqlx::query_as::<_, CommentListEntry>(
            r#"
            SELECT c.id, u.username AS author, p.title AS post_title,
                   c.text, c.published_at
            FROM comments c
            JOIN users u ON u.id = c.author_id
            JOIN posts p ON p.id = c.post_id
            ORDER BY c.published_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while listing comments: {}", e);
            DomainError::Internal(e.to_string())
        })
    }
}
