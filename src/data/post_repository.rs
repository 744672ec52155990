use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::presentation::dto::UpdatePostRequest;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

const POST_COLUMNS: &str = r#"
    p.id, p.author_id, u.username AS author, p.title, p.text, p.slug,
    p.image_url, p.published_at
"#;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    /// Newest published first.
    async fn most_fresh(&self, limit: i64) -> Result<Vec<Post>, DomainError>;
    /// Descending count of likes; posts with no likes sort last.
    async fn most_popular(&self, limit: i64) -> Result<Vec<Post>, DomainError>;
    async fn for_tag(&self, tag_id: Uuid, limit: i64) -> Result<Vec<Post>, DomainError>;
    async fn likes_count(&self, post_id: Uuid) -> Result<i64, DomainError>;
    async fn create(&self, post: Post) -> Result<Post, DomainError>;
    async fn update(&self, id: Uuid, update: UpdatePostRequest)
    -> Result<Option<Post>, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
    async fn list(&self, limit: Option<usize>, offset: Option<usize>)
    -> Result<Vec<Post>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p JOIN users u ON u.id = p.author_id
            WHERE p.slug = $1
            "#
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find_by_slug {}: {}", slug, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find_by_id {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn most_fresh(&self, limit: i64) -> Result<Vec<Post>, DomainError> {
        sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p JOIN users u ON u.id = p.author_id
            ORDER BY p.published_at DESC
            LIMIT $1
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching fresh posts: {}", e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn most_popular(&self, limit: i64) -> Result<Vec<Post>, DomainError> {
        sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            LEFT JOIN post_likes pl ON pl.post_id = p.id
            GROUP BY p.id, u.username
            ORDER BY COUNT(pl.user_id) DESC
            LIMIT $1
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching popular posts: {}", e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn for_tag(&self, tag_id: Uuid, limit: i64) -> Result<Vec<Post>, DomainError> {
        sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            JOIN post_tags pt ON pt.post_id = p.id
            WHERE pt.tag_id = $1
            ORDER BY p.published_at DESC
            LIMIT $2
            "#
        ))
        .bind(tag_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching posts for tag {}: {}", tag_id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn likes_count(&self, post_id: Uuid) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("db error counting likes for {}: {}", post_id, e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, title, text, slug, image_url, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(post.id)
        .bind(post.author_id)
        .bind(&post.title)
        .bind(&post.text)
        .bind(&post.slug)
        .bind(&post.image_url)
        .bind(post.published_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create post: {}", e);
            if e.as_database_error()
                .and_then(|db| db.constraint())
                .map(|c| c.contains("posts_slug"))
                == Some(true)
            {
                DomainError::SlugTaken(post.slug.clone())
            } else {
                DomainError::Internal(format!("database error: {}", e))
            }
        })?;

        info!(post_id = %post.id, slug = %post.slug, "post created");
        Ok(post)
    }

    async fn update(
        &self,
        id: Uuid,
        update: UpdatePostRequest,
    ) -> Result<Option<Post>, DomainError> {
        let slug = update.slug.clone().unwrap_or_default();
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts AS p
            SET
                title = COALESCE($1, p.title),
                text = COALESCE($2, p.text),
                slug = COALESCE($3, p.slug),
                image_url = COALESCE($4, p.image_url)
            FROM users AS u
            WHERE p.id = $5 AND u.id = p.author_id
            RETURNING p.id, p.author_id, u.username AS author, p.title, p.text,
                      p.slug, p.image_url, p.published_at
            "#,
        )
        .bind(update.title)
        .bind(update.text)
        .bind(update.slug)
        .bind(update.image_url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update post {}: {}", id, e);
            if e.as_database_error()
                .and_then(|db| db.constraint())
                .map(|c| c.contains("posts_slug"))
                == Some(true)
            {
                DomainError::SlugTaken(slug)
            } else {
                DomainError::Internal(e.to_string())
            }
        })?;

        if post.is_some() {
            info!(post_id = %id, "post updated");
        }

        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if deleted.rows_affected() == 0 {
            return Err(DomainError::PostNotFound(id.to_string()));
        }

        info!(post_id = %id, "post deleted");
        Ok(())
    }

    async fn list(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Post>, DomainError> {
        let limit = limit.unwrap_or(10).min(100) as i64;
        let offset = offset.unwrap_or(0) as i64;

        sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p JOIN users u ON u.id = p.author_id
            ORDER BY p.published_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while listing posts: {}", e);
            DomainError::Internal(e.to_string())
        })
    }
}
