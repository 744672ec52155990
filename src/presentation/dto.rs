use crate::application::blog_service::{PostCard, PostDetailPage};
use crate::domain::comment::Comment;
use crate::domain::tag::TagWithPostCount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ======================= ADMIN REQUESTS =======================

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub slug: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub text: Option<String>,
    pub slug: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TagTitleRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

// ======================= PAGE CONTEXTS =======================

/// Chars of body text shown in post previews.
const TEASER_LEN: usize = 200;

/// Plain values handed to the templates; no entity crosses this boundary.
#[derive(Debug, Clone, Serialize)]
pub struct PostContext {
    pub title: String,
    pub teaser_text: String,
    pub author: String,
    pub comments_amount: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<TagContext>,
    pub first_tag_title: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagContext {
    pub title: String,
    pub posts_with_tag: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentContext {
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub author: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetailContext {
    pub title: String,
    pub text: String,
    pub author: String,
    pub comments: Vec<CommentContext>,
    pub likes_amount: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<TagContext>,
}

impl From<&PostCard> for PostContext {
    fn from(card: &PostCard) -> Self {
        Self {
            title: card.post.title.clone(),
            teaser_text: teaser(&card.post.text),
            author: card.post.author.clone(),
            comments_amount: card.comments_count,
            image_url: card.post.image_url.clone(),
            published_at: card.post.published_at,
            slug: card.post.slug.clone(),
            tags: card.tags.iter().map(TagContext::from).collect(),
            first_tag_title: card.tags.first().map(|tag| tag.title.clone()),
        }
    }
}

impl From<&TagWithPostCount> for TagContext {
    fn from(tag: &TagWithPostCount) -> Self {
        Self {
            title: tag.title.clone(),
            posts_with_tag: tag.posts_count,
        }
    }
}

impl From<&Comment> for CommentContext {
    fn from(comment: &Comment) -> Self {
        Self {
            text: comment.text.clone(),
            published_at: comment.published_at,
            author: comment.author.clone(),
        }
    }
}

impl From<&PostDetailPage> for PostDetailContext {
    fn from(page: &PostDetailPage) -> Self {
        Self {
            title: page.post.title.clone(),
            text: page.post.text.clone(),
            author: page.post.author.clone(),
            comments: page.comments.iter().map(CommentContext::from).collect(),
            likes_amount: page.likes_amount,
            image_url: page.post.image_url.clone(),
            published_at: page.post.published_at,
            slug: page.post.slug.clone(),
            tags: page.tags.iter().map(TagContext::from).collect(),
        }
    }
}

/// First `TEASER_LEN` characters of the body. Counting chars rather than
/// bytes keeps the cut on a UTF-8 boundary.
fn teaser(text: &str) -> String {
    text.chars().take(TEASER_LEN).collect()
}
