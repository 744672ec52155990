use std::sync::Arc;

use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::data::tag_repository::TagRepository;
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::domain::tag::{Tag, TagWithPostCount};
use uuid::Uuid;

/// How many posts/tags the home page and sidebars show per list.
pub const SIDEBAR_LIMIT: i64 = 5;
/// Cap on posts shown on a tag filter page.
pub const TAG_PAGE_LIMIT: i64 = 20;

/// A post ready for display in a list: the row itself, its comment count
/// and its tags, all filled by batched queries.
#[derive(Debug, Clone)]
pub struct PostCard {
    pub post: Post,
    pub comments_count: i64,
    pub tags: Vec<TagWithPostCount>,
}

#[derive(Debug, Clone)]
pub struct Sidebar {
    pub popular_posts: Vec<PostCard>,
    pub popular_tags: Vec<TagWithPostCount>,
}

#[derive(Debug, Clone)]
pub struct HomePage {
    pub fresh_posts: Vec<PostCard>,
    pub popular_posts: Vec<PostCard>,
    pub popular_tags: Vec<TagWithPostCount>,
}

#[derive(Debug, Clone)]
pub struct PostDetailPage {
    pub post: Post,
    pub tags: Vec<TagWithPostCount>,
    pub comments: Vec<Comment>,
    pub likes_amount: i64,
    pub sidebar: Sidebar,
}

#[derive(Debug, Clone)]
pub struct TagPage {
    pub tag: Tag,
    pub posts: Vec<PostCard>,
    pub sidebar: Sidebar,
}

/// Read-only assembly of the public pages. All methods issue a bounded
/// number of queries regardless of how many posts they touch.
#[derive(Clone)]
pub struct BlogService<P, T, C>
where
    P: PostRepository + 'static,
    T: TagRepository + 'static,
    C: CommentRepository + 'static,
{
    posts: Arc<P>,
    tags: Arc<T>,
    comments: Arc<C>,
}

impl<P, T, C> BlogService<P, T, C>
where
    P: PostRepository + 'static,
    T: TagRepository + 'static,
    C: CommentRepository + 'static,
{
    pub fn new(posts: Arc<P>, tags: Arc<T>, comments: Arc<C>) -> Self {
        Self {
            posts,
            tags,
            comments,
        }
    }

    /// Attaches a comment count to every post in the batch with a single
    /// grouped query. Posts absent from the grouped result get 0.
    pub async fn with_comment_counts(
        &self,
        posts: Vec<Post>,
    ) -> Result<Vec<(Post, i64)>, DomainError> {
        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let counts = self.comments.count_for_posts(&ids).await?;

        Ok(posts
            .into_iter()
            .map(|post| {
                let count = counts.get(&post.id).copied().unwrap_or(0);
                (post, count)
            })
            .collect())
    }

    /// Turns a batch of posts into display cards: two batched queries
    /// (comment counts, tags) no matter how many posts came in.
    pub async fn post_cards(&self, posts: Vec<Post>) -> Result<Vec<PostCard>, DomainError> {
        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let mut tags_for_post = self.tags.for_posts(&ids).await?;
        let with_counts = self.with_comment_counts(posts).await?;

        Ok(with_counts
            .into_iter()
            .map(|(post, comments_count)| PostCard {
                tags: tags_for_post.remove(&post.id).unwrap_or_default(),
                post,
                comments_count,
            })
            .collect())
    }

    async fn sidebar(&self) -> Result<Sidebar, DomainError> {
        let popular = self.posts.most_popular(SIDEBAR_LIMIT).await?;
        let popular_posts = self.post_cards(popular).await?;
        let popular_tags = self.tags.popular(SIDEBAR_LIMIT).await?;

        Ok(Sidebar {
            popular_posts,
            popular_tags,
        })
    }

    pub async fn home(&self) -> Result<HomePage, DomainError> {
        let fresh = self.posts.most_fresh(SIDEBAR_LIMIT).await?;
        let fresh_posts = self.post_cards(fresh).await?;

        let sidebar = self.sidebar().await?;

        Ok(HomePage {
            fresh_posts,
            popular_posts: sidebar.popular_posts,
            popular_tags: sidebar.popular_tags,
        })
    }

    pub async fn post_detail(&self, slug: &str) -> Result<PostDetailPage, DomainError> {
        let post = self
            .posts
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::PostNotFound(slug.to_string()))?;

        let comments = self.comments.for_post(post.id).await?;
        let likes_amount = self.posts.likes_count(post.id).await?;
        let mut tags_for_post = self.tags.for_posts(&[post.id]).await?;
        let tags = tags_for_post.remove(&post.id).unwrap_or_default();

        let sidebar = self.sidebar().await?;

        Ok(PostDetailPage {
            post,
            tags,
            comments,
            likes_amount,
            sidebar,
        })
    }

    pub async fn tag_page(&self, title: &str) -> Result<TagPage, DomainError> {
        let title = title.trim().to_lowercase();
        let tag = self
            .tags
            .find_by_title(&title)
            .await?
            .ok_or_else(|| DomainError::TagNotFound(title.clone()))?;

        let related = self.posts.for_tag(tag.id, TAG_PAGE_LIMIT).await?;
        let posts = self.post_cards(related).await?;

        let sidebar = self.sidebar().await?;

        Ok(TagPage {
            tag,
            posts,
            sidebar,
        })
    }
}
