use std::sync::Arc;

use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::data::tag_repository::TagRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::comment::{Comment, CommentListEntry};
use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::domain::tag::Tag;
use crate::presentation::dto::{CreateCommentRequest, CreatePostRequest, UpdatePostRequest};
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

/// CRUD over posts, tags and comments for the admin surface. Writes
/// validate referenced rows up front so callers get a 404 instead of a
/// raw foreign-key error.
#[derive(Clone)]
pub struct AdminService<P, T, C, U>
where
    P: PostRepository + 'static,
    T: TagRepository + 'static,
    C: CommentRepository + 'static,
    U: UserRepository + 'static,
{
    posts: Arc<P>,
    tags: Arc<T>,
    comments: Arc<C>,
    users: Arc<U>,
}

impl<P, T, C, U> AdminService<P, T, C, U>
where
    P: PostRepository + 'static,
    T: TagRepository + 'static,
    C: CommentRepository + 'static,
    U: UserRepository + 'static,
{
    pub fn new(posts: Arc<P>, tags: Arc<T>, comments: Arc<C>, users: Arc<U>) -> Self {
        Self {
            posts,
            tags,
            comments,
            users,
        }
    }

    #[instrument(skip(self, request))]
    pub async fn create_post(&self, request: CreatePostRequest) -> Result<Post, DomainError> {
        let author = self
            .users
            .find_by_id(request.author_id)
            .await?
            .ok_or(DomainError::AuthorNotFound(request.author_id))?;

        let post = Post::new(
            author.id,
            author.username,
            request.title,
            request.text,
            request.slug,
            request.image_url,
            request.published_at.unwrap_or_else(Utc::now),
        );
        self.posts.create(post).await
    }

    #[instrument(skip(self, update))]
    pub async fn update_post(
        &self,
        id: Uuid,
        update: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        self.posts
            .update(id, update)
            .await?
            .ok_or_else(|| DomainError::PostNotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: Uuid) -> Result<(), DomainError> {
        self.posts.delete(id).await
    }

    pub async fn list_posts(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Post>, DomainError> {
        self.posts.list(limit, offset).await
    }

    #[instrument(skip(self))]
    pub async fn create_tag(&self, title: &str) -> Result<Tag, DomainError> {
        self.tags.create(Tag::new(title)).await
    }

    #[instrument(skip(self))]
    pub async fn rename_tag(&self, id: Uuid, title: &str) -> Result<Tag, DomainError> {
        let title = title.trim().to_lowercase();
        self.tags
            .rename(id, &title)
            .await?
            .ok_or_else(|| DomainError::TagNotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn delete_tag(&self, id: Uuid) -> Result<(), DomainError> {
        self.tags.delete(id).await
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>, DomainError> {
        self.tags.list().await
    }

    #[instrument(skip(self, request))]
    pub async fn create_comment(
        &self,
        request: CreateCommentRequest,
    ) -> Result<Comment, DomainError> {
        self.posts
            .find_by_id(request.post_id)
            .await?
            .ok_or_else(|| DomainError::PostNotFound(request.post_id.to_string()))?;
        let author = self
            .users
            .find_by_id(request.author_id)
            .await?
            .ok_or(DomainError::AuthorNotFound(request.author_id))?;

        let comment = Comment::new(request.post_id, author.id, author.username, request.text);
        self.comments.create(comment).await
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(&self, id: Uuid) -> Result<(), DomainError> {
        self.comments.delete(id).await
    }

    pub async fn list_comments(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<CommentListEntry>, DomainError> {
        self.comments.list(limit, offset).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fakes::{
        FakeCommentRepository, FakePostRepository, FakeTagRepository, FakeUserRepository,
    };

    fn admin(
        posts: FakePostRepository,
        users: FakeUserRepository,
    ) -> AdminService<FakePostRepository, FakeTagRepository, FakeCommentRepository, FakeUserRepository>
    {
        AdminService::new(
            Arc::new(posts),
            Arc::new(FakeTagRepository::default()),
            Arc::new(FakeCommentRepository::default()),
            Arc::new(users),
        )
    }

    #[tokio::test]
    async fn create_post_rejects_unknown_author() {
        let svc = admin(FakePostRepository::default(), FakeUserRepository::default());

        let author_id = Uuid::new_v4();
        let err = svc
            .create_post(CreatePostRequest {
                author_id,
                title: "t".into(),
                text: "b".into(),
                slug: "t".into(),
                image_url: None,
                published_at: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::AuthorNotFound(id) if id == author_id));
    }

    #[tokio::test]
    async fn create_post_stores_author_username() {
        let mut users = FakeUserRepository::default();
        let author_id = users.add_user("alice");
        let svc = admin(FakePostRepository::default(), users);

        let post = svc
            .create_post(CreatePostRequest {
                author_id,
                title: "hello".into(),
                text: "world".into(),
                slug: "hello".into(),
                image_url: None,
                published_at: None,
            })
            .await
            .unwrap();

        assert_eq!(post.author, "alice");
        assert_eq!(post.slug, "hello");
    }

    #[tokio::test]
    async fn create_tag_lowercases_and_rejects_duplicates() {
        let svc = admin(FakePostRepository::default(), FakeUserRepository::default());

        let tag = svc.create_tag("Rust").await.unwrap();
        assert_eq!(tag.title, "rust");

        let err = svc.create_tag("RUST").await.unwrap_err();
        assert!(matches!(err, DomainError::TagAlreadyExists(title) if title == "rust"));
    }

    #[tokio::test]
    async fn create_comment_rejects_unknown_post() {
        let mut users = FakeUserRepository::default();
        let author_id = users.add_user("bob");
        let svc = admin(FakePostRepository::default(), users);

        let err = svc
            .create_comment(CreateCommentRequest {
                post_id: Uuid::new_v4(),
                author_id,
                text: "hi".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::PostNotFound(_)));
    }
}
