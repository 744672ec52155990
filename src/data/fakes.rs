//! In-memory repository fakes for service tests. The comment fake counts
//! its grouped-count invocations so tests can pin the number of queries
//! the aggregation helper issues.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::data::tag_repository::TagRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::comment::{Comment, CommentListEntry};
use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::domain::tag::{Tag, TagWithPostCount};
use crate::domain::user::User;
use crate::presentation::dto::UpdatePostRequest;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

#[derive(Default)]
pub struct FakePostRepository {
    posts: Mutex<Vec<Post>>,
    likes: Mutex<HashMap<Uuid, i64>>,
    tag_links: Mutex<Vec<(Uuid, Uuid)>>,
}

impl FakePostRepository {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Mutex::new(posts),
            ..Default::default()
        }
    }

    pub fn set_likes(&mut self, post_id: Uuid, likes: i64) {
        self.likes.get_mut().unwrap().insert(post_id, likes);
    }

    pub fn likes_of(&self, post_id: Uuid) -> i64 {
        self.likes
            .lock()
            .unwrap()
            .get(&post_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn attach_tag(&mut self, post_id: Uuid, tag_id: Uuid) {
        self.tag_links.get_mut().unwrap().push((post_id, tag_id));
    }
}

#[async_trait]
impl PostRepository for FakePostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, DomainError> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn most_fresh(&self, limit: i64) -> Result<Vec<Post>, DomainError> {
        let mut posts = self.posts.lock().unwrap().clone();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        posts.truncate(limit as usize);
        Ok(posts)
    }

    async fn most_popular(&self, limit: i64) -> Result<Vec<Post>, DomainError> {
        let likes = self.likes.lock().unwrap();
        let mut posts = self.posts.lock().unwrap().clone();
        // stable sort keeps insertion order for ties, like the store's default
        posts.sort_by(|a, b| {
            let la = likes.get(&a.id).copied().unwrap_or(0);
            let lb = likes.get(&b.id).copied().unwrap_or(0);
            lb.cmp(&la)
        });
        posts.truncate(limit as usize);
        Ok(posts)
    }

    async fn for_tag(&self, tag_id: Uuid, limit: i64) -> Result<Vec<Post>, DomainError> {
        let links = self.tag_links.lock().unwrap();
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| links.iter().any(|(pid, tid)| *pid == p.id && *tid == tag_id))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        posts.truncate(limit as usize);
        Ok(posts)
    }

    async fn likes_count(&self, post_id: Uuid) -> Result<i64, DomainError> {
        Ok(self.likes_of(post_id))
    }

    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        let mut posts = self.posts.lock().unwrap();
        if posts.iter().any(|p| p.slug == post.slug) {
            return Err(DomainError::SlugTaken(post.slug.clone()));
        }
        posts.push(post.clone());
        Ok(post)
    }

    async fn update(
        &self,
        id: Uuid,
        update: UpdatePostRequest,
    ) -> Result<Option<Post>, DomainError> {
        let mut posts = self.posts.lock().unwrap();
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(title) = update.title {
            post.title = title;
        }
        if let Some(text) = update.text {
            post.text = text;
        }
        if let Some(slug) = update.slug {
            post.slug = slug;
        }
        if let Some(image_url) = update.image_url {
            post.image_url = Some(image_url);
        }
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Err(DomainError::PostNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Post>, DomainError> {
        let mut posts = self.posts.lock().unwrap().clone();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(posts
            .into_iter()
            .skip(offset.unwrap_or(0))
            .take(limit.unwrap_or(10))
            .collect())
    }
}

#[derive(Default)]
pub struct FakeTagRepository {
    tags: Mutex<Vec<Tag>>,
    links: Mutex<Vec<(Uuid, Uuid)>>,
}

impl FakeTagRepository {
    pub fn add_tag(&mut self, title: &str) -> Uuid {
        let tag = Tag::new(title);
        let id = tag.id;
        self.tags.get_mut().unwrap().push(tag);
        id
    }

    pub fn attach(&mut self, post_id: Uuid, tag_id: Uuid) {
        self.links.get_mut().unwrap().push((post_id, tag_id));
    }

    fn posts_count(&self, links: &[(Uuid, Uuid)], tag_id: Uuid) -> i64 {
        links.iter().filter(|(_, tid)| *tid == tag_id).count() as i64
    }
}

#[async_trait]
impl TagRepository for FakeTagRepository {
    async fn find_by_title(&self, title: &str) -> Result<Option<Tag>, DomainError> {
        Ok(self
            .tags
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.title == title)
            .cloned())
    }

    async fn popular(&self, limit: i64) -> Result<Vec<TagWithPostCount>, DomainError> {
        let links = self.links.lock().unwrap();
        let mut ranked: Vec<TagWithPostCount> = self
            .tags
            .lock()
            .unwrap()
            .iter()
            .map(|t| TagWithPostCount {
                id: t.id,
                title: t.title.clone(),
                posts_count: self.posts_count(&links, t.id),
            })
            .collect();
        ranked.sort_by(|a, b| b.posts_count.cmp(&a.posts_count));
        ranked.truncate(limit as usize);
        Ok(ranked)
    }

    async fn for_posts(
        &self,
        post_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<TagWithPostCount>>, DomainError> {
        let links = self.links.lock().unwrap();
        let tags = self.tags.lock().unwrap();
        let mut result: HashMap<Uuid, Vec<TagWithPostCount>> = HashMap::new();
        for (post_id, tag_id) in links.iter() {
            if !post_ids.contains(post_id) {
                continue;
            }
            if let Some(tag) = tags.iter().find(|t| t.id == *tag_id) {
                result.entry(*post_id).or_default().push(TagWithPostCount {
                    id: tag.id,
                    title: tag.title.clone(),
                    posts_count: self.posts_count(&links, tag.id),
                });
            }
        }
        for tags in result.values_mut() {
            tags.sort_by(|a, b| a.title.cmp(&b.title));
        }
        Ok(result)
    }

    async fn create(&self, tag: Tag) -> Result<Tag, DomainError> {
        let mut tags = self.tags.lock().unwrap();
        if tags.iter().any(|t| t.title == tag.title) {
            return Err(DomainError::TagAlreadyExists(tag.title.clone()));
        }
        tags.push(tag.clone());
        Ok(tag)
    }

    async fn rename(&self, id: Uuid, title: &str) -> Result<Option<Tag>, DomainError> {
        let mut tags = self.tags.lock().unwrap();
        if tags.iter().any(|t| t.title == title && t.id != id) {
            return Err(DomainError::TagAlreadyExists(title.to_string()));
        }
        let Some(tag) = tags.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        tag.title = title.to_string();
        Ok(Some(tag.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut tags = self.tags.lock().unwrap();
        let before = tags.len();
        tags.retain(|t| t.id != id);
        if tags.len() == before {
            return Err(DomainError::TagNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Tag>, DomainError> {
        let mut tags = self.tags.lock().unwrap().clone();
        tags.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(tags)
    }
}

#[derive(Default)]
pub struct FakeCommentRepository {
    comments: Mutex<Vec<Comment>>,
    count_queries: AtomicUsize,
}

impl FakeCommentRepository {
    pub fn add_comments(&mut self, post_id: Uuid, n: usize) {
        let comments = self.comments.get_mut().unwrap();
        for i in 0..n {
            let mut comment = Comment::new(
                post_id,
                Uuid::new_v4(),
                "bob".into(),
                format!("comment {i}"),
            );
            comment.published_at = Utc::now() + Duration::seconds(i as i64);
            comments.push(comment);
        }
    }

    pub fn count_queries(&self) -> usize {
        self.count_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommentRepository for FakeCommentRepository {
    async fn for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let mut comments: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.published_at.cmp(&b.published_at));
        Ok(comments)
    }

    async fn count_for_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>, DomainError> {
        self.count_queries.fetch_add(1, Ordering::SeqCst);
        let comments = self.comments.lock().unwrap();
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for comment in comments.iter() {
            if post_ids.contains(&comment.post_id) {
                *counts.entry(comment.post_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn create(&self, comment: Comment) -> Result<Comment, DomainError> {
        self.comments.lock().unwrap().push(comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut comments = self.comments.lock().unwrap();
        let before = comments.len();
        comments.retain(|c| c.id != id);
        if comments.len() == before {
            return Err(DomainError::CommentNotFound(id));
        }
        Ok(())
    }

    async fn list(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<CommentListEntry>, DomainError> {
        let mut comments = self.comments.lock().unwrap().clone();
        comments.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(comments
            .into_iter()
            .skip(offset.unwrap_or(0))
            .take(limit.unwrap_or(10))
            .map(|c| CommentListEntry {
                id: c.id,
                author: c.author,
                post_title: String::new(),
                text: c.text,
                published_at: c.published_at,
            })
            .collect())
    }
}

#[derive(Default)]
pub struct FakeUserRepository {
    users: Mutex<Vec<User>>,
}

impl FakeUserRepository {
    pub fn add_user(&mut self, username: &str) -> Uuid {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        let id = user.id;
        self.users.get_mut().unwrap().push(user);
        id
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }
}
