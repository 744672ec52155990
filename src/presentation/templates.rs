use crate::presentation::dto::{PostContext, PostDetailContext, TagContext};
use askama::Template;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub page_posts: Vec<PostContext>,
    pub most_popular_posts: Vec<PostContext>,
    pub popular_tags: Vec<TagContext>,
}

#[derive(Template)]
#[template(path = "post-details.html")]
pub struct PostDetailsTemplate {
    pub post: PostDetailContext,
    pub most_popular_posts: Vec<PostContext>,
    pub popular_tags: Vec<TagContext>,
}

#[derive(Template)]
#[template(path = "posts-list.html")]
pub struct PostsListTemplate {
    pub tag: String,
    pub posts: Vec<PostContext>,
    pub most_popular_posts: Vec<PostContext>,
    pub popular_tags: Vec<TagContext>,
}

#[derive(Template)]
#[template(path = "contacts.html")]
pub struct ContactsTemplate;
