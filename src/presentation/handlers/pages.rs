use crate::application::blog_service::{BlogService, Sidebar};
use crate::data::comment_repository::PostgresCommentRepository;
use crate::data::post_repository::PostgresPostRepository;
use crate::data::tag_repository::PostgresTagRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{PostContext, PostDetailContext, TagContext};
use crate::presentation::handlers::request_id;
use crate::presentation::templates::{
    ContactsTemplate, IndexTemplate, PostDetailsTemplate, PostsListTemplate,
};
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, get, web};
use askama::Template;
use tracing::{error, info};

type PgBlogService =
    BlogService<PostgresPostRepository, PostgresTagRepository, PostgresCommentRepository>;

fn render<T: Template>(template: T) -> Result<HttpResponse, DomainError> {
    let body = template.render().map_err(|e| {
        error!("template render failed: {}", e);
        DomainError::Internal(e.to_string())
    })?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}

fn sidebar_contexts(sidebar: &Sidebar) -> (Vec<PostContext>, Vec<TagContext>) {
    let posts = sidebar.popular_posts.iter().map(PostContext::from).collect();
    let tags = sidebar.popular_tags.iter().map(TagContext::from).collect();
    (posts, tags)
}

#[get("/")]
async fn index(
    req: HttpRequest,
    service: web::Data<PgBlogService>,
) -> Result<HttpResponse, DomainError> {
    let page = service.home().await?;

    info!(request_id = %request_id(&req), "home page assembled");

    render(IndexTemplate {
        page_posts: page.fresh_posts.iter().map(PostContext::from).collect(),
        most_popular_posts: page.popular_posts.iter().map(PostContext::from).collect(),
        popular_tags: page.popular_tags.iter().map(TagContext::from).collect(),
    })
}

#[get("/posts/{slug}")]
async fn post_detail(
    req: HttpRequest,
    service: web::Data<PgBlogService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let slug = path.into_inner();
    let page = service.post_detail(&slug).await?;
    let (most_popular_posts, popular_tags) = sidebar_contexts(&page.sidebar);

    info!(request_id = %request_id(&req), slug = %slug, "post detail assembled");

    render(PostDetailsTemplate {
        post: PostDetailContext::from(&page),
        most_popular_posts,
        popular_tags,
    })
}

#[get("/tags/{title}")]
async fn tag_filter(
    req: HttpRequest,
    service: web::Data<PgBlogService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let title = path.into_inner();
    let page = service.tag_page(&title).await?;
    let (most_popular_posts, popular_tags) = sidebar_contexts(&page.sidebar);

    info!(request_id = %request_id(&req), tag = %page.tag.title, "tag page assembled");

    render(PostsListTemplate {
        tag: page.tag.title.clone(),
        posts: page.posts.iter().map(PostContext::from).collect(),
        most_popular_posts,
        popular_tags,
    })
}

// Static for now; visit analytics and feedback capture would land here.
#[get("/contacts")]
async fn contacts(req: HttpRequest) -> Result<HttpResponse, DomainError> {
    info!(request_id = %request_id(&req), "contacts page served");
    render(ContactsTemplate)
}
