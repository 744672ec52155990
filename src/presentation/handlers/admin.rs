use crate::application::admin_service::AdminService;
use crate::data::comment_repository::PostgresCommentRepository;
use crate::data::post_repository::PostgresPostRepository;
use crate::data::tag_repository::PostgresTagRepository;
use crate::data::user_repository::PostgresUserRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{
    CreateCommentRequest, CreatePostRequest, ListQuery, TagTitleRequest, UpdatePostRequest,
};
use crate::presentation::handlers::request_id;
use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

type PgAdminService = AdminService<
    PostgresPostRepository,
    PostgresTagRepository,
    PostgresCommentRepository,
    PostgresUserRepository,
>;

pub fn scope() -> Scope {
    web::scope("/admin")
        .service(list_posts)
        .service(create_post)
        .service(update_post)
        .service(delete_post)
        .service(list_tags)
        .service(create_tag)
        .service(rename_tag)
        .service(delete_tag)
        .service(list_comments)
        .service(create_comment)
        .service(delete_comment)
}

#[get("/posts")]
async fn list_posts(
    admin: web::Data<PgAdminService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, DomainError> {
    let posts = admin.list_posts(query.limit, query.offset).await?;

    Ok(HttpResponse::Ok().json(json!({
        "posts": posts,
        "total": posts.len(),
        "limit": query.limit,
        "offset": query.offset
    })))
}

#[post("/posts")]
async fn create_post(
    req: HttpRequest,
    admin: web::Data<PgAdminService>,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let post = admin.create_post(payload.into_inner()).await?;

    info!(request_id = %request_id(&req), post_id = %post.id, "post created");

    Ok(HttpResponse::Created().json(post))
}

#[put("/posts/{id}")]
async fn update_post(
    req: HttpRequest,
    admin: web::Data<PgAdminService>,
    path: web::Path<Uuid>,
    payload: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let post = admin.update_post(post_id, payload.into_inner()).await?;

    info!(request_id = %request_id(&req), post_id = %post_id, "post updated");

    Ok(HttpResponse::Ok().json(post))
}

#[delete("/posts/{id}")]
async fn delete_post(
    req: HttpRequest,
    admin: web::Data<PgAdminService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    admin.delete_post(post_id).await?;

    info!(request_id = %request_id(&req), post_id = %post_id, "post deleted");

    Ok(HttpResponse::NoContent().finish())
}

#[get("/tags")]
async fn list_tags(admin: web::Data<PgAdminService>) -> Result<HttpResponse, DomainError> {
    let tags = admin.list_tags().await?;
    Ok(HttpResponse::Ok().json(tags))
}

#[post("/tags")]
async fn create_tag(
    req: HttpRequest,
    admin: web::Data<PgAdminService>,
    payload: web::Json<TagTitleRequest>,
) -> Result<HttpResponse, DomainError> {
    let tag = admin.create_tag(&payload.title).await?;

    info!(request_id = %request_id(&req), tag = %tag.title, "tag created");

    Ok(HttpResponse::Created().json(tag))
}

#[put("/tags/{id}")]
async fn rename_tag(
    req: HttpRequest,
    admin: web::Data<PgAdminService>,
    path: web::Path<Uuid>,
    payload: web::Json<TagTitleRequest>,
) -> Result<HttpResponse, DomainError> {
    let tag_id = path.into_inner();
    let tag = admin.rename_tag(tag_id, &payload.title).await?;

    info!(request_id = %request_id(&req), tag = %tag.title, "tag renamed");

    Ok(HttpResponse::Ok().json(tag))
}

#[delete("/tags/{id}")]
async fn delete_tag(
    req: HttpRequest,
    admin: web::Data<PgAdminService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let tag_id = path.into_inner();
    admin.delete_tag(tag_id).await?;

    info!(request_id = %request_id(&req), tag_id = %tag_id, "tag deleted");

    Ok(HttpResponse::NoContent().finish())
}

#[get("/comments")]
async fn list_comments(
    admin: web::Data<PgAdminService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, DomainError> {
    let comments = admin.list_comments(query.limit, query.offset).await?;

    Ok(HttpResponse::Ok().json(json!({
        "comments": comments,
        "total": comments.len(),
        "limit": query.limit,
        "offset": query.offset
    })))
}

#[post("/comments")]
async fn create_comment(
    req: HttpRequest,
    admin: web::Data<PgAdminService>,
    payload: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, DomainError> {
    let comment = admin.create_comment(payload.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        comment_id = %comment.id,
        post_id = %comment.post_id,
        "comment created"
    );

    Ok(HttpResponse::Created().json(comment))
}

#[delete("/comments/{id}")]
async fn delete_comment(
    req: HttpRequest,
    admin: web::Data<PgAdminService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let comment_id = path.into_inner();
    admin.delete_comment(comment_id).await?;

    info!(request_id = %request_id(&req), comment_id = %comment_id, "comment deleted");

    Ok(HttpResponse::NoContent().finish())
}
