mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpServer, web};
use application::admin_service::AdminService;
use application::blog_service::BlogService;
use data::comment_repository::PostgresCommentRepository;
use data::post_repository::PostgresPostRepository;
use data::tag_repository::PostgresTagRepository;
use data::user_repository::PostgresUserRepository;
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use presentation::handlers;
use presentation::middleware::{RequestIdMiddleware, TimingMiddleware};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = AppConfig::from_env().expect("invalid configuration");
    let pool = create_pool(&config.database_url, config.database_max_connections)
        .await
        .expect("failed to connect to database");
    run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    let post_repo = Arc::new(PostgresPostRepository::new(pool.clone()));
    let tag_repo = Arc::new(PostgresTagRepository::new(pool.clone()));
    let comment_repo = Arc::new(PostgresCommentRepository::new(pool.clone()));
    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));

    let blog_service = BlogService::new(
        Arc::clone(&post_repo),
        Arc::clone(&tag_repo),
        Arc::clone(&comment_repo),
    );
    let admin_service = AdminService::new(
        Arc::clone(&post_repo),
        Arc::clone(&tag_repo),
        Arc::clone(&comment_repo),
        Arc::clone(&user_repo),
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .wrap(TimingMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer")),
            )
            .app_data(web::Data::new(blog_service.clone()))
            .app_data(web::Data::new(admin_service.clone()))
            .service(handlers::admin::scope())
            .service(handlers::pages::index)
            .service(handlers::pages::post_detail)
            .service(handlers::pages::tag_filter)
            .service(handlers::pages::contacts)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
