pub mod admin_service;
pub mod blog_service;
