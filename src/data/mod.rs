pub mod comment_repository;
#[cfg(test)]
pub mod fakes;
pub mod post_repository;
pub mod tag_repository;
pub mod user_repository;
