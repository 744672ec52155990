pub mod comment;
pub mod error;
pub mod post;
pub mod tag;
pub mod user;
