use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("post not found: {0}")]
    PostNotFound(String),
    #[error("tag not found: {0}")]
    TagNotFound(String),
    #[error("comment not found: {0}")]
    CommentNotFound(Uuid),
    #[error("author not found: {0}")]
    AuthorNotFound(Uuid),
    #[error("tag already exists: {0}")]
    TagAlreadyExists(String),
    #[error("slug already taken: {0}")]
    SlugTaken(String),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::PostNotFound(_)
            | DomainError::TagNotFound(_)
            | DomainError::CommentNotFound(_)
            | DomainError::AuthorNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::TagAlreadyExists(_) | DomainError::SlugTaken(_) => StatusCode::CONFLICT,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        let details = match self {
            DomainError::PostNotFound(resource) | DomainError::TagNotFound(resource) => {
                Some(json!({ "resource": resource }))
            }
            DomainError::TagAlreadyExists(title) => Some(json!({ "title": title })),
            DomainError::SlugTaken(slug) => Some(json!({ "slug": slug })),
            _ => None,
        };
        let body = ErrorBody {
            error: message.as_str(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
