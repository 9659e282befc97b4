use crate::models::ErrorResponse;
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use std::io::Cursor;
use thiserror::Error;

/// Failure talking to the YouTube Data API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The API answered with an `{"error": {...}}` payload.
    #[error("{0}")]
    Api(String),
    #[error("HTTP {0}")]
    Status(u16),
    /// Built through [`UpstreamError::transport`] so the request URL, which carries
    /// the API key, never ends up in the message.
    #[error("request failed: {0}")]
    Transport(reqwest::Error),
    #[error("unexpected response: {0}")]
    Malformed(String),
}

impl UpstreamError {
    pub fn transport(e: reqwest::Error) -> Self {
        UpstreamError::Transport(e.without_url())
    }

    pub fn malformed(e: reqwest::Error) -> Self {
        UpstreamError::Malformed(e.without_url().to_string())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("YouTube API error: {0}")]
    Upstream(#[from] UpstreamError),
    #[error("snapshot not found: {0}")]
    NotFound(String),
    #[error("snapshot {name} is corrupt: {source}")]
    CorruptSnapshot {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("snapshot store I/O error: {0}")]
    StoreIo(#[from] std::io::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> Status {
        match self {
            AppError::InvalidRequest(_) => Status::BadRequest,
            _ => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let body = ErrorResponse {
            detail: self.to_string(),
        };
        let json = serde_json::to_string(&body).map_err(|_| Status::InternalServerError)?;
        Response::build()
            .status(self.status())
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}
