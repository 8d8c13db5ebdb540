use reqwest::StatusCode;
use sqlx::Error as SqlxError;
use std::path::PathBuf;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("secret is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("{service} responded with status {status}")]
    UpstreamStatus {
        service: &'static str,
        status: StatusCode,
    },

    #[error("timed out waiting for {} after {attempts} attempts", .path.display())]
    Timeout { path: PathBuf, attempts: usize },
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::Config(Box::new(e))
    }
}

impl AppError {
    /// True for the "file does not exist yet" case the readiness poll waits on.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
