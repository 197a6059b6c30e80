use std::io;
use axum::{http::StatusCode, response::{IntoResponse, Response}};

/// Error types for the wiki server
#[derive(Debug, thiserror::Error)]
pub enum WikiError {
    #[error("Not found")]
    NotFound,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Persisting a page failed; the client sees the raw OS error text
    #[error("{0}")]
    Save(io::Error),
    #[error("Template error: {0}")]
    Template(String),
    #[error("Render error: {0}")]
    Render(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl WikiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WikiError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_404() {
        assert_eq!(WikiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(WikiError::NotFound.to_string(), "Not found");
    }

    #[test]
    fn save_error_keeps_raw_message() {
        let err = WikiError::Save(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "permission denied");
    }

    #[test]
    fn render_error_is_500() {
        let err = WikiError::Render("boom".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Render error: boom");
    }
}
