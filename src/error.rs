use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the rotation, scanning and Wallhaven layers.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("downloaded file is not a supported image")]
    NotAnImage,
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("another instance is already running")]
    AlreadyRunning,
    #[error("single-instance guard: {0}")]
    SingleInstance(String),
    #[error("tray error: {0}")]
    Tray(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_mentions_code() {
        let err = Error::Status(reqwest::StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn not_a_directory_shows_path() {
        let err = Error::NotADirectory(PathBuf::from("/nope/here"));
        assert_eq!(err.to_string(), "not a directory: /nope/here");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
