// src/error/types.rs
//
// Error Types - failure classification shared by every layer
//
// CRITICAL RULES:
// - Every fetcher failure carries an ErrorKind
// - Other never matches anything, itself included
// - Context endings map to ContextCanceled (cancel) or Timeout (deadline)
// - Public operations return Error; fetchers return FetchError

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::aggregate::LookupError;
use crate::domain::InvalidCode;
use crate::infrastructure::Done;

/// Coarse classification of a failure, for callers that branch on the
/// category rather than on the message.
///
/// `Other` is not comparable: two `Other` failures are never considered
/// the same kind. Use [`ErrorKind::matches`] instead of `==` when that
/// matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    CodeNotFound,
    ContextCanceled,
    InvalidCode,
    Timeout,
    DecodeError,
    Other,
}

impl ErrorKind {
    /// Same kind, and neither side is `Other`.
    pub fn matches(self, other: ErrorKind) -> bool {
        self != ErrorKind::Other && other != ErrorKind::Other && self == other
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::CodeNotFound => write!(f, "CEP not found"),
            ErrorKind::ContextCanceled => write!(f, "context canceled"),
            ErrorKind::InvalidCode => write!(f, "invalid CEP"),
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::DecodeError => write!(f, "decode error"),
            ErrorKind::Other => write!(f, "other"),
        }
    }
}

/// A single classified failure reported by one fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: ErrorKind,
    fetcher: Option<&'static str>,
    message: String,
}

impl FetchError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            fetcher: None,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(ErrorKind::CodeNotFound, "no record for this CEP")
    }

    pub fn decode(err: impl fmt::Display) -> Self {
        Self::new(ErrorKind::DecodeError, err.to_string())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Other, message)
    }

    /// Tags the failure with the fetcher that produced it. An existing tag
    /// is kept.
    pub fn with_fetcher(mut self, name: &'static str) -> Self {
        if self.fetcher.is_none() {
            self.fetcher = Some(name);
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn fetcher(&self) -> Option<&'static str> {
        self.fetcher
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.fetcher {
            write!(f, "{}: ", name)?;
        }
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

impl From<Done> for FetchError {
    fn from(done: Done) -> Self {
        let kind = match done {
            Done::Canceled => ErrorKind::ContextCanceled,
            Done::DeadlineExceeded => ErrorKind::Timeout,
        };
        FetchError::new(kind, done.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_decode() {
            ErrorKind::DecodeError
        } else {
            ErrorKind::Other
        };
        FetchError::new(kind, err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::decode(err)
    }
}

/// Errors returned by the public API.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid CEP: {0}")]
    InvalidCode(#[from] InvalidCode),

    /// The fetcher set was empty, so no lookup could ever succeed.
    #[error("no fetchers configured")]
    NoFetchers,

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidCode(_) => ErrorKind::InvalidCode,
            Error::Lookup(lookup) => lookup.kind(),
            Error::NoFetchers | Error::Client(_) => ErrorKind::Other,
        }
    }

    /// Kind comparison with the `Other` rule applied.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind().matches(kind)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
