use std::fmt;

use thiserror::Error;

use crate::comparison::window::WindowError;
use crate::request::RequestError;
use crate::source::SourceError;
use crate::topk::TopKError;

/// Every way a top-played query can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopPlayedError {
    #[error(transparent)]
    TopK(#[from] TopKError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Request(#[from] RequestError),
}

/// Stable classification of a [`TopPlayedError`], for mapping onto responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidScore,
    MalformedList,
    SourceUnavailable,
    SourceTimeout,
    InvalidWindow,
    InvalidRequest,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::InvalidScore,
        ErrorKind::MalformedList,
        ErrorKind::SourceUnavailable,
        ErrorKind::SourceTimeout,
        ErrorKind::InvalidWindow,
        ErrorKind::InvalidRequest,
    ];

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidScore => "E_INVALID_SCORE",
            ErrorKind::MalformedList => "E_MALFORMED_LIST",
            ErrorKind::SourceUnavailable => "E_SOURCE_UNAVAILABLE",
            ErrorKind::SourceTimeout => "E_SOURCE_TIMEOUT",
            ErrorKind::InvalidWindow => "E_INVALID_WINDOW",
            ErrorKind::InvalidRequest => "E_INVALID_REQUEST",
        }
    }

    /// Timeouts are a flavour of unavailability.
    #[inline]
    pub const fn is_source_unavailable(self) -> bool {
        matches!(self, ErrorKind::SourceUnavailable | ErrorKind::SourceTimeout)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TopPlayedError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TopPlayedError::TopK(TopKError::InvalidScore { .. }) => ErrorKind::InvalidScore,
            TopPlayedError::TopK(TopKError::MalformedList { .. }) => ErrorKind::MalformedList,
            TopPlayedError::Source(SourceError::Timeout { .. }) => ErrorKind::SourceTimeout,
            TopPlayedError::Source(_) => ErrorKind::SourceUnavailable,
            TopPlayedError::Window(_) => ErrorKind::InvalidWindow,
            TopPlayedError::Request(_) => ErrorKind::InvalidRequest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique() {
        let codes: HashSet<&str> = ErrorKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(codes.len(), ErrorKind::ALL.len());
    }

    #[test]
    fn timeout_counts_as_unavailable() {
        assert!(ErrorKind::SourceTimeout.is_source_unavailable());
        assert!(!ErrorKind::InvalidScore.is_source_unavailable());
    }
}
