//! Error types for the transfer client.
//!
//! Remote non-success statuses are NOT errors here - they are surfaced as
//! data on [`TransferResult`](super::TransferResult) and
//! [`UploadOutcome`](super::UploadOutcome). This enum covers the failures
//! that prevent a response from being obtained or persisted at all.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while talking to the FileTransfer endpoint or
/// persisting its responses locally.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Network-level error (DNS resolution, connection refused, TLS errors,
    /// timeout, etc.). Propagated unmodified - this client adds no
    /// resilience layer.
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The NTLM handshake could not be completed (undecodable challenge,
    /// message encoding failure, unexpected message type).
    #[error("NTLM authentication failed: {reason}")]
    Auth {
        /// What went wrong during the handshake.
        reason: String,
    },

    /// File system error while reading an upload source or writing a
    /// downloaded file.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The glob pattern given to a batch upload is malformed.
    #[error("invalid glob pattern {pattern}: {source}")]
    Pattern {
        /// The full pattern that failed to parse.
        pattern: String,
        /// The underlying pattern error.
        #[source]
        source: glob::PatternError,
    },

    /// The base server address is malformed or an endpoint path could not
    /// be joined onto it.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The offending URL string.
        url: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },
}

impl TransferError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an authentication handshake error.
    pub fn auth(reason: impl Into<String>) -> Self {
        Self::Auth {
            reason: reason.into(),
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            source,
        }
    }
}

// Note on From trait implementations:
// We intentionally do NOT implement `From<reqwest::Error>` or
// `From<std::io::Error>` because the variants require context (url, path)
// that the source errors don't carry. The helper constructors are the
// pattern used instead.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let error = TransferError::auth("server sent no challenge");
        let msg = error.to_string();
        assert!(msg.contains("NTLM"), "Expected 'NTLM' in: {msg}");
        assert!(msg.contains("no challenge"), "Expected reason in: {msg}");
    }

    #[test]
    fn test_io_error_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = TransferError::io(PathBuf::from("/tmp/export.zip"), io_error);
        let msg = error.to_string();
        assert!(msg.contains("/tmp/export.zip"), "Expected path in: {msg}");
    }

    #[test]
    fn test_invalid_url_display() {
        let source = url::Url::parse("not-a-url").unwrap_err();
        let error = TransferError::invalid_url("not-a-url", source);
        let msg = error.to_string();
        assert!(msg.contains("invalid URL"), "Expected prefix in: {msg}");
        assert!(msg.contains("not-a-url"), "Expected URL in: {msg}");
    }
}
