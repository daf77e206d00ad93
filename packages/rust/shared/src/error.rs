//! Error types for mtextstrip.
//!
//! Library crates use [`StripError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all mtextstrip operations.
#[derive(Debug, thiserror::Error)]
pub enum StripError {
    /// Configuration loading or saving error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Drawing document could not be parsed or serialized.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A host container could not be accessed while a batch was running.
    #[error("host error on entity {handle}: {message}")]
    Host { handle: String, message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, StripError>;

impl StripError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Report a container that became inaccessible mid-batch.
    pub fn host(handle: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Host {
            handle: handle.into(),
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = StripError::config("bad selection table");
        assert_eq!(err.to_string(), "config error: bad selection table");

        let err = StripError::host("2F4", "entity is erased");
        assert_eq!(err.to_string(), "host error on entity 2F4: entity is erased");
    }
}
