//! Error types for KaiCanvas.
//!
//! Library crates use [`KaiCanvasError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all KaiCanvas operations.
#[derive(Debug, thiserror::Error)]
pub enum KaiCanvasError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching a route.
    #[error("network error: {0}")]
    Network(String),

    /// Rich-text markup could not be parsed.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Portable tree could not be rendered.
    #[error("render error: {0}")]
    Render(String),

    /// An enhancer received a parameter value it cannot interpret.
    #[error("enhancer input error for `{parameter}`: {message}")]
    EnhancerInput { parameter: String, message: String },

    /// Failure while traversing a composition.
    #[error("enhancement error: {0}")]
    Enhancement(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (unexpected shape, invalid format, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KaiCanvasError>;

impl KaiCanvasError {
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

    /// Create an enhancer input error for the named parameter.
    pub fn enhancer_input(parameter: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::EnhancerInput {
            parameter: parameter.into(),
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
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
}
