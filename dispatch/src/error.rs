//! Error types for command registration and dispatch.
//!
//! Every variant aborts the entire run; nothing is recovered inside the
//! engine. The hosting layer catches each kind and renders a message
//! (see `Application::run_or_report`).

use thiserror::Error;

use command_kit_core::OptionError;

/// Errors raised while building the command tree or dispatching a run.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Option declaration or parse failure from the core layer.
    #[error(transparent)]
    Option(#[from] OptionError),

    /// A positional token did not resolve to any child command.
    /// Carries the visible sibling names for diagnostics.
    #[error("command '{name}' not found")]
    CommandNotFound { name: String, available: Vec<String> },

    /// Too few positional arguments for the leaf's declared minimum.
    #[error("command '{command}' expects at least {required} argument(s), got {given}")]
    ArgumentNotEnough {
        command: String,
        given: usize,
        required: usize,
    },

    /// A registration-time lookup in the command loader failed.
    #[error("command class '{0}' not found")]
    CommandClassNotFound(String),

    /// An extension was unavailable or failed.
    #[error("extension error: {0}")]
    Extension(String),
}

/// Convenience alias for results with [`DispatchError`].
pub type Result<T> = std::result::Result<T, DispatchError>;
