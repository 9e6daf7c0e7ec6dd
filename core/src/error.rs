//! Error types for option declaration and parsing.
//!
//! Every failure aborts the parse that raised it; none are recovered
//! locally. The hosting layer renders these into user-facing messages.

use thiserror::Error;

/// Errors raised while declaring or parsing options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    /// An option token did not resolve in the active collection.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// A required option or argument is missing its value.
    #[error("'{name}' requires a value")]
    RequireValue { name: String },

    /// A value failed its type shape check or attached validator.
    #[error("invalid value '{value}' for '{name}'")]
    InvalidValue { name: String, value: String },

    /// A spec string did not match the declaration grammar.
    #[error("invalid spec string: '{0}'")]
    InvalidSpec(String),

    /// A spec's id or alias is already registered in the collection.
    #[error("duplicate option name: '{0}'")]
    DuplicateOption(String),

    /// `argv[0]` classified as an option instead of a program name.
    #[error("expected argv[0] to be the program name, got '{0}'")]
    ProgramName(String),
}

/// Convenience alias for results with [`OptionError`].
pub type Result<T> = std::result::Result<T, OptionError>;
