//! Token classification for raw argv strings.
//!
//! A [`Token`] wraps one raw argument string and derives its classification
//! on demand: long option (`--verbose`), short option (`-v`), combined
//! short-flag cluster (`-abc`), embedded `name=value` pair, or positional.
//! Classification is computed from the raw text alone; whether an option
//! name is *known* is decided against the active
//! [`OptionCollection`](crate::OptionCollection) by the parser.

use crate::OptionCollection;

/// One raw argument string with derived classification.
///
/// # Examples
///
/// ```
/// use command_kit_core::Token;
///
/// assert!(Token::new("--verbose").is_long_option());
/// assert!(Token::new("-v").is_short_option());
/// assert!(Token::new("-abc").is_flag_cluster());
/// assert!(!Token::new("build").is_option());
/// assert_eq!(Token::new("--level=3").option_name(), Some("level"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    raw: &'a str,
}

impl<'a> Token<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    /// The raw argument text.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// `true` for the literal end-of-options marker `--`.
    pub fn is_separator(&self) -> bool {
        self.raw == "--"
    }

    /// `true` for `--name` style options. The bare separator `--` is not
    /// a long option.
    pub fn is_long_option(&self) -> bool {
        self.raw.len() > 2 && self.raw.starts_with("--")
    }

    /// `true` for `-x` style options. A lone `-` is conventionally a
    /// positional (stdin marker), not an option.
    pub fn is_short_option(&self) -> bool {
        self.raw.len() >= 2 && self.raw.starts_with('-') && !self.raw[1..].starts_with('-')
    }

    pub fn is_option(&self) -> bool {
        self.is_long_option() || self.is_short_option()
    }

    /// The option name with dashes stripped, up to any `=`.
    ///
    /// `--foo` and `--foo=bar` both yield `foo`; `-v` yields `v`;
    /// positionals yield `None`.
    pub fn option_name(&self) -> Option<&'a str> {
        if !self.is_option() {
            return None;
        }
        let stripped = self.raw.trim_start_matches('-');
        let name = stripped.split('=').next().unwrap_or(stripped);
        if name.is_empty() { None } else { Some(name) }
    }

    /// `true` when this option's name resolves in `specs`.
    pub fn known_in(&self, specs: &OptionCollection) -> bool {
        self.option_name().is_some_and(|name| specs.contains(name))
    }

    /// `true` for a combined short-flag cluster such as `-abc` or `-vvv`:
    /// a single dash followed by two or more alphanumeric characters.
    pub fn is_flag_cluster(&self) -> bool {
        self.is_short_option()
            && self.raw.len() > 2
            && self.raw[1..].chars().all(|c| c.is_ascii_alphanumeric())
    }

    /// Expands a cluster into its single-character short options:
    /// `-abc` becomes `["-a", "-b", "-c"]`.
    pub fn expand_cluster(&self) -> Vec<String> {
        debug_assert!(self.is_flag_cluster());
        self.raw[1..].chars().map(|c| format!("-{c}")).collect()
    }

    /// Splits an embedded `name=value` pair into its two halves.
    ///
    /// Returns `None` for non-options, for tokens without `=`, and for an
    /// empty value (`--foo=`), mirroring the requirement that the value
    /// part be non-empty.
    pub fn split_value(&self) -> Option<(String, String)> {
        if !self.is_option() {
            return None;
        }
        let (name, value) = self.raw.split_once('=')?;
        if value.is_empty() {
            return None;
        }
        Some((name.to_string(), value.to_string()))
    }
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.raw)
    }
}
