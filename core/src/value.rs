//! Bound values, value type tags, and pluggable validators.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Value type tag for options and positional arguments.
///
/// The engine never interprets value *semantics* beyond the shape check in
/// [`accepts`](ValueType::accepts); richer validation belongs to a
/// [`Validator`].
///
/// # Examples
///
/// ```
/// use command_kit_core::ValueType;
///
/// assert!(ValueType::Number.accepts("42"));
/// assert!(!ValueType::Number.accepts("many"));
///
/// let fmt = ValueType::Choice(vec!["json".into(), "plain".into()]);
/// assert!(fmt.accepts("json"));
/// assert!(!fmt.accepts("xml"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValueType {
    /// Boolean-ish value (`true`/`false`/`1`/`0`/`yes`/`no`).
    Bool,
    /// Arbitrary string.
    String,
    /// Numeric value.
    Number,
    /// File path (shape only; existence is never checked).
    File,
    /// Directory path (shape only).
    Directory,
    /// URL with a scheme.
    Url,
    /// One of a fixed set of values.
    Choice(Vec<String>),
    /// Unconstrained (the default).
    #[default]
    Any,
}

impl ValueType {
    /// Resolves a type name from the compact spec grammar (`:number`,
    /// `:file`, ...). Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bool" | "boolean" => Some(Self::Bool),
            "string" | "str" => Some(Self::String),
            "number" | "int" => Some(Self::Number),
            "file" => Some(Self::File),
            "dir" | "directory" => Some(Self::Directory),
            "url" => Some(Self::Url),
            "any" => Some(Self::Any),
            _ => None,
        }
    }

    /// Shape check for a raw value string.
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            Self::Bool => matches!(
                raw.to_ascii_lowercase().as_str(),
                "true" | "false" | "1" | "0" | "yes" | "no"
            ),
            Self::String | Self::Any => true,
            Self::Number => raw.parse::<f64>().is_ok(),
            Self::File | Self::Directory => !raw.is_empty(),
            Self::Url => raw.contains("://"),
            Self::Choice(values) => values.iter().any(|v| v == raw),
        }
    }
}

/// A value bound to an option during parsing.
///
/// `Count` carries incremental-flag repetitions; `List` carries the
/// accumulated values of a multiple-arity option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Count(u64),
    Str(String),
    List(Vec<String>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            Self::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Count(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
            Self::List(values) => f.write_str(&values.join(",")),
        }
    }
}

/// Cloneable wrapper around a user-supplied value predicate.
///
/// Validators run after the [`ValueType`] shape check and veto a value by
/// returning `false`.
///
/// # Examples
///
/// ```
/// use command_kit_core::Validator;
///
/// let even = Validator::new(|v| v.parse::<i64>().map(|n| n % 2 == 0).unwrap_or(false));
/// assert!(even.check("4"));
/// assert!(!even.check("3"));
/// ```
#[derive(Clone)]
pub struct Validator(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl Validator {
    pub fn new(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn check(&self, value: &str) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}
