//! Option specifications and the compact spec-string grammar.
//!
//! An option is declared from a string of the form
//! `<name>[+|?][:<type>]`, where the name part is either a single alias
//! (`verbose`, `v`) or a short|long pair (`v|verbose`):
//!
//! - `+` — multiple arity (repeatable, values accumulate)
//! - `?` — optional arity (consumes at most one value)
//! - neither — required-with-value when a type is given, plain flag
//!   otherwise
//!
//! `level:number` therefore declares a required numeric option, while
//! `q|quiet` declares a boolean flag with a short and a long alias.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{OptionError, Result};
use crate::value::{Validator, Value, ValueType};

static SPEC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<first>[A-Za-z0-9][A-Za-z0-9-]*)(?:\|(?P<second>[A-Za-z0-9][A-Za-z0-9-]+))?(?P<marker>[+?])?(?::(?P<type>[a-z]+))?$",
    )
    .expect("static regex must compile")
});

/// Decomposed spec string, shared between option and argument declarations.
pub(crate) struct SpecParts {
    pub first: String,
    pub second: Option<String>,
    pub marker: Option<char>,
    pub value_type: Option<ValueType>,
}

pub(crate) fn parse_spec_string(spec: &str) -> Result<SpecParts> {
    let caps = SPEC_RE
        .captures(spec)
        .ok_or_else(|| OptionError::InvalidSpec(spec.to_string()))?;

    let value_type = match caps.name("type") {
        Some(m) => Some(
            ValueType::from_name(m.as_str())
                .ok_or_else(|| OptionError::InvalidSpec(spec.to_string()))?,
        ),
        None => None,
    };

    Ok(SpecParts {
        first: caps["first"].to_string(),
        second: caps.name("second").map(|m| m.as_str().to_string()),
        marker: caps.name("marker").and_then(|m| m.as_str().chars().next()),
        value_type,
    })
}

/// How many values an option consumes.
///
/// The categories are mutually exclusive; every predicate on
/// [`OptionSpec`] (`is_flag`, `is_required`, ...) derives from this enum
/// alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arity {
    /// Never consumes a value; presence binds `true`.
    Flag,
    /// Flag variant that counts repetitions (`-vvv`).
    Incremental,
    /// Must consume exactly one following value.
    Required,
    /// Consumes at most one following non-option value.
    Optional,
    /// Repeatable; each occurrence may consume one value, accumulated.
    Multiple,
}

/// A declared option: canonical id, aliases, arity, and value handling.
///
/// # Examples
///
/// ```
/// use command_kit_core::{Arity, OptionSpec};
///
/// let spec = OptionSpec::from_spec("v|verbose").unwrap();
/// assert_eq!(spec.id(), "verbose");
/// assert!(spec.is_flag());
/// assert!(spec.matches("v"));
///
/// let level = OptionSpec::from_spec("level:number").unwrap();
/// assert_eq!(level.arity(), Arity::Required);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionSpec {
    id: String,
    short: Option<String>,
    long: Option<String>,
    arity: Arity,
    value_type: ValueType,
    description: Option<String>,
    default: Option<Value>,
    #[serde(skip)]
    validator: Option<Validator>,
}

impl OptionSpec {
    /// Parses a spec from the compact grammar.
    pub fn from_spec(spec: &str) -> Result<Self> {
        let parts = parse_spec_string(spec)?;

        let (short, long) = match &parts.second {
            Some(second) => {
                if parts.first.len() != 1 {
                    return Err(OptionError::InvalidSpec(spec.to_string()));
                }
                (Some(parts.first.clone()), Some(second.clone()))
            }
            None if parts.first.len() == 1 => (Some(parts.first.clone()), None),
            None => (None, Some(parts.first.clone())),
        };

        let arity = match parts.marker {
            Some('+') => Arity::Multiple,
            Some('?') => Arity::Optional,
            _ if parts.value_type.is_some() => Arity::Required,
            _ => Arity::Flag,
        };

        let id = long
            .clone()
            .or_else(|| short.clone())
            .expect("spec grammar guarantees at least one alias");

        Ok(Self {
            id,
            short,
            long,
            arity,
            value_type: parts.value_type.unwrap_or_default(),
            description: None,
            default: None,
            validator: None,
        })
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Overrides the canonical id (normally the long alias, falling back
    /// to the short one).
    pub fn with_key(mut self, key: &str) -> Self {
        self.id = key.to_string();
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Restricts the value to a fixed choice set.
    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.value_type = ValueType::Choice(values.iter().map(|v| v.to_string()).collect());
        self
    }

    /// Turns a flag into an incremental counter. Only meaningful for
    /// flag-arity specs; value-consuming arities are left unchanged.
    pub fn incremental(mut self) -> Self {
        if self.arity == Arity::Flag {
            self.arity = Arity::Incremental;
        }
        self
    }

    /// The canonical registered id, regardless of which alias matched.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn short(&self) -> Option<&str> {
        self.short.as_deref()
    }

    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// All names this spec answers to (aliases plus the canonical id).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        [self.short.as_deref(), self.long.as_deref(), Some(self.id())]
            .into_iter()
            .flatten()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }

    pub fn is_flag(&self) -> bool {
        matches!(self.arity, Arity::Flag | Arity::Incremental)
    }

    pub fn is_incremental(&self) -> bool {
        self.arity == Arity::Incremental
    }

    pub fn is_required(&self) -> bool {
        self.arity == Arity::Required
    }

    pub fn is_optional(&self) -> bool {
        self.arity == Arity::Optional
    }

    pub fn is_multiple(&self) -> bool {
        self.arity == Arity::Multiple
    }

    /// Runs the type shape check and the attached validator against a raw
    /// value string.
    pub fn validate_value(&self, value: &str) -> Result<()> {
        let ok = self.value_type.accepts(value)
            && self.validator.as_ref().is_none_or(|v| v.check(value));
        if ok {
            Ok(())
        } else {
            Err(OptionError::InvalidValue {
                name: self.id.clone(),
                value: value.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_spec() {
        let spec = OptionSpec::from_spec("v|verbose").unwrap();
        assert_eq!(spec.id(), "verbose");
        assert_eq!(spec.short(), Some("v"));
        assert_eq!(spec.long(), Some("verbose"));
        assert_eq!(spec.arity(), Arity::Flag);
        assert!(spec.matches("v"));
        assert!(spec.matches("verbose"));
        assert!(!spec.matches("x"));
    }

    #[test]
    fn test_typed_spec_is_required() {
        let spec = OptionSpec::from_spec("level:number").unwrap();
        assert_eq!(spec.arity(), Arity::Required);
        assert_eq!(spec.value_type(), &ValueType::Number);
    }

    #[test]
    fn test_optional_untyped_spec() {
        let spec = OptionSpec::from_spec("log-path?").unwrap();
        assert_eq!(spec.id(), "log-path");
        assert_eq!(spec.arity(), Arity::Optional);
        assert_eq!(spec.value_type(), &ValueType::Any);
    }

    #[test]
    fn test_multiple_typed_spec() {
        let spec = OptionSpec::from_spec("t|tag+:string").unwrap();
        assert_eq!(spec.arity(), Arity::Multiple);
        assert_eq!(spec.id(), "tag");
    }

    #[test]
    fn test_short_only_spec() {
        let spec = OptionSpec::from_spec("x").unwrap();
        assert_eq!(spec.id(), "x");
        assert_eq!(spec.short(), Some("x"));
        assert_eq!(spec.long(), None);
    }

    #[test]
    fn test_incremental_builder() {
        let spec = OptionSpec::from_spec("v|verbose").unwrap().incremental();
        assert!(spec.is_incremental());
        assert!(spec.is_flag());
    }

    #[test]
    fn test_key_override() {
        let spec = OptionSpec::from_spec("c|config:file").unwrap().with_key("config-path");
        assert_eq!(spec.id(), "config-path");
        assert!(spec.matches("config-path"));
        assert!(spec.matches("c"));
    }

    #[test]
    fn test_invalid_spec_strings() {
        assert!(OptionSpec::from_spec("").is_err());
        assert!(OptionSpec::from_spec("foo:bogus").is_err());
        assert!(OptionSpec::from_spec("long|other").is_err());
    }

    #[test]
    fn test_validate_value_type_and_predicate() {
        let spec = OptionSpec::from_spec("level:number")
            .unwrap()
            .with_validator(Validator::new(|v| v.parse::<i64>().is_ok_and(|n| n > 0)));
        assert!(spec.validate_value("3").is_ok());
        assert!(spec.validate_value("abc").is_err());
        assert!(spec.validate_value("-2").is_err());
    }
}
