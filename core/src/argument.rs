//! Declared positional arguments.
//!
//! An [`ArgumentDecl`] is the *schema* of one positional parameter —
//! name, requiredness, multiplicity, type tag, valid-value set, and
//! validator. The parsed positional strings live separately, in
//! [`OptionResult`](crate::OptionResult) and in the dispatch layer's
//! bound argument list.

use serde::{Deserialize, Serialize};

use crate::error::{OptionError, Result};
use crate::spec::parse_spec_string;
use crate::value::{Validator, ValueType};

/// Declared positional parameter of a command.
///
/// Uses the same compact grammar as options: `<name>[+|?][:<type>]`,
/// where `+` marks a trailing variadic argument and `?` an optional one.
///
/// # Examples
///
/// ```
/// use command_kit_core::ArgumentDecl;
///
/// let src = ArgumentDecl::from_spec("source:file").unwrap();
/// assert!(src.is_required());
///
/// let rest = ArgumentDecl::from_spec("paths+").unwrap();
/// assert!(rest.is_multiple());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentDecl {
    name: String,
    description: Option<String>,
    optional: bool,
    multiple: bool,
    value_type: ValueType,
    valid_values: Vec<String>,
    suggestions: Vec<String>,
    #[serde(skip)]
    validator: Option<Validator>,
}

impl ArgumentDecl {
    pub fn from_spec(spec: &str) -> Result<Self> {
        let parts = parse_spec_string(spec)?;
        if parts.second.is_some() {
            // aliases make no sense for positionals
            return Err(OptionError::InvalidSpec(spec.to_string()));
        }

        Ok(Self {
            name: parts.first,
            description: None,
            optional: parts.marker == Some('?'),
            multiple: parts.marker == Some('+'),
            value_type: parts.value_type.unwrap_or_default(),
            valid_values: Vec::new(),
            suggestions: Vec::new(),
            validator: None,
        })
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Restricts the argument to a fixed value set.
    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.valid_values = values.iter().map(|v| v.to_string()).collect();
        self
    }

    /// Completion hints for hosting layers; never used for validation.
    pub fn suggest(mut self, values: &[&str]) -> Self {
        self.suggestions = values.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_required(&self) -> bool {
        !self.optional
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Validates one token against the type tag, valid-value set, and
    /// attached validator.
    pub fn validate(&self, value: &str) -> Result<()> {
        let ok = self.value_type.accepts(value)
            && (self.valid_values.is_empty() || self.valid_values.iter().any(|v| v == value))
            && self.validator.as_ref().is_none_or(|v| v.check(value));
        if ok {
            Ok(())
        } else {
            Err(OptionError::InvalidValue {
                name: self.name.clone(),
                value: value.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_by_default() {
        let decl = ArgumentDecl::from_spec("name").unwrap();
        assert!(decl.is_required());
        assert!(!decl.is_multiple());
    }

    #[test]
    fn test_optional_marker() {
        let decl = ArgumentDecl::from_spec("target?").unwrap();
        assert!(decl.is_optional());
    }

    #[test]
    fn test_typed_validation() {
        let decl = ArgumentDecl::from_spec("count:number").unwrap();
        assert!(decl.validate("12").is_ok());
        assert!(decl.validate("twelve").is_err());
    }

    #[test]
    fn test_valid_value_set() {
        let decl = ArgumentDecl::from_spec("format").unwrap().one_of(&["json", "plain"]);
        assert!(decl.validate("json").is_ok());
        let err = decl.validate("xml").unwrap_err();
        assert_eq!(
            err,
            OptionError::InvalidValue {
                name: "format".into(),
                value: "xml".into()
            }
        );
    }

    #[test]
    fn test_alias_pair_rejected() {
        assert!(ArgumentDecl::from_spec("a|arg").is_err());
    }
}
