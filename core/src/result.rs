//! Parsed option results.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::spec::OptionSpec;
use crate::value::Value;

/// One option that appeared during a parse: the resolved spec plus the
/// value bound to it.
///
/// `value == None` encodes "present with no value" — an optional-arity
/// option given without a following value. This is distinct from both a
/// default-filled value and from the option being absent entirely (no
/// entry in the result).
#[derive(Debug, Clone, Serialize)]
pub struct BoundOption {
    pub spec: OptionSpec,
    pub value: Option<Value>,
}

/// The output of one parse segment: option id → [`BoundOption`], plus the
/// residual positional arguments.
///
/// # Examples
///
/// ```
/// use command_kit_core::{ContinuousParser, OptionCollection};
///
/// let mut opts = OptionCollection::new();
/// opts.add_spec("level:number", "").unwrap();
///
/// let argv: Vec<String> = ["prog", "--level", "3"].iter().map(|s| s.to_string()).collect();
/// let mut parser = ContinuousParser::new(opts);
/// let result = parser.parse(&argv).unwrap();
///
/// assert_eq!(result.get_str("level"), Some("3"));
/// assert!(result.has("level"));
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct OptionResult {
    options: BTreeMap<String, BoundOption>,
    arguments: Vec<String>,
}

impl OptionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a value (or a present-without-value marker) for a spec.
    /// Rebinding the same id overwrites the previous value.
    pub fn set(&mut self, spec: OptionSpec, value: Option<Value>) {
        self.options
            .insert(spec.id().to_string(), BoundOption { spec, value });
    }

    pub fn has(&self, id: &str) -> bool {
        self.options.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&BoundOption> {
        self.options.get(id)
    }

    /// The bound value for an id, if the option was seen and carries one.
    pub fn value(&self, id: &str) -> Option<&Value> {
        self.options.get(id).and_then(|bound| bound.value.as_ref())
    }

    pub fn get_str(&self, id: &str) -> Option<&str> {
        self.value(id).and_then(Value::as_str)
    }

    /// Parses a string-bound value as an integer.
    pub fn get_int(&self, id: &str) -> Option<i64> {
        self.get_str(id).and_then(|s| s.parse().ok())
    }

    /// `true` when a flag id was seen (bound true or present).
    pub fn get_bool(&self, id: &str) -> bool {
        match self.options.get(id) {
            Some(bound) => bound.value.as_ref().and_then(Value::as_bool).unwrap_or(true),
            None => false,
        }
    }

    /// Repetition count for an incremental flag; 0 when absent.
    pub fn count(&self, id: &str) -> u64 {
        self.value(id).and_then(Value::as_count).unwrap_or(0)
    }

    pub fn get_list(&self, id: &str) -> Option<&[String]> {
        self.value(id).and_then(Value::as_list)
    }

    pub fn add_argument(&mut self, arg: String) {
        self.arguments.push(arg);
    }

    /// Residual positional arguments, in order of appearance.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundOption)> {
        self.options.iter().map(|(id, bound)| (id.as_str(), bound))
    }

    /// Number of bound options (positionals not included).
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Merges another result into this one, used when a later parse
    /// segment at the same scope yields more matches.
    ///
    /// Counts add up and lists concatenate, so repetitions split across
    /// segments accumulate; any other incoming value overwrites.
    pub fn merge(&mut self, other: OptionResult) {
        for (id, incoming) in other.options {
            match (self.options.get_mut(&id), incoming.value) {
                (Some(existing), Some(Value::Count(n))) => {
                    let prior = existing.value.as_ref().and_then(Value::as_count).unwrap_or(0);
                    existing.value = Some(Value::Count(prior + n));
                }
                (Some(existing), Some(Value::List(values))) => {
                    match &mut existing.value {
                        Some(Value::List(list)) => list.extend(values),
                        _ => existing.value = Some(Value::List(values)),
                    }
                }
                (Some(existing), value) => existing.value = value,
                (None, value) => {
                    self.options.insert(id, BoundOption { spec: incoming.spec, value });
                }
            }
        }
        self.arguments.extend(other.arguments);
    }
}
