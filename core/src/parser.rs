//! Continuous option parsing over an argument vector.
//!
//! [`ContinuousParser`] scans argv against a *currently active*
//! [`OptionCollection`]. The collection can be swapped mid-stream (when
//! dispatch descends into a subcommand) without restarting tokenization:
//! the scan position persists and the very next token is re-evaluated
//! against the new spec set.
//!
//! The scanner stops at every positional token and hands control back to
//! the caller, which decides whether the token names a subcommand or is a
//! plain argument (see the dispatch layer).

use std::collections::HashSet;

use tracing::debug;

use crate::collection::OptionCollection;
use crate::error::{OptionError, Result};
use crate::result::OptionResult;
use crate::spec::{Arity, OptionSpec};
use crate::token::Token;
use crate::value::Value;

/// Stateful scanner driving arity-based value consumption.
///
/// # Examples
///
/// ```
/// use command_kit_core::{ContinuousParser, OptionCollection};
///
/// let mut opts = OptionCollection::new();
/// opts.add_spec("v|verbose", "").unwrap();
/// opts.add_spec("level:number", "").unwrap();
///
/// let argv: Vec<String> = ["prog", "-v", "--level=3", "build"]
///     .iter().map(|s| s.to_string()).collect();
/// let mut parser = ContinuousParser::new(opts);
/// let result = parser.parse(&argv).unwrap();
///
/// assert!(result.get_bool("verbose"));
/// assert_eq!(result.get_int("level"), Some(3));
/// // the scan stopped at the positional token
/// assert_eq!(parser.current(), Some("build"));
/// ```
#[derive(Debug)]
pub struct ContinuousParser {
    specs: OptionCollection,
    tokens: Vec<String>,
    pos: usize,
    literal: bool,
    /// Ids bound (explicitly or by default fill) under the current
    /// collection; prevents default re-fill across leaf-side segments.
    seen: HashSet<String>,
}

impl ContinuousParser {
    pub fn new(specs: OptionCollection) -> Self {
        Self {
            specs,
            tokens: Vec::new(),
            pos: 0,
            literal: false,
            seen: HashSet::new(),
        }
    }

    /// Swaps the active collection. The scan position is untouched; the
    /// default-fill bookkeeping resets for the new scope.
    pub fn set_specs(&mut self, specs: OptionCollection) {
        self.specs = specs;
        self.seen.clear();
    }

    /// Loads a full argument vector and parses the leading option
    /// segment. `argv[0]` must be the program name.
    pub fn parse(&mut self, argv: &[String]) -> Result<OptionResult> {
        let program = argv
            .first()
            .ok_or_else(|| OptionError::ProgramName(String::new()))?;
        if Token::new(program).is_option() {
            return Err(OptionError::ProgramName(program.clone()));
        }

        self.tokens = argv[1..].to_vec();
        self.pos = 0;
        self.literal = false;
        self.seen.clear();
        self.continue_parse()
    }

    /// `true` once every token has been consumed.
    pub fn is_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// The token at the current scan position.
    pub fn current(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    /// Consumes and returns the current token.
    pub fn advance(&mut self) -> Option<String> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(token)
    }

    /// Resumes scanning from the current position until the next
    /// positional token or the end of the vector, then fills defaults for
    /// specs of the active collection not yet bound in this scope.
    pub fn continue_parse(&mut self) -> Result<OptionResult> {
        let mut result = OptionResult::new();

        while self.pos < self.tokens.len() {
            let raw = self.tokens[self.pos].clone();
            let token = Token::new(&raw);

            if !self.literal && token.is_separator() {
                self.literal = true;
                self.tokens.remove(self.pos);
                continue;
            }

            if self.literal || !token.is_option() {
                break;
            }

            // Splice a combined cluster back into the stream and
            // re-evaluate from the same position.
            if token.is_flag_cluster() {
                let expanded = token.expand_cluster();
                debug!(cluster = raw, count = expanded.len(), "expanding short-flag cluster");
                self.tokens.splice(self.pos..self.pos + 1, expanded);
                continue;
            }

            // Split `name=value` into two logical tokens, but only when
            // the name resolves in the active collection.
            if let Some((name, value)) = token.split_value() {
                if Token::new(&name).known_in(&self.specs) {
                    self.tokens.splice(self.pos..self.pos + 1, [name, value]);
                    continue;
                }
            }

            let Some(name) = token.option_name() else {
                break;
            };
            let Some(spec) = self.specs.get(name).cloned() else {
                return Err(OptionError::InvalidOption(raw));
            };

            let name = name.to_string();
            self.pos += 1;
            self.consume_value(&spec, &name, &mut result)?;
            self.seen.insert(spec.id().to_string());
        }

        self.fill_defaults(&mut result);
        Ok(result)
    }

    /// Decides value consumption against the next token based on arity.
    fn consume_value(
        &mut self,
        spec: &OptionSpec,
        name: &str,
        result: &mut OptionResult,
    ) -> Result<()> {
        if spec.is_flag() {
            if spec.is_incremental() {
                let prior = result.value(spec.id()).and_then(Value::as_count).unwrap_or(0);
                result.set(spec.clone(), Some(Value::Count(prior + 1)));
            } else {
                result.set(spec.clone(), Some(Value::Bool(true)));
            }
            return Ok(());
        }

        // A following token qualifies as a value when it exists, is not
        // the end-of-options marker, and does not resolve as a known
        // option in the active collection.
        let next_qualifies = match self.tokens.get(self.pos) {
            Some(next) if !next.is_empty() && next != "--" => {
                !Token::new(next).known_in(&self.specs)
            }
            _ => false,
        };

        match spec.arity() {
            Arity::Required => {
                if !next_qualifies {
                    return Err(OptionError::RequireValue {
                        name: name.to_string(),
                    });
                }
                let value = self.take_next();
                spec.validate_value(&value)?;
                result.set(spec.clone(), Some(Value::Str(value)));
            }
            Arity::Multiple => {
                let mut list = result
                    .value(spec.id())
                    .and_then(Value::as_list)
                    .map(<[String]>::to_vec)
                    .unwrap_or_default();
                if next_qualifies {
                    let value = self.take_next();
                    spec.validate_value(&value)?;
                    list.push(value);
                }
                result.set(spec.clone(), Some(Value::List(list)));
            }
            Arity::Optional => {
                if next_qualifies {
                    let value = self.take_next();
                    spec.validate_value(&value)?;
                    result.set(spec.clone(), Some(Value::Str(value)));
                } else {
                    // present with no value
                    result.set(spec.clone(), None);
                }
            }
            Arity::Flag | Arity::Incremental => unreachable!("handled above"),
        }
        Ok(())
    }

    fn take_next(&mut self) -> String {
        let value = self.tokens[self.pos].clone();
        self.pos += 1;
        value
    }

    /// Binds declared defaults for every spec in the active collection
    /// that has not been bound in this scope yet. Runs once per segment,
    /// so swapped-in collections get their own fill.
    fn fill_defaults(&mut self, result: &mut OptionResult) {
        for spec in self.specs.iter() {
            if let Some(default) = spec.default() {
                if !self.seen.contains(spec.id()) && !result.has(spec.id()) {
                    result.set(spec.clone(), Some(default.clone()));
                    self.seen.insert(spec.id().to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Validator;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("prog")
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    }

    fn collection(specs: &[&str]) -> OptionCollection {
        let mut opts = OptionCollection::new();
        for spec in specs {
            opts.add_spec(spec, "").unwrap();
        }
        opts
    }

    #[test]
    fn test_required_value_from_next_token() {
        let mut parser = ContinuousParser::new(collection(&["level:number"]));
        let result = parser.parse(&argv(&["--level", "3"])).unwrap();
        assert_eq!(result.get_int("level"), Some(3));
        assert!(parser.is_end());
    }

    #[test]
    fn test_equals_form_is_equivalent() {
        let mut a = ContinuousParser::new(collection(&["level:number"]));
        let mut b = ContinuousParser::new(collection(&["level:number"]));
        let ra = a.parse(&argv(&["--level", "3"])).unwrap();
        let rb = b.parse(&argv(&["--level=3"])).unwrap();
        assert_eq!(ra.get_int("level"), rb.get_int("level"));
    }

    #[test]
    fn test_reparse_is_deterministic() {
        let specs = collection(&["v|verbose", "level:number", "t|tag+"]);
        let args = argv(&["-v", "--level", "3", "--tag", "a", "--tag", "b"]);

        let r1 = ContinuousParser::new(specs.clone()).parse(&args).unwrap();
        let r2 = ContinuousParser::new(specs).parse(&args).unwrap();

        assert_eq!(r1.get_bool("verbose"), r2.get_bool("verbose"));
        assert_eq!(r1.get_int("level"), r2.get_int("level"));
        assert_eq!(r1.get_list("tag"), r2.get_list("tag"));
        assert_eq!(r1.len(), r2.len());
    }

    #[test]
    fn test_cluster_equivalent_to_separate_flags() {
        let specs = collection(&["a", "b", "c"]);
        let combined = ContinuousParser::new(specs.clone())
            .parse(&argv(&["-abc"]))
            .unwrap();
        let separate = ContinuousParser::new(specs)
            .parse(&argv(&["-a", "-b", "-c"]))
            .unwrap();

        for id in ["a", "b", "c"] {
            assert!(combined.get_bool(id), "combined missing {id}");
            assert!(separate.get_bool(id), "separate missing {id}");
        }
    }

    #[test]
    fn test_unknown_option_is_fatal() {
        let mut parser = ContinuousParser::new(collection(&["v|verbose"]));
        let err = parser.parse(&argv(&["--bogus"])).unwrap_err();
        assert_eq!(err, OptionError::InvalidOption("--bogus".to_string()));
    }

    #[test]
    fn test_required_missing_value() {
        let mut parser = ContinuousParser::new(collection(&["level:number"]));
        let err = parser.parse(&argv(&["--level"])).unwrap_err();
        assert_eq!(
            err,
            OptionError::RequireValue {
                name: "level".to_string()
            }
        );
    }

    #[test]
    fn test_required_rejects_known_option_as_value() {
        let mut parser = ContinuousParser::new(collection(&["level:number", "v|verbose"]));
        let err = parser.parse(&argv(&["--level", "-v"])).unwrap_err();
        assert!(matches!(err, OptionError::RequireValue { .. }));
    }

    #[test]
    fn test_unknown_option_shaped_token_consumed_as_value() {
        // "-x" is not a registered option, so it qualifies as a value.
        let mut parser = ContinuousParser::new(collection(&["level:string"]));
        let result = parser.parse(&argv(&["--level", "-x"])).unwrap();
        assert_eq!(result.get_str("level"), Some("-x"));
    }

    #[test]
    fn test_incremental_counts_repetitions() {
        let mut opts = OptionCollection::new();
        opts.add(OptionSpec::from_spec("v|verbose").unwrap().incremental())
            .unwrap();

        let mut parser = ContinuousParser::new(opts);
        let result = parser.parse(&argv(&["-vvv"])).unwrap();
        assert_eq!(result.count("verbose"), 3);
    }

    #[test]
    fn test_multiple_accumulates() {
        let mut parser = ContinuousParser::new(collection(&["t|tag+"]));
        let result = parser.parse(&argv(&["--tag", "x", "--tag", "y"])).unwrap();
        assert_eq!(result.get_list("tag"), Some(&["x".to_string(), "y".to_string()][..]));
    }

    #[test]
    fn test_optional_present_without_value() {
        let mut parser = ContinuousParser::new(collection(&["log-path?", "v|verbose"]));
        let result = parser.parse(&argv(&["--log-path", "-v"])).unwrap();
        assert!(result.has("log-path"));
        assert_eq!(result.value("log-path"), None);
        assert!(result.get_bool("verbose"));
    }

    #[test]
    fn test_optional_consumes_one_value() {
        let mut parser = ContinuousParser::new(collection(&["log-path?"]));
        let result = parser.parse(&argv(&["--log-path", "/tmp/x.log"])).unwrap();
        assert_eq!(result.get_str("log-path"), Some("/tmp/x.log"));
    }

    #[test]
    fn test_default_fill_for_unset_spec() {
        let mut opts = OptionCollection::new();
        opts.add(
            OptionSpec::from_spec("format:string")
                .unwrap()
                .with_default(Value::Str("plain".into())),
        )
        .unwrap();

        let mut parser = ContinuousParser::new(opts);
        let result = parser.parse(&argv(&[])).unwrap();
        assert_eq!(result.get_str("format"), Some("plain"));
    }

    #[test]
    fn test_default_not_refilled_after_explicit_set() {
        let mut opts = OptionCollection::new();
        opts.add(
            OptionSpec::from_spec("format:string")
                .unwrap()
                .with_default(Value::Str("plain".into())),
        )
        .unwrap();

        let mut parser = ContinuousParser::new(opts);
        let mut first = parser.parse(&argv(&["--format", "json", "rest"])).unwrap();
        assert_eq!(parser.current(), Some("rest"));

        parser.advance();
        let second = parser.continue_parse().unwrap();
        first.merge(second);
        // the later segment must not overwrite the explicit value with the default
        assert_eq!(first.get_str("format"), Some("json"));
    }

    #[test]
    fn test_scan_stops_at_positional() {
        let mut parser = ContinuousParser::new(collection(&["v|verbose"]));
        let result = parser.parse(&argv(&["-v", "build", "--target"])).unwrap();
        assert!(result.get_bool("verbose"));
        assert_eq!(parser.current(), Some("build"));
        assert!(!parser.is_end());
    }

    #[test]
    fn test_double_dash_turns_rest_positional() {
        let mut parser = ContinuousParser::new(collection(&["v|verbose"]));
        let result = parser.parse(&argv(&["-v", "--", "-x", "--weird"])).unwrap();
        assert!(result.get_bool("verbose"));
        // the marker itself is consumed; everything after is positional
        assert_eq!(parser.advance().as_deref(), Some("-x"));
        assert_eq!(parser.advance().as_deref(), Some("--weird"));
        assert!(parser.is_end());
    }

    #[test]
    fn test_scope_swap_resumes_at_position() {
        let mut parser = ContinuousParser::new(collection(&["v|verbose"]));
        let root = parser
            .parse(&argv(&["-v", "build", "--target", "x"]))
            .unwrap();
        assert!(root.get_bool("verbose"));
        assert_eq!(parser.current(), Some("build"));

        parser.advance();
        parser.set_specs(collection(&["target:string"]));
        let child = parser.continue_parse().unwrap();
        assert_eq!(child.get_str("target"), Some("x"));
        assert!(!child.has("verbose"));
        assert!(parser.is_end());
    }

    #[test]
    fn test_child_option_invalid_in_root_scope() {
        let mut parser = ContinuousParser::new(collection(&["v|verbose"]));
        let err = parser.parse(&argv(&["--target", "x", "build"])).unwrap_err();
        assert_eq!(err, OptionError::InvalidOption("--target".to_string()));
    }

    #[test]
    fn test_program_name_must_not_be_an_option() {
        let mut parser = ContinuousParser::new(OptionCollection::new());
        let bad: Vec<String> = vec!["--prog".into()];
        assert!(matches!(
            parser.parse(&bad),
            Err(OptionError::ProgramName(_))
        ));
    }

    #[test]
    fn test_value_validation_failure_aborts() {
        let mut opts = OptionCollection::new();
        opts.add(
            OptionSpec::from_spec("level:number")
                .unwrap()
                .with_validator(Validator::new(|v| v.parse::<i64>().is_ok_and(|n| n < 10))),
        )
        .unwrap();

        let mut parser = ContinuousParser::new(opts);
        let err = parser.parse(&argv(&["--level", "99"])).unwrap_err();
        assert_eq!(
            err,
            OptionError::InvalidValue {
                name: "level".into(),
                value: "99".into()
            }
        );
    }

    #[test]
    fn test_positional_with_equals_not_split() {
        let mut parser = ContinuousParser::new(collection(&["v|verbose"]));
        parser.parse(&argv(&["key=value"])).unwrap();
        assert_eq!(parser.current(), Some("key=value"));
    }
}
