//! Option machinery for command-line parsing and dispatch.
//!
//! This crate defines the declarative model and the scanning engine used
//! by the dispatch layer:
//!
//! - [`Token`] — classification of one raw argv string (long/short
//!   option, combined cluster, `name=value`, positional).
//! - [`OptionSpec`] / [`Arity`] — declared option metadata from the
//!   compact grammar `<name>[+|?][:<type>]`.
//! - [`OptionCollection`] — ordered specs with alias lookup, built once
//!   per command during registration.
//! - [`ContinuousParser`] — stateful scanner whose active collection can
//!   be swapped mid-stream on subcommand descent without restarting
//!   tokenization.
//! - [`OptionResult`] / [`BoundOption`] — bound values plus residual
//!   positional arguments.
//! - [`ArgumentDecl`] — declared positional parameter schema.
//!
//! # Example
//!
//! ```
//! use command_kit_core::{ContinuousParser, OptionCollection};
//!
//! let mut opts = OptionCollection::new();
//! opts.add_spec("v|verbose", "Verbose messages").unwrap();
//! opts.add_spec("level:number", "Level takes a value").unwrap();
//!
//! let argv: Vec<String> = ["prog", "-v", "--level", "3"]
//!     .iter().map(|s| s.to_string()).collect();
//!
//! let mut parser = ContinuousParser::new(opts);
//! let result = parser.parse(&argv).unwrap();
//! assert!(result.get_bool("verbose"));
//! assert_eq!(result.get_int("level"), Some(3));
//! ```

mod argument;
mod collection;
mod error;
mod parser;
mod result;
mod spec;
mod token;
mod value;

pub use argument::ArgumentDecl;
pub use collection::OptionCollection;
pub use error::{OptionError, Result};
pub use parser::ContinuousParser;
pub use result::{BoundOption, OptionResult};
pub use spec::{Arity, OptionSpec};
pub use token::Token;
pub use value::{Validator, Value, ValueType};
