//! Ordered option collections with alias lookup.

use std::collections::HashMap;

use crate::error::{OptionError, Result};
use crate::spec::OptionSpec;

/// An ordered set of [`OptionSpec`]s with an alias → spec index.
///
/// Built once per command during registration and immutable in shape
/// afterwards. Every alias (short, long, or canonical id) resolves to
/// exactly one spec; duplicates are rejected at insertion.
///
/// # Examples
///
/// ```
/// use command_kit_core::{OptionCollection, OptionSpec};
///
/// let mut opts = OptionCollection::new();
/// opts.add(OptionSpec::from_spec("v|verbose").unwrap()).unwrap();
/// opts.add(OptionSpec::from_spec("level:number").unwrap()).unwrap();
///
/// assert_eq!(opts.get("v").unwrap().id(), "verbose");
/// assert!(opts.contains("level"));
/// assert_eq!(opts.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionCollection {
    specs: Vec<OptionSpec>,
    index: HashMap<String, usize>,
}

impl OptionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a spec, indexing all of its names.
    pub fn add(&mut self, spec: OptionSpec) -> Result<()> {
        let names: Vec<String> = spec.names().map(str::to_string).collect();
        for name in &names {
            if self.index.contains_key(name) {
                return Err(OptionError::DuplicateOption(name.clone()));
            }
        }

        let pos = self.specs.len();
        for name in names {
            self.index.insert(name, pos);
        }
        self.specs.push(spec);
        Ok(())
    }

    /// Parses and registers a spec string in one step.
    pub fn add_spec(&mut self, spec: &str, description: &str) -> Result<()> {
        self.add(OptionSpec::from_spec(spec)?.with_description(description))
    }

    /// Looks up a spec by any of its names.
    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.index.get(name).map(|&pos| &self.specs[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
