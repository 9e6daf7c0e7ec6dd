//! Per-run context threaded through lifecycle hooks.

use std::time::{Duration, Instant};

use command_kit_core::OptionResult;

/// Output verbosity derived from the global options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

/// Explicit run context, created once per dispatch and passed by
/// reference down through commands and extensions.
///
/// There is no ambient global state: program name, verbosity,
/// fuzzy-correction switch, and profile timing all live here and are
/// torn down when the run ends.
#[derive(Debug)]
pub struct Context {
    program_name: String,
    verbosity: Verbosity,
    started_at: Instant,
    profile: bool,
    no_interact: bool,
}

impl Context {
    pub fn new(program_name: &str) -> Self {
        Self {
            program_name: program_name.to_string(),
            verbosity: Verbosity::default(),
            started_at: Instant::now(),
            profile: false,
            no_interact: false,
        }
    }

    /// Derives context switches from the root's parsed global options.
    /// Debug outranks verbose outranks quiet.
    pub fn apply_global_options(&mut self, options: &OptionResult) {
        if options.get_bool("debug") {
            self.verbosity = Verbosity::Debug;
        } else if options.get_bool("verbose") {
            self.verbosity = Verbosity::Verbose;
        } else if options.get_bool("quiet") {
            self.verbosity = Verbosity::Quiet;
        }
        self.profile = options.get_bool("profile");
        self.no_interact = options.get_bool("no-interact");
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn is_debug(&self) -> bool {
        self.verbosity == Verbosity::Debug
    }

    /// `true` when fuzzy command correction is disabled for this run.
    pub fn no_interact(&self) -> bool {
        self.no_interact
    }

    pub fn profile(&self) -> bool {
        self.profile
    }

    /// Wall time since the run started.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_kit_core::{OptionCollection, ContinuousParser};

    fn parsed(args: &[&str]) -> OptionResult {
        let mut opts = OptionCollection::new();
        for spec in ["v|verbose", "d|debug", "q|quiet", "no-interact", "p|profile"] {
            opts.add_spec(spec, "").unwrap();
        }
        let argv: Vec<String> = std::iter::once("prog")
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect();
        ContinuousParser::new(opts).parse(&argv).unwrap()
    }

    #[test]
    fn test_debug_outranks_verbose() {
        let mut ctx = Context::new("prog");
        ctx.apply_global_options(&parsed(&["-v", "-d"]));
        assert_eq!(ctx.verbosity(), Verbosity::Debug);
    }

    #[test]
    fn test_no_interact_switch() {
        let mut ctx = Context::new("prog");
        assert!(!ctx.no_interact());
        ctx.apply_global_options(&parsed(&["--no-interact"]));
        assert!(ctx.no_interact());
    }
}
