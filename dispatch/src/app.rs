//! The application wrapper: global options, the run entry point, and
//! error reporting.

use tracing::{debug, info};

use crate::action::CommandAction;
use crate::context::Context;
use crate::dispatch::{self, Outcome};
use crate::error::{DispatchError, Result};
use crate::loader::CommandRegistry;
use crate::node::{CommandSetup, CommandTree};

/// Options injected into the root scope of every application.
///
/// Each entry is a compact spec plus its description; `log-path` takes
/// an optional value, the rest are plain flags.
const GLOBAL_OPTIONS: &[(&str, &str)] = &[
    ("v|verbose", "Print verbose messages"),
    ("d|debug", "Print debug messages"),
    ("q|quiet", "Silence normal output"),
    ("h|help", "Show help"),
    ("version", "Show version"),
    ("p|profile", "Report run time on exit"),
    ("log-path?", "Write logs to a file"),
    ("no-interact", "Never guess or prompt; fail fast"),
];

/// Top-level harness around a root command.
///
/// Owns the root [`CommandAction`] and a [`CommandRegistry`] for
/// by-name subcommand loading, injects the standard global options
/// ahead of the root's own `register`, and drives one dispatch per
/// [`run`](Self::run).
///
/// # Examples
///
/// ```
/// use command_kit_dispatch::{Application, CommandAction, CommandSetup, Result};
///
/// struct Root;
/// impl CommandAction for Root {
///     fn name(&self) -> &str {
///         "demo"
///     }
/// }
///
/// let app = Application::new(Box::new(Root));
/// let argv = vec!["demo".to_string(), "--verbose".to_string()];
/// assert!(app.run(&argv).is_ok());
/// ```
pub struct Application {
    root: Box<dyn CommandAction>,
    registry: CommandRegistry,
}

impl Application {
    pub fn new(root: Box<dyn CommandAction>) -> Self {
        Self {
            root,
            registry: CommandRegistry::new(),
        }
    }

    /// Registers a factory for by-name `load_command` requests.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn CommandAction> + 'static,
    {
        self.registry.register(name, factory);
    }

    fn inject_globals(setup: &mut CommandSetup) -> Result<()> {
        for (spec, description) in GLOBAL_OPTIONS {
            setup.add_option(spec, description)?;
        }
        Ok(())
    }

    fn build_tree(self) -> Result<CommandTree> {
        CommandTree::build_with(self.root, &self.registry, Self::inject_globals)
    }

    fn dispatch(tree: &mut CommandTree, argv: &[String]) -> Result<Outcome> {
        let program = argv.first().map(String::as_str).unwrap_or("");
        let mut ctx = Context::new(program);
        let outcome = dispatch::run(tree, &mut ctx, argv)?;

        if ctx.profile() {
            info!(elapsed_ms = ctx.elapsed().as_millis() as u64, "run profile");
        }
        debug!(?outcome, "dispatch finished");
        Ok(outcome)
    }

    /// Builds the tree and dispatches one run over `argv` (including
    /// the program name at index 0).
    pub fn run(self, argv: &[String]) -> Result<Outcome> {
        let mut tree = self.build_tree()?;
        Self::dispatch(&mut tree, argv)
    }

    /// Like [`run`](Self::run), but renders errors for terminal users
    /// and returns whether the run succeeded. Intended as the last call
    /// in `main`, feeding the exit code.
    pub fn run_or_report(self, argv: &[String]) -> bool {
        // Context is gone by the time an error surfaces, so detect debug
        // mode from the raw argv.
        let debug_run = argv
            .iter()
            .any(|arg| arg == "-d" || arg == "--debug");
        let program = argv.first().map(String::as_str).unwrap_or("").to_string();

        let mut tree = match self.build_tree() {
            Ok(tree) => tree,
            Err(error) => {
                print_error(&error, debug_run);
                return false;
            }
        };

        match Self::dispatch(&mut tree, argv) {
            Ok(_) => true,
            Err(error) => {
                print_error(&error, debug_run);
                report_details(&tree, &error, &program);
                false
            }
        }
    }
}

fn print_error(error: &DispatchError, debug_run: bool) {
    if debug_run {
        eprintln!("Error: {error:?}");
    } else {
        eprintln!("Error: {error}");
    }
}

/// Extra per-kind diagnostics after the error line: sibling listing for
/// unresolved commands, the invocation prototype for missing arguments.
fn report_details(tree: &CommandTree, error: &DispatchError, program: &str) {
    match error {
        DispatchError::CommandNotFound { available, .. } => {
            if !available.is_empty() {
                eprintln!("Available commands: {}", available.join(", "));
            }
            eprintln!("Run '{program} --help' for usage.");
        }
        DispatchError::ArgumentNotEnough { command, .. } => {
            if let Some(id) = tree.find(command) {
                eprintln!("Usage: {}", tree.prototype(id, program));
            }
        }
        _ => {}
    }
}
