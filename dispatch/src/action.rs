//! The command behavior trait and lifecycle control flow.

use command_kit_core::OptionResult;

use crate::context::Context;
use crate::error::Result;
use crate::node::CommandSetup;

/// Whether a prepare hook lets the run proceed.
///
/// `Halt` stops the run cleanly with a successful status (the classic
/// case: a node detects `--help` during prepare). Nodes deeper than the
/// halting one are never prepared or finished; already-prepared
/// ancestors still get their finish calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

/// Behavior attached to one command node.
///
/// `register` is the init phase: declare options, positional arguments,
/// subcommands, and extensions on the [`CommandSetup`]. The remaining
/// hooks follow the prepare → execute → finish lifecycle driven by the
/// dispatch loop; `prepare` runs root-first down the command stack,
/// `execute` only on the leaf, `finish` leaf-first back up.
///
/// # Examples
///
/// ```
/// use command_kit_dispatch::{CommandAction, CommandSetup, Context, Result};
/// use command_kit_core::OptionResult;
///
/// struct Greet;
///
/// impl CommandAction for Greet {
///     fn name(&self) -> &str {
///         "greet"
///     }
///
///     fn register(&mut self, setup: &mut CommandSetup) -> Result<()> {
///         setup.add_option("s|shout", "Shout the greeting")?;
///         setup.add_argument("name", "Who to greet")?;
///         Ok(())
///     }
///
///     fn execute(&mut self, _ctx: &mut Context, opts: &OptionResult, args: &[String]) -> Result<()> {
///         let mut line = format!("hello, {}", args[0]);
///         if opts.get_bool("shout") {
///             line = line.to_uppercase();
///         }
///         println!("{line}");
///         Ok(())
///     }
/// }
/// ```
pub trait CommandAction {
    /// The command name used for tree resolution.
    fn name(&self) -> &str;

    /// Alternative names resolving to this command.
    fn aliases(&self) -> Vec<String> {
        Vec::new()
    }

    /// One-line brief shown in command listings.
    fn brief(&self) -> &str {
        ""
    }

    /// One-line usage string.
    fn usage(&self) -> &str {
        ""
    }

    /// Detailed help text.
    fn help(&self) -> &str {
        ""
    }

    /// Init phase: declare options, arguments, subcommands, extensions.
    fn register(&mut self, setup: &mut CommandSetup) -> Result<()> {
        let _ = setup;
        Ok(())
    }

    /// Prepare hook, run root-first for every node on the stack.
    fn prepare(&mut self, ctx: &mut Context, options: &OptionResult) -> Result<Flow> {
        let _ = (ctx, options);
        Ok(Flow::Continue)
    }

    /// Execute hook, run on the dispatched leaf with its bound
    /// positional values.
    fn execute(&mut self, ctx: &mut Context, options: &OptionResult, args: &[String]) -> Result<()> {
        let _ = (ctx, options, args);
        Ok(())
    }

    /// Finish hook, run leaf-first in reverse order of prepare.
    fn finish(&mut self, ctx: &mut Context) {
        let _ = ctx;
    }
}
