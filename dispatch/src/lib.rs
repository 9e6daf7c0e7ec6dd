//! Subcommand trees and lifecycle dispatch on top of
//! [`command_kit_core`].
//!
//! The core crate turns argv into per-scope option results; this crate
//! decides *which* scopes exist. Commands implement [`CommandAction`],
//! declare themselves through [`CommandSetup`] during registration, and
//! are assembled into a [`CommandTree`]. A run descends the tree with
//! one continuous parse, then drives the prepare → execute → finish
//! lifecycle; [`Application`] wraps the whole thing with the standard
//! global options and error reporting.
//!
//! ```
//! use command_kit_dispatch::{Application, CommandAction, CommandSetup, Context, Result};
//! use command_kit_core::OptionResult;
//!
//! struct Root;
//! impl CommandAction for Root {
//!     fn name(&self) -> &str {
//!         "demo"
//!     }
//!     fn register(&mut self, setup: &mut CommandSetup) -> Result<()> {
//!         setup.add_subcommand(Box::new(Echo));
//!         Ok(())
//!     }
//! }
//!
//! struct Echo;
//! impl CommandAction for Echo {
//!     fn name(&self) -> &str {
//!         "echo"
//!     }
//!     fn register(&mut self, setup: &mut CommandSetup) -> Result<()> {
//!         setup.add_argument("words+", "What to print")?;
//!         Ok(())
//!     }
//!     fn execute(&mut self, _ctx: &mut Context, _opts: &OptionResult, args: &[String]) -> Result<()> {
//!         println!("{}", args.join(" "));
//!         Ok(())
//!     }
//! }
//!
//! let argv: Vec<String> = ["demo", "echo", "hello", "world"]
//!     .iter().map(|s| s.to_string()).collect();
//! assert!(Application::new(Box::new(Root)).run(&argv).is_ok());
//! ```

mod action;
mod app;
mod context;
mod dispatch;
mod error;
mod extension;
mod guess;
mod loader;
mod node;

pub use action::{CommandAction, Flow};
pub use app::Application;
pub use context::{Context, Verbosity};
pub use dispatch::{run, Outcome};
pub use error::{DispatchError, Result};
pub use extension::Extension;
pub use guess::{guess_command, GUESS_THRESHOLD};
pub use loader::{CommandFactory, CommandLoader, CommandRegistry};
pub use node::{CommandNode, CommandSetup, CommandTree, NodeId};
