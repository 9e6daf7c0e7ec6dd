//! Lifecycle extensions attached to command nodes.

use crate::context::Context;
use crate::error::Result;

/// A reusable lifecycle hook attached to a command node.
///
/// Extensions run in registration order at every lifecycle stage, in
/// addition to the node's own hooks. An extension that reports itself
/// unavailable is rejected at attach time with an extension error.
pub trait Extension {
    fn name(&self) -> &str;

    /// `false` when the extension cannot run in this environment.
    fn is_available(&self) -> bool {
        true
    }

    fn prepare(&mut self, ctx: &mut Context) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    fn execute(&mut self, ctx: &mut Context) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    fn finish(&mut self, ctx: &mut Context) {
        let _ = ctx;
    }
}
