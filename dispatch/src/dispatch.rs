//! The dispatch loop: scope descent, lifecycle ordering, and argument
//! binding.
//!
//! One run walks argv with a single [`ContinuousParser`], swapping the
//! active option collection at every subcommand boundary. Options bind
//! to the scope whose segment they appear in; positional tokens either
//! select a child command or become leaf arguments. After descent the
//! leaf's positionals are validated, then the lifecycle runs prepare
//! (root-first), execute (leaf only), finish (leaf-first, the exact
//! reverse of prepare).

use command_kit_core::{ContinuousParser, OptionError};
use tracing::debug;

use crate::action::Flow;
use crate::context::Context;
use crate::error::{DispatchError, Result};
use crate::guess::guess_command;
use crate::node::{CommandTree, NodeId};

/// How a run ended when no error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The leaf executed and every finish hook ran.
    Completed,
    /// A prepare hook returned [`Flow::Halt`]; execution was skipped
    /// cleanly.
    Halted,
}

/// Runs one full dispatch over `argv` against a built command tree.
///
/// Errors propagate immediately; finish hooks only run for nodes whose
/// prepare completed with [`Flow::Continue`], and never after an error.
pub fn run(tree: &mut CommandTree, ctx: &mut Context, argv: &[String]) -> Result<Outcome> {
    let root = tree.root();
    let mut parser = ContinuousParser::new(tree.node(root).options().clone());
    let parsed = parser.parse(argv)?;
    tree.node_mut(root).parsed = parsed;
    ctx.apply_global_options(tree.node(root).parsed());

    // The root prepares before any descent so it can halt the run (for
    // `--help` or `--version`) without touching child resolution.
    if prepare_node(tree, root, ctx)? == Flow::Halt {
        debug!("run halted by root prepare");
        return Ok(Outcome::Halted);
    }

    let mut stack: Vec<NodeId> = Vec::new();
    let mut current = root;

    while !parser.is_end() {
        if tree.node(current).has_children() {
            let Some(token) = parser.current().map(str::to_string) else {
                break;
            };
            let child = resolve(tree, current, ctx, &token)?;
            parser.advance();
            parser.set_specs(tree.node(child).options().clone());
            let parsed = parser.continue_parse()?;
            tree.node_mut(child).parsed = parsed;
            debug!(command = %tree.signature(child), "descended into subcommand");
            stack.push(child);
            current = child;
        } else {
            // Leaf scope: alternate between trailing option segments and
            // positional arguments until argv is exhausted.
            let segment = parser.continue_parse()?;
            if !segment.is_empty() {
                tree.node_mut(current).parsed.merge(segment);
            }
            if let Some(token) = parser.advance() {
                tree.node_mut(current).parsed.add_argument(token);
            }
        }
    }

    // Per-token validation happens before the descended nodes prepare;
    // the count checks wait until the execute boundary.
    let leaf = stack.last().copied().unwrap_or(root);
    let args = tree.node(leaf).parsed().arguments().to_vec();
    validate_arguments(tree, leaf, &args)?;

    for (depth, &id) in stack.iter().enumerate() {
        if prepare_node(tree, id, ctx)? == Flow::Halt {
            debug!(command = %tree.signature(id), "run halted by prepare");
            for &done in stack[..depth].iter().rev() {
                finish_node(tree, done, ctx);
            }
            finish_node(tree, root, ctx);
            return Ok(Outcome::Halted);
        }
    }

    bind_arguments(tree, leaf, args)?;
    execute_node(tree, leaf, ctx)?;

    for &id in stack.iter().rev() {
        finish_node(tree, id, ctx);
    }
    finish_node(tree, root, ctx);
    Ok(Outcome::Completed)
}

/// Resolves a positional token to a child of `parent`: exact name,
/// then alias, then a single unambiguous fuzzy correction (skipped when
/// the run disables interaction).
fn resolve(tree: &CommandTree, parent: NodeId, ctx: &Context, token: &str) -> Result<NodeId> {
    if let Some(child) = tree.node(parent).resolve_child(token) {
        return Ok(child);
    }

    let available = tree.visible_child_names(parent);
    if !ctx.no_interact() {
        if let Some(corrected) = guess_command(token, &available) {
            if let Some(child) = tree.node(parent).resolve_child(corrected) {
                return Ok(child);
            }
        }
    }

    Err(DispatchError::CommandNotFound {
        name: token.to_string(),
        available,
    })
}

fn prepare_node(tree: &mut CommandTree, id: NodeId, ctx: &mut Context) -> Result<Flow> {
    let node = tree.node_mut(id);
    for extension in &mut node.extensions {
        extension.prepare(ctx)?;
    }
    node.action.prepare(ctx, &node.parsed)
}

fn execute_node(tree: &mut CommandTree, id: NodeId, ctx: &mut Context) -> Result<()> {
    let node = tree.node_mut(id);
    for extension in &mut node.extensions {
        extension.execute(ctx)?;
    }
    node.action.execute(ctx, &node.parsed, &node.bound_args)
}

fn finish_node(tree: &mut CommandTree, id: NodeId, ctx: &mut Context) {
    let node = tree.node_mut(id);
    node.action.finish(ctx);
    for extension in &mut node.extensions {
        extension.finish(ctx);
    }
}

/// Validates each collected positional against the leaf's argument
/// schema, in declaration order with a trailing variadic declaration
/// covering the remainder. Runs before any descended node prepares, so
/// a bad value aborts without prepare side effects.
fn validate_arguments(tree: &CommandTree, leaf: NodeId, args: &[String]) -> Result<()> {
    let mut cursor = 0;
    for decl in tree.node(leaf).arguments() {
        if decl.is_multiple() {
            for value in &args[cursor..] {
                decl.validate(value)?;
            }
            return Ok(());
        }
        if let Some(value) = args.get(cursor) {
            decl.validate(value)?;
            cursor += 1;
        }
    }
    Ok(())
}

/// Enforces the leaf's argument counts at the execute boundary and
/// stores the positionals on the node for the execute hook.
///
/// Each declaration consumes one token; a trailing variadic declaration
/// consumes the remainder. Extra tokens past a non-variadic schema are
/// kept as-is so commands can forward them.
fn bind_arguments(tree: &mut CommandTree, leaf: NodeId, args: Vec<String>) -> Result<()> {
    let node = tree.node(leaf);
    let required = node
        .arguments()
        .iter()
        .filter(|decl| decl.is_required() && !decl.is_multiple())
        .count();
    let variadic_required = node
        .arguments()
        .iter()
        .any(|decl| decl.is_multiple() && decl.is_required());
    let min = required + usize::from(variadic_required);
    if args.len() < min {
        return Err(DispatchError::ArgumentNotEnough {
            command: tree.signature(leaf),
            given: args.len(),
            required: min,
        });
    }

    let mut cursor = 0;
    for decl in node.arguments() {
        if decl.is_multiple() {
            break;
        }
        match args.get(cursor) {
            Some(_) => cursor += 1,
            // an earlier optional declaration may have consumed the
            // token this one needed
            None if decl.is_required() => {
                return Err(DispatchError::Option(OptionError::RequireValue {
                    name: decl.name().to_string(),
                }));
            }
            None => {}
        }
    }

    tree.node_mut(leaf).bound_args = args;
    Ok(())
}
