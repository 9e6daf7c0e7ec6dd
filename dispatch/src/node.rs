//! The command tree: arena-backed nodes and the registration surface.
//!
//! A [`CommandNode`] composes its own option collection, positional
//! argument declarations, children, and attached extensions; behavior
//! lives in the boxed [`CommandAction`]. Nodes are owned by the arena in
//! [`CommandTree`] and addressed by [`NodeId`]; the parent link is a
//! plain id used only for name traces, never for ownership.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use command_kit_core::{ArgumentDecl, OptionCollection, OptionResult, OptionSpec};

use crate::action::CommandAction;
use crate::error::{DispatchError, Result};
use crate::extension::Extension;
use crate::loader::CommandLoader;

/// Arena index of a command node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Registration surface handed to [`CommandAction::register`].
///
/// Collects everything a command declares during its init phase; the
/// tree builder turns the finished setup into a [`CommandNode`].
#[derive(Default)]
pub struct CommandSetup {
    pub(crate) options: OptionCollection,
    pub(crate) arguments: Vec<ArgumentDecl>,
    pub(crate) subcommands: Vec<Box<dyn CommandAction>>,
    pub(crate) load_requests: Vec<String>,
    pub(crate) extensions: Vec<Box<dyn Extension>>,
    pub(crate) hidden: bool,
}

impl CommandSetup {
    /// Declares an option from the compact spec grammar.
    pub fn add_option(&mut self, spec: &str, description: &str) -> Result<()> {
        self.options.add_spec(spec, description)?;
        Ok(())
    }

    /// Declares an option with an explicit canonical key.
    pub fn add_option_with_key(&mut self, spec: &str, description: &str, key: &str) -> Result<()> {
        self.options.add(
            OptionSpec::from_spec(spec)?
                .with_description(description)
                .with_key(key),
        )?;
        Ok(())
    }

    /// Declares a fully built option spec.
    pub fn add_option_spec(&mut self, spec: OptionSpec) -> Result<()> {
        self.options.add(spec)?;
        Ok(())
    }

    /// Declares a positional argument from the compact spec grammar.
    pub fn add_argument(&mut self, spec: &str, description: &str) -> Result<()> {
        self.arguments
            .push(ArgumentDecl::from_spec(spec)?.with_description(description));
        Ok(())
    }

    /// Declares a fully built argument schema.
    pub fn add_argument_decl(&mut self, decl: ArgumentDecl) {
        self.arguments.push(decl);
    }

    /// Attaches a subcommand action directly.
    pub fn add_subcommand(&mut self, action: Box<dyn CommandAction>) {
        self.subcommands.push(action);
    }

    /// Requests a subcommand by name, to be resolved through the
    /// [`CommandLoader`] when the tree is built.
    pub fn load_command(&mut self, name: &str) {
        self.load_requests.push(name.to_string());
    }

    /// Attaches a lifecycle extension; unavailable extensions are
    /// rejected here rather than failing mid-run.
    pub fn add_extension(&mut self, extension: Box<dyn Extension>) -> Result<()> {
        if !extension.is_available() {
            return Err(DispatchError::Extension(format!(
                "'{}' is not available",
                extension.name()
            )));
        }
        self.extensions.push(extension);
        Ok(())
    }

    /// Hides this command from visible listings and diagnostics.
    pub fn hide(&mut self) {
        self.hidden = true;
    }
}

/// One node of the command tree.
pub struct CommandNode {
    name: String,
    aliases: Vec<String>,
    hidden: bool,
    options: OptionCollection,
    arguments: Vec<ArgumentDecl>,
    children: BTreeMap<String, NodeId>,
    child_aliases: HashMap<String, NodeId>,
    parent: Option<NodeId>,
    pub(crate) action: Box<dyn CommandAction>,
    pub(crate) extensions: Vec<Box<dyn Extension>>,
    /// Parsed options for this node's scope, filled during dispatch.
    pub(crate) parsed: OptionResult,
    /// Positional values bound at the leaf, filled during dispatch.
    pub(crate) bound_args: Vec<String>,
}

impl CommandNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn brief(&self) -> &str {
        self.action.brief()
    }

    pub fn options(&self) -> &OptionCollection {
        &self.options
    }

    pub fn arguments(&self) -> &[ArgumentDecl] {
        &self.arguments
    }

    /// Parsed option result for this node's scope.
    pub fn parsed(&self) -> &OptionResult {
        &self.parsed
    }

    /// Positional values bound to this node's argument declarations.
    pub fn bound_args(&self) -> &[String] {
        &self.bound_args
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Resolves a token to a child by exact name, then by alias.
    pub fn resolve_child(&self, name: &str) -> Option<NodeId> {
        self.children
            .get(name)
            .or_else(|| self.child_aliases.get(name))
            .copied()
    }

    /// Names of non-hidden children, in sorted order. Requires the tree
    /// for hidden-flag lookup.
    fn visible_child_names(&self, tree: &CommandTree) -> Vec<String> {
        self.children
            .iter()
            .filter(|&(_, &id)| !tree.node(id).hidden)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Arena of command nodes rooted at the application command.
///
/// Built once from a root [`CommandAction`]: every action's `register`
/// runs during construction (the init phase), including actions loaded
/// by name through the [`CommandLoader`].
pub struct CommandTree {
    nodes: Vec<CommandNode>,
    root: NodeId,
}

impl CommandTree {
    /// Builds a tree from a root action and a loader for by-name
    /// subcommand requests.
    pub fn build(root_action: Box<dyn CommandAction>, loader: &dyn CommandLoader) -> Result<Self> {
        Self::build_with(root_action, loader, |_| Ok(()))
    }

    /// Like [`build`](Self::build), but runs `pre` on the root's setup
    /// before the root action registers — used by the application layer
    /// to inject the standard global options.
    pub fn build_with(
        root_action: Box<dyn CommandAction>,
        loader: &dyn CommandLoader,
        pre: impl FnOnce(&mut CommandSetup) -> Result<()>,
    ) -> Result<Self> {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        let mut pre = Some(pre);
        let root = tree.instantiate(root_action, None, loader, &mut |setup| match pre.take() {
            Some(f) => f(setup),
            None => Ok(()),
        })?;
        tree.root = root;
        Ok(tree)
    }

    fn instantiate(
        &mut self,
        mut action: Box<dyn CommandAction>,
        parent: Option<NodeId>,
        loader: &dyn CommandLoader,
        pre: &mut dyn FnMut(&mut CommandSetup) -> Result<()>,
    ) -> Result<NodeId> {
        let mut setup = CommandSetup::default();
        if parent.is_none() {
            pre(&mut setup)?;
        }
        action.register(&mut setup)?;

        for name in std::mem::take(&mut setup.load_requests) {
            let factory = loader
                .resolve(&name)
                .ok_or_else(|| DispatchError::CommandClassNotFound(name.clone()))?;
            setup.subcommands.push(factory());
        }

        let children = std::mem::take(&mut setup.subcommands);
        let id = NodeId(self.nodes.len());
        self.nodes.push(CommandNode {
            name: action.name().to_string(),
            aliases: action.aliases(),
            hidden: setup.hidden,
            options: setup.options,
            arguments: setup.arguments,
            children: BTreeMap::new(),
            child_aliases: HashMap::new(),
            parent,
            action,
            extensions: setup.extensions,
            parsed: OptionResult::new(),
            bound_args: Vec::new(),
        });

        for child_action in children {
            let child = self.instantiate(child_action, Some(id), loader, pre)?;
            let name = self.nodes[child.0].name.clone();
            let aliases = self.nodes[child.0].aliases.clone();
            let node = &mut self.nodes[id.0];
            node.children.insert(name, child);
            for alias in aliases {
                node.child_aliases.insert(alias, child);
            }
        }

        Ok(id)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &CommandNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut CommandNode {
        &mut self.nodes[id.0]
    }

    /// Visible (non-hidden) child names under a node, sorted.
    pub fn visible_child_names(&self, id: NodeId) -> Vec<String> {
        self.node(id).visible_child_names(self)
    }

    /// Command names from the first descended command down to `id`,
    /// excluding the root application node.
    pub fn name_trace(&self, id: NodeId) -> Vec<String> {
        let mut trace = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.node(current);
            if node.parent.is_some() {
                trace.push(node.name.clone());
            }
            cursor = node.parent;
        }
        trace.reverse();
        trace
    }

    /// Dotted signature of a node (e.g. `remote.add`).
    pub fn signature(&self, id: NodeId) -> String {
        self.name_trace(id).join(".")
    }

    /// Looks a node up by its dotted signature; the empty signature is
    /// the root.
    pub fn find(&self, signature: &str) -> Option<NodeId> {
        if signature.is_empty() {
            return Some(self.root);
        }
        let mut id = self.root;
        for part in signature.split('.') {
            id = self.node(id).resolve_child(part)?;
        }
        Some(id)
    }

    /// One-line invocation prototype, e.g.
    /// `prog repo add [options] <url>`.
    pub fn prototype(&self, id: NodeId, program_name: &str) -> String {
        let node = self.node(id);
        let mut out = vec![program_name.to_string()];
        out.extend(self.name_trace(id));
        if !node.options.is_empty() {
            out.push("[options]".to_string());
        }
        if node.has_children() {
            out.push("<subcommand>".to_string());
        } else {
            for decl in &node.arguments {
                out.push(format!("<{}>", decl.name()));
            }
        }
        out.join(" ")
    }

    /// Prototypes of a node and all of its children, for diagnostics.
    pub fn prototypes(&self, id: NodeId, program_name: &str) -> Vec<String> {
        let mut lines = vec![self.prototype(id, program_name)];
        for &child in self.node(id).children.values() {
            lines.push(self.prototype(child, program_name));
        }
        lines
    }
}

// Boxed actions are opaque, so a structural dump of the arena is the
// most a debug rendering can offer.
impl fmt::Debug for CommandTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTree")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .finish()
    }
}
