//! End-to-end dispatch tests: lifecycle ordering, halting, aliases,
//! and extension interleaving.

use std::cell::RefCell;
use std::rc::Rc;

use command_kit_core::{OptionError, OptionResult};
use command_kit_dispatch::{
    Application, CommandAction, CommandSetup, Context, DispatchError, Extension, Flow, Outcome,
    Result,
};

type Log = Rc<RefCell<Vec<String>>>;

fn log_entry(log: &Log, entry: String) {
    log.borrow_mut().push(entry);
}

/// A command that records every lifecycle call it receives.
struct Recorded {
    name: &'static str,
    aliases: Vec<String>,
    arguments: Vec<&'static str>,
    log: Log,
    halt_in_prepare: bool,
    fail_in_execute: bool,
    children: Vec<Box<dyn CommandAction>>,
}

impl Recorded {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            aliases: Vec::new(),
            arguments: Vec::new(),
            log: Rc::clone(log),
            halt_in_prepare: false,
            fail_in_execute: false,
            children: Vec::new(),
        }
    }

    fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    fn argument(mut self, spec: &'static str) -> Self {
        self.arguments.push(spec);
        self
    }

    fn halting(mut self) -> Self {
        self.halt_in_prepare = true;
        self
    }

    fn failing(mut self) -> Self {
        self.fail_in_execute = true;
        self
    }

    fn child(mut self, child: Recorded) -> Self {
        self.children.push(Box::new(child));
        self
    }
}

impl CommandAction for Recorded {
    fn name(&self) -> &str {
        self.name
    }

    fn aliases(&self) -> Vec<String> {
        self.aliases.clone()
    }

    fn register(&mut self, setup: &mut CommandSetup) -> Result<()> {
        for spec in &self.arguments {
            setup.add_argument(spec, "")?;
        }
        for child in self.children.drain(..) {
            setup.add_subcommand(child);
        }
        Ok(())
    }

    fn prepare(&mut self, _ctx: &mut Context, _options: &OptionResult) -> Result<Flow> {
        log_entry(&self.log, format!("prepare:{}", self.name));
        if self.halt_in_prepare {
            Ok(Flow::Halt)
        } else {
            Ok(Flow::Continue)
        }
    }

    fn execute(&mut self, _ctx: &mut Context, _options: &OptionResult, _args: &[String]) -> Result<()> {
        log_entry(&self.log, format!("execute:{}", self.name));
        if self.fail_in_execute {
            return Err(DispatchError::Option(OptionError::InvalidOption(
                "synthetic failure".to_string(),
            )));
        }
        Ok(())
    }

    fn finish(&mut self, _ctx: &mut Context) {
        log_entry(&self.log, format!("finish:{}", self.name));
    }
}

struct RecordedExtension {
    name: &'static str,
    log: Log,
}

impl Extension for RecordedExtension {
    fn name(&self) -> &str {
        self.name
    }

    fn prepare(&mut self, _ctx: &mut Context) -> Result<()> {
        log_entry(&self.log, format!("ext-prepare:{}", self.name));
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut Context) -> Result<()> {
        log_entry(&self.log, format!("ext-execute:{}", self.name));
        Ok(())
    }

    fn finish(&mut self, _ctx: &mut Context) {
        log_entry(&self.log, format!("ext-finish:{}", self.name));
    }
}

fn argv(args: &[&str]) -> Vec<String> {
    std::iter::once("prog")
        .chain(args.iter().copied())
        .map(str::to_string)
        .collect()
}

#[test]
fn test_three_level_lifecycle_ordering() {
    let log: Log = Rc::default();
    let root = Recorded::new("app", &log)
        .child(Recorded::new("repo", &log).child(Recorded::new("add", &log)));

    let outcome = Application::new(Box::new(root))
        .run(&argv(&["repo", "add"]))
        .unwrap();
    assert_eq!(outcome, Outcome::Completed);

    assert_eq!(
        *log.borrow(),
        vec![
            "prepare:app",
            "prepare:repo",
            "prepare:add",
            "execute:add",
            "finish:add",
            "finish:repo",
            "finish:app",
        ]
    );
}

#[test]
fn test_alias_runs_the_same_command() {
    let log: Log = Rc::default();
    let root = Recorded::new("app", &log).child(Recorded::new("build", &log).alias("b"));

    Application::new(Box::new(root))
        .run(&argv(&["b"]))
        .unwrap();

    assert!(log.borrow().contains(&"execute:build".to_string()));
}

#[test]
fn test_halt_skips_execute_and_deeper_nodes() {
    let log: Log = Rc::default();
    let root = Recorded::new("app", &log)
        .child(Recorded::new("repo", &log).halting().child(Recorded::new("add", &log)));

    let outcome = Application::new(Box::new(root))
        .run(&argv(&["repo", "add"]))
        .unwrap();
    assert_eq!(outcome, Outcome::Halted);

    // repo halts: add never prepares, nothing executes, and only the
    // root (the sole fully prepared node) finishes.
    assert_eq!(
        *log.borrow(),
        vec!["prepare:app", "prepare:repo", "finish:app"]
    );
}

#[test]
fn test_halt_at_root_skips_everything_else() {
    let log: Log = Rc::default();
    let root = Recorded::new("app", &log)
        .halting()
        .child(Recorded::new("build", &log));

    let outcome = Application::new(Box::new(root))
        .run(&argv(&["build"]))
        .unwrap();
    assert_eq!(outcome, Outcome::Halted);
    assert_eq!(*log.borrow(), vec!["prepare:app"]);
}

#[test]
fn test_bad_argument_value_aborts_before_subcommand_prepares() {
    let log: Log = Rc::default();
    let root = Recorded::new("app", &log)
        .child(Recorded::new("take", &log).argument("count:number"));

    let err = Application::new(Box::new(root))
        .run(&argv(&["take", "notanumber"]))
        .unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Option(OptionError::InvalidValue { .. })
    ));
    // the root prepares before descent; the failing leaf never does
    assert_eq!(*log.borrow(), vec!["prepare:app"]);
}

#[test]
fn test_unknown_option_aborts_before_any_hook() {
    let log: Log = Rc::default();
    let root = Recorded::new("app", &log).child(Recorded::new("build", &log));

    let err = Application::new(Box::new(root))
        .run(&argv(&["--bogus", "build"]))
        .unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Option(OptionError::InvalidOption(_))
    ));
    assert!(log.borrow().is_empty());
}

#[test]
fn test_execute_error_skips_finish() {
    let log: Log = Rc::default();
    let root = Recorded::new("app", &log).child(Recorded::new("boom", &log).failing());

    let err = Application::new(Box::new(root))
        .run(&argv(&["boom"]))
        .unwrap_err();
    assert!(matches!(err, DispatchError::Option(_)));

    assert_eq!(
        *log.borrow(),
        vec!["prepare:app", "prepare:boom", "execute:boom"]
    );
}

#[test]
fn test_extensions_run_before_the_command_hook() {
    struct Host {
        log: Log,
    }

    impl CommandAction for Host {
        fn name(&self) -> &str {
            "host"
        }

        fn register(&mut self, setup: &mut CommandSetup) -> Result<()> {
            setup.add_extension(Box::new(RecordedExtension {
                name: "first",
                log: Rc::clone(&self.log),
            }))?;
            setup.add_extension(Box::new(RecordedExtension {
                name: "second",
                log: Rc::clone(&self.log),
            }))?;
            Ok(())
        }

        fn execute(&mut self, _ctx: &mut Context, _options: &OptionResult, _args: &[String]) -> Result<()> {
            log_entry(&self.log, "execute:host".to_string());
            Ok(())
        }

        fn finish(&mut self, _ctx: &mut Context) {
            log_entry(&self.log, "finish:host".to_string());
        }
    }

    let log: Log = Rc::default();
    let root = Host { log: Rc::clone(&log) };
    Application::new(Box::new(root)).run(&argv(&[])).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "ext-prepare:first",
            "ext-prepare:second",
            "ext-execute:first",
            "ext-execute:second",
            "execute:host",
            "finish:host",
            "ext-finish:first",
            "ext-finish:second",
        ]
    );
}

#[test]
fn test_unavailable_extension_rejected_at_build() {
    struct Missing;
    impl Extension for Missing {
        fn name(&self) -> &str {
            "missing"
        }
        fn is_available(&self) -> bool {
            false
        }
    }

    struct Root;
    impl CommandAction for Root {
        fn name(&self) -> &str {
            "app"
        }
        fn register(&mut self, setup: &mut CommandSetup) -> Result<()> {
            setup.add_extension(Box::new(Missing))
        }
    }

    let err = Application::new(Box::new(Root)).run(&argv(&[])).unwrap_err();
    assert!(matches!(err, DispatchError::Extension(_)));
}

#[test]
fn test_global_verbosity_reaches_subcommand_context() {
    struct Check;
    impl CommandAction for Check {
        fn name(&self) -> &str {
            "check"
        }
        fn execute(&mut self, ctx: &mut Context, _options: &OptionResult, _args: &[String]) -> Result<()> {
            assert!(ctx.is_debug());
            Ok(())
        }
    }

    struct Root;
    impl CommandAction for Root {
        fn name(&self) -> &str {
            "app"
        }
        fn register(&mut self, setup: &mut CommandSetup) -> Result<()> {
            setup.add_subcommand(Box::new(Check));
            Ok(())
        }
    }

    Application::new(Box::new(Root))
        .run(&argv(&["-d", "check"]))
        .unwrap();
}
