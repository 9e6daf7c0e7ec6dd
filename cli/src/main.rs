use command_kit_core::{OptionResult, OptionSpec, Value};
use command_kit_dispatch::{
    Application, CommandAction, CommandSetup, Context, Flow, Result, Verbosity,
};
use tracing::debug;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "\
Usage: ckit-demo [options] <command> [options] [arguments]

Commands:
  greet       Print a greeting
  repo add    Track a repository
  repo list   List tracked repositories

Run with --help for this text, --version for the version.";

/// Root command: owns the top-level subcommands and handles the global
/// help/version switches by halting the run.
struct DemoApp;

impl CommandAction for DemoApp {
    fn name(&self) -> &str {
        "ckit-demo"
    }

    fn brief(&self) -> &str {
        "Demo application for the command-kit framework"
    }

    fn register(&mut self, setup: &mut CommandSetup) -> Result<()> {
        setup.add_subcommand(Box::new(Greet));
        setup.add_subcommand(Box::new(Repo));
        Ok(())
    }

    fn prepare(&mut self, _ctx: &mut Context, options: &OptionResult) -> Result<Flow> {
        if options.get_bool("help") {
            println!("{USAGE}");
            return Ok(Flow::Halt);
        }
        if options.get_bool("version") {
            println!("ckit-demo {PACKAGE_VERSION}");
            return Ok(Flow::Halt);
        }
        Ok(Flow::Continue)
    }

    fn execute(&mut self, _ctx: &mut Context, _options: &OptionResult, _args: &[String]) -> Result<()> {
        // invoked with no subcommand at all
        println!("{USAGE}");
        Ok(())
    }
}

struct Greet;

impl CommandAction for Greet {
    fn name(&self) -> &str {
        "greet"
    }

    fn brief(&self) -> &str {
        "Print a greeting"
    }

    fn register(&mut self, setup: &mut CommandSetup) -> Result<()> {
        setup.add_option("s|shout", "Shout the greeting")?;
        setup.add_option_spec(
            OptionSpec::from_spec("lang:string")?
                .with_description("Greeting language")
                .one_of(&["en", "fi", "fr"])
                .with_default(Value::Str("en".to_string())),
        )?;
        setup.add_argument("name?", "Who to greet")?;
        Ok(())
    }

    fn execute(&mut self, ctx: &mut Context, options: &OptionResult, args: &[String]) -> Result<()> {
        let name = args.first().map(String::as_str).unwrap_or("world");
        let greeting = match options.get_str("lang") {
            Some("fi") => "terve",
            Some("fr") => "bonjour",
            _ => "hello",
        };
        let mut line = format!("{greeting}, {name}");
        if options.get_bool("shout") {
            line = line.to_uppercase();
        }
        println!("{line}");
        if ctx.verbosity() == Verbosity::Verbose {
            println!("(greeted from {})", ctx.program_name());
        }
        Ok(())
    }
}

/// Grouping command: no behavior of its own beyond hosting `add` and
/// `list`.
struct Repo;

impl CommandAction for Repo {
    fn name(&self) -> &str {
        "repo"
    }

    fn brief(&self) -> &str {
        "Manage tracked repositories"
    }

    fn register(&mut self, setup: &mut CommandSetup) -> Result<()> {
        setup.add_subcommand(Box::new(RepoAdd));
        setup.add_subcommand(Box::new(RepoList));
        Ok(())
    }
}

struct RepoAdd;

impl CommandAction for RepoAdd {
    fn name(&self) -> &str {
        "add"
    }

    fn aliases(&self) -> Vec<String> {
        vec!["a".to_string()]
    }

    fn brief(&self) -> &str {
        "Track a repository"
    }

    fn register(&mut self, setup: &mut CommandSetup) -> Result<()> {
        setup.add_option("t|tag+", "Tags attached to the repository")?;
        setup.add_argument("url:url", "Repository URL")?;
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut Context, options: &OptionResult, args: &[String]) -> Result<()> {
        let tags = options.get_list("tag").unwrap_or_default();
        debug!(url = %args[0], ?tags, "adding repository");
        println!("added {} ({} tag(s))", args[0], tags.len());
        Ok(())
    }
}

struct RepoList;

impl CommandAction for RepoList {
    fn name(&self) -> &str {
        "list"
    }

    fn brief(&self) -> &str {
        "List tracked repositories"
    }

    fn register(&mut self, setup: &mut CommandSetup) -> Result<()> {
        setup.add_option_spec(
            OptionSpec::from_spec("format:string")?
                .with_description("Output format")
                .one_of(&["plain", "json"])
                .with_default(Value::Str("plain".to_string())),
        )?;
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut Context, options: &OptionResult, _args: &[String]) -> Result<()> {
        let repos = sample_repos();
        match options.get_str("format") {
            Some("json") => {
                let body = serde_json::json!({
                    "repositories": repos
                        .iter()
                        .map(|(url, tags)| {
                            serde_json::json!({ "url": url, "tags": tags })
                        })
                        .collect::<Vec<_>>(),
                });
                println!("{body:#}");
            }
            _ => {
                for (url, tags) in &repos {
                    println!("{url}  [{}]", tags.join(", "));
                }
            }
        }
        Ok(())
    }
}

fn sample_repos() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        ("https://example.com/alpha.git", vec!["demo"]),
        ("https://example.com/beta.git", vec!["demo", "archived"]),
    ]
}

/// Maps the global verbosity flags onto the log filter. The subscriber
/// must exist before dispatch starts, so this scans raw argv instead of
/// waiting for the parsed result.
fn init_logging(argv: &[String]) {
    let level = if argv.iter().any(|a| a == "-d" || a == "--debug") {
        tracing::Level::DEBUG
    } else if argv.iter().any(|a| a == "-v" || a == "--verbose") {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let argv: Vec<String> = std::env::args().collect();
    init_logging(&argv);

    let app = Application::new(Box::new(DemoApp));
    if !app.run_or_report(&argv) {
        std::process::exit(1);
    }
}
