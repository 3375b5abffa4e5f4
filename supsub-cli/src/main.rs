//! Command-line interface for supsub
//! Runs the sanitizer and the mirror-format checker over files, so stored answers can be
//! cleaned or audited outside an editor.
//!
//! Usage:
//!   supsub clean `<path>`                          - Run the clean pipeline, print the result
//!   supsub paste `<path>`                          - Clean as clipboard HTML
//!   supsub check `<path>` [--format text|json]     - Validate mirror format, exit 1 on violations
//!   supsub config                                  - Print the effective editor settings
//!
//! `-` reads from stdin. `--config <file>` layers a TOML file over the built-in defaults.

use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use std::io::Read;
use supsub::supsub::markup::{self, Violation};
use supsub::supsub::sanitizer;
use supsub_config::{Loader, OutputFormat, SupsubConfig};
use tracing::{debug, Level};

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Input file, or '-' for stdin")
        .required(true)
        .index(1)
}

fn cli() -> Command {
    Command::new("supsub")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sanitize and check superscript/subscript markup")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the default configuration"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Log to stderr; repeat for more detail"),
        )
        .subcommand(
            Command::new("clean")
                .about("Reduce HTML to text plus bare <sup>/<sub> tags")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("paste")
                .about("Clean HTML the way clipboard content is cleaned")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Validate that input is in mirror format")
                .arg(path_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .value_parser(["text", "json"])
                        .help("Report format (default from configuration)"),
                ),
        )
        .subcommand(Command::new("config").about("Print the effective editor settings as JSON"))
}

fn main() {
    let matches = cli().get_matches();
    init_logging(matches.get_count("verbose"));

    let config = load_config(&matches).unwrap_or_else(|e| fail(&format!("Configuration error: {}", e)));

    let code = match matches.subcommand() {
        Some(("clean", sub)) => {
            print!("{}", sanitizer::clean(&read_input(sub)));
            0
        }
        Some(("paste", sub)) => {
            print!("{}", sanitizer::clean_paste(&read_input(sub)));
            0
        }
        Some(("check", sub)) => handle_check_command(sub, &config),
        Some(("config", _)) => {
            let json = serde_json::to_string_pretty(&config.editor)
                .unwrap_or_else(|e| fail(&format!("Error formatting settings: {}", e)));
            println!("{}", json);
            0
        }
        _ => fail("Unknown command"),
    };
    std::process::exit(code);
}

fn init_logging(verbosity: u8) {
    if verbosity == 0 {
        return;
    }
    let level = match verbosity {
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<SupsubConfig, supsub_config::ConfigError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        debug!(%path, "layering configuration file");
        loader = loader.with_file(path);
    }
    loader.build()
}

fn read_input(matches: &ArgMatches) -> String {
    let path = matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or("-");
    let result = if path == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer).map(|_| buffer)
    } else {
        std::fs::read_to_string(path)
    };
    result.unwrap_or_else(|e| fail(&format!("Cannot read {}: {}", path, e)))
}

#[derive(Serialize)]
struct CheckReport {
    valid: bool,
    violations: Vec<Violation>,
}

/// Handle the check command. Returns the exit code: 0 when the input is valid.
fn handle_check_command(matches: &ArgMatches, config: &SupsubConfig) -> i32 {
    let input = read_input(matches);
    let format = match matches.get_one::<String>("format").map(String::as_str) {
        Some("json") => OutputFormat::Json,
        Some(_) => OutputFormat::Text,
        None => config.output.format,
    };

    let result = markup::validate(&input);
    let valid = result.is_ok();
    match format {
        OutputFormat::Text => match &result {
            Ok(()) => println!("ok"),
            Err(err) => println!("{}", err),
        },
        OutputFormat::Json => {
            let report = CheckReport {
                valid,
                violations: result.err().map(|e| e.violations).unwrap_or_default(),
            };
            let json = serde_json::to_string_pretty(&report)
                .unwrap_or_else(|e| fail(&format!("Error formatting report: {}", e)));
            println!("{}", json);
        }
    }
    if valid {
        0
    } else {
        1
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(2);
}
