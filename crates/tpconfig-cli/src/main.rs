//! tpconfig CLI tool
//!
//! Reads a Tmax tp_config file and prints what it defines.
//!
//! Examples:
//!   tpconfig --file tp_config summary     - counts and names
//!   tpconfig node NODE1                   - one node and its server groups
//!   tpconfig servers --json               - every SERVER placement as JSON
//!   tpconfig check                        - warnings about dropped input

use std::io;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tpconfig_cache::{DocumentCache, ReloadError};
use tpconfig_tree::{LoadError, parse_with_diagnostics};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod render;
mod settings;

use render::Renderer;
use settings::{LoadSettingsError, Settings, load_settings};

// ============================================================================
// Exit codes
// ============================================================================

const EXIT_SUCCESS: i32 = 0;
const EXIT_NOT_FOUND: i32 = 1;
const EXIT_USAGE: i32 = 2;
const EXIT_IO_ERROR: i32 = 3;
const EXIT_SETTINGS_ERROR: i32 = 4;

// ============================================================================
// CLI argument structures
// ============================================================================

/// Inspect Tmax tp_config files.
#[derive(Parser, Debug)]
#[command(name = "tpconfig", version)]
struct Cli {
    /// tp_config file to read
    #[arg(short, long, env = "TPCONFIG_FILE", global = true)]
    file: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Command {
    /// Domain, counts, node names and the first server groups
    Summary,

    /// Show one node and the server groups placed on it
    Node {
        /// Node name
        name: String,
    },

    /// Show one server group and its servers
    Svrgroup {
        /// Server group name
        name: String,
    },

    /// List nodes
    Nodes,

    /// List server groups
    Svrgroups,

    /// List every SERVER placement
    Servers,

    /// List services
    Services,

    /// List gateways
    Gateways,

    /// Print the whole document as JSON
    Dump,

    /// Print warnings about dropped or overwritten entries
    Check,

    /// Show how each line was classified and the entries built from them
    Lines,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = load_settings()?;
    let path = settings.resolve_config_file(cli.file).ok_or_else(|| {
        CliError::Usage(
            "no tp_config file given; pass --file, set TPCONFIG_FILE or add config_file to the settings"
                .to_string(),
        )
    })?;
    debug!(?path, command = ?cli.command, "running");

    let context = Context {
        path,
        settings,
        json: cli.json,
    };
    match cli.command {
        Command::Check => run_check(&context.path),
        Command::Lines => run_lines(&context.path),
        command => context.run_query(command),
    }
}

/// Everything a query command needs.
struct Context {
    path: PathBuf,
    settings: Settings,
    json: bool,
}

impl Context {
    fn run_query(&self, command: Command) -> Result<(), CliError> {
        let snapshot = DocumentCache::new(&self.path).get()?;
        let document = &snapshot.document;
        let renderer = Renderer::new(&self.settings.missing);

        match command {
            Command::Summary => {
                let summary = document.summary_with_limit(self.settings.summary_group_limit);
                self.emit(&summary, || renderer.summary(&summary))
            }
            Command::Node { name } => {
                let node = document.node_info(&name).ok_or(CliError::NotFound {
                    kind: "node",
                    name: name.clone(),
                })?;
                self.emit(&node, || renderer.node(&node))
            }
            Command::Svrgroup { name } => {
                let group = document
                    .server_group_info(&name)
                    .ok_or(CliError::NotFound {
                        kind: "server group",
                        name: name.clone(),
                    })?;
                self.emit(&group, || renderer.server_group(&group))
            }
            Command::Nodes => {
                let nodes = document.node_infos();
                self.emit(&nodes, || renderer.nodes(&nodes))
            }
            Command::Svrgroups => {
                let groups = document.server_group_infos();
                self.emit(&groups, || renderer.server_groups(&groups))
            }
            Command::Servers => {
                let servers = document.server_placements();
                self.emit(&servers, || renderer.servers(&servers))
            }
            Command::Services => {
                let services = document.service_rows();
                self.emit(&services, || renderer.services(&services))
            }
            Command::Gateways => {
                let gateways = document.gateway_rows();
                self.emit(&gateways, || renderer.gateways(&gateways))
            }
            Command::Dump => print_json(document),
            Command::Check | Command::Lines => Ok(()),
        }
    }

    /// Print `value` as JSON or as the text from `text`.
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<(), CliError> {
        if self.json {
            print_json(value)
        } else {
            print!("{}", text());
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

fn read_source(path: &Path) -> Result<String, CliError> {
    let bytes = std::fs::read(path).map_err(|error| LoadError::Io {
        path: Some(path.to_path_buf()),
        error,
    })?;
    Ok(tpconfig_parse::decode(&bytes).into_owned())
}

fn run_check(path: &Path) -> Result<(), CliError> {
    let source = read_source(path)?;
    let parsed = parse_with_diagnostics(&source);
    let filename = path.display().to_string();

    for diagnostic in &parsed.diagnostics {
        diagnostic.write_report(&filename, &source, io::stdout());
    }
    match parsed.diagnostics.len() {
        0 => println!("{filename}: no problems found"),
        1 => println!("{filename}: 1 warning"),
        n => println!("{filename}: {n} warnings"),
    }
    Ok(())
}

fn run_lines(path: &Path) -> Result<(), CliError> {
    let source = read_source(path)?;
    print!("{}", render::lines(&source));
    Ok(())
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug)]
enum CliError {
    Io(io::Error),
    Load(LoadError),
    Settings(LoadSettingsError),
    NotFound { kind: &'static str, name: String },
    Usage(String),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Io(_) => EXIT_IO_ERROR,
            CliError::Load(_) => EXIT_IO_ERROR,
            CliError::Settings(_) => EXIT_SETTINGS_ERROR,
            CliError::NotFound { .. } => EXIT_NOT_FOUND,
            CliError::Usage(_) => EXIT_USAGE,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{e}"),
            CliError::Load(e) => write!(f, "{e}"),
            CliError::Settings(e) => write!(f, "{e}"),
            CliError::NotFound { kind, name } => write!(f, "{kind} `{name}` not found"),
            CliError::Usage(e) => write!(f, "{e}"),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Io(io::Error::other(e))
    }
}

impl From<LoadError> for CliError {
    fn from(e: LoadError) -> Self {
        CliError::Load(e)
    }
}

impl From<ReloadError> for CliError {
    fn from(e: ReloadError) -> Self {
        CliError::Load(e.into_load_error())
    }
}

impl From<LoadSettingsError> for CliError {
    fn from(e: LoadSettingsError) -> Self {
        CliError::Settings(e)
    }
}
