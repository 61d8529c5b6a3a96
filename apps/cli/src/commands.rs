//! CLI command definitions, routing, and tracing setup.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use leettutor_core::pipeline::{self, PopulateContext, ProgressReporter};
use leettutor_core::port::{DocumentEditPort, NotebookFilePort};
use leettutor_shared::{
    AppConfig, LeetTutorError, StateStore, init_config, load_config, load_config_from,
};

const WELCOME: &str = "Welcome to LeetTutor! Create a notebook and start solving problems with LeetCode data.\n\
Run `leettutor new <PATH>` to create one, then `leettutor populate <ID>`.";

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// LeetTutor: turn LeetCode problems into notebook cells.
#[derive(Parser)]
#[command(
    name = "leettutor",
    version,
    about = "Fetch LeetCode problems into Jupyter notebooks with starter code and test harnesses.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.leettutor/leettutor.toml).
    #[arg(long, global = true, env = "LEETTUTOR_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Create a new LeetTutor notebook and make it the active one.
    New {
        /// Path of the notebook to create (e.g. practice.ipynb).
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Append a problem to the active notebook.
    Populate {
        /// Problem number or title slug (prompted for when omitted).
        identifier: Option<String>,

        /// Notebook to edit (defaults to the active notebook).
        #[arg(short, long)]
        notebook: Option<PathBuf>,
    },

    /// Append today's daily challenge to the active notebook.
    Daily {
        /// Notebook to edit (defaults to the active notebook).
        #[arg(short, long)]
        notebook: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Create a default config file at ~/.leettutor/leettutor.toml.
    Init,
    /// Show the resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "leettutor=info",
        1 => "leettutor=debug",
        _ => "leettutor=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let state = StateStore::open_default()?;
    show_welcome_once(&state);

    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    match cli.command {
        Command::New { path, force } => cmd_new(&state, &path, force),
        Command::Populate {
            identifier,
            notebook,
        } => cmd_populate(&state, &config, identifier, notebook).await,
        Command::Daily { notebook } => cmd_daily(&state, &config, notebook).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

fn show_welcome_once(state: &StateStore) {
    match state.take_first_run() {
        Ok(true) => println!("{WELCOME}\n"),
        Ok(false) => {}
        Err(e) => warn!(error = %e, "could not record welcome flag"),
    }
}

/// `--notebook` if given, else the remembered active notebook.
fn resolve_notebook(state: &StateStore, flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| state.load().active_notebook)
}

fn remember_active(state: &StateStore, path: &Path) {
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    if let Err(e) = state.set_active_notebook(&path) {
        warn!(error = %e, "could not record active notebook");
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_new(state: &StateStore, path: &Path, force: bool) -> Result<()> {
    pipeline::create_notebook(path, force).wrap_err("failed to create notebook")?;
    remember_active(state, path);

    println!("Created {} (now the active notebook)", path.display());
    Ok(())
}

async fn cmd_populate(
    state: &StateStore,
    config: &AppConfig,
    identifier: Option<String>,
    notebook: Option<PathBuf>,
) -> Result<()> {
    let port = NotebookFilePort::new(resolve_notebook(state, notebook));

    // Fail before prompting when there is nothing to populate.
    if identifier.is_none() && port.current_document().await?.is_none() {
        return Err(LeetTutorError::NoActiveDocument.into());
    }

    let identifier = match identifier {
        Some(id) => id,
        None => match prompt_identifier()? {
            Some(id) => id,
            None => {
                println!("Cancelled.");
                return Ok(());
            }
        },
    };

    info!(identifier = %identifier, "populating notebook");

    let reporter = CliProgress::new();
    let ctx = PopulateContext {
        config,
        port: &port,
        progress: &reporter,
    };
    let summary = pipeline::populate_from_api(ctx, &identifier)
        .await
        .wrap_err("failed to populate notebook")?;
    remember_active(state, summary.document.path());

    println!("  Notebook:      {}", summary.document);
    println!("  Cells added:   {} (from cell {})", summary.cells_added, summary.position);
    println!("  Starter code:  {}", summary.template_source);
    if !summary.dependencies.is_empty() {
        println!("  Dependencies:  {}", summary.dependencies.join(", "));
    }
    println!("  Time:          {:.1}s", summary.elapsed.as_secs_f64());
    Ok(())
}

async fn cmd_daily(
    state: &StateStore,
    config: &AppConfig,
    notebook: Option<PathBuf>,
) -> Result<()> {
    let port = NotebookFilePort::new(resolve_notebook(state, notebook));

    let reporter = CliProgress::new();
    let ctx = PopulateContext {
        config,
        port: &port,
        progress: &reporter,
    };
    let summary = pipeline::populate_daily(ctx)
        .await
        .wrap_err("failed to populate daily challenge")?;
    remember_active(state, summary.document.path());

    println!("  Notebook:      {}", summary.document);
    println!("  Cells added:   {}", summary.cells_added);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

/// Ask for a problem identifier on stdin. An empty answer cancels.
fn prompt_identifier() -> Result<Option<String>> {
    print!("Enter LeetCode problem number or title slug (e.g., 1 or two-sum): ");
    std::io::stdout()
        .flush()
        .map_err(|e| eyre!("cannot write prompt: {e}"))?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| eyre!("cannot read identifier: {e}"))?;

    let line = line.trim();
    Ok((!line.is_empty()).then(|| line.to_string()))
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, message: &str) {
        self.spinner.finish_and_clear();
        println!("{message}");
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
