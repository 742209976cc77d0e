use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context as AnyhowContext, Result};
use clap::Parser;
use htkit_catalog::Catalog;
use htkit_protocol::{help_response_schema, serialize_json, ErrorEnvelope};
use htkit_search::CategoryTable;

pub mod help;
pub mod logging;
pub mod render;
pub mod table_search;

pub use help::build_help_response;
pub use table_search::{run_table_search, run_table_search_all, TableSearchConfig};

#[derive(Parser, Debug)]
#[command(name = "ht-help")]
#[command(about = "Workflow guide and recommender for HTKit agents", long_about = None)]
#[command(disable_version_flag = true)]
pub struct HelpCli {
    /// Workflow name, task description or search term (empty for overview)
    pub input: Vec<String>,

    /// Agent directory holding workflows/ and skills/
    #[arg(long, env = "HT_HELP_AGENT_DIR", default_value = ".agent")]
    pub agent_dir: PathBuf,

    /// Category table (JSON or TOML) replacing the bundled one
    #[arg(long, env = "HT_HELP_TABLE")]
    pub table: Option<PathBuf>,

    /// Emit the response as JSON instead of markdown
    #[arg(long)]
    pub json: bool,

    /// Print the JSON schema of the response and exit
    #[arg(long)]
    pub schema: bool,

    /// Print version and catalog counts
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Parser, Debug)]
#[command(name = "ht-search")]
#[command(about = "BM25 search over domain reference tables", long_about = None)]
#[command(version)]
pub struct SearchCli {
    /// Search query
    pub query: String,

    /// Table config (JSON or TOML)
    #[arg(long, short = 'c')]
    pub config: PathBuf,

    /// Domain to search; detected from the query when omitted
    #[arg(long, short = 'd')]
    pub domain: Option<String>,

    /// Search every domain, each with its own result limit
    #[arg(long, conflicts_with = "domain")]
    pub all: bool,

    /// Maximum results (defaults to the config's max_results)
    #[arg(long, short = 'n')]
    pub max_results: Option<usize>,

    /// Emit the response as JSON instead of markdown
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long)]
    pub quiet: bool,
}

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|()| {
            if text.ends_with('\n') {
                Ok(())
            } else {
                stdout.write_all(b"\n")
            }
        })
        .and_then(|()| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn report_failure(err: &anyhow::Error, code: &str, json: bool) -> ExitCode {
    if json {
        let envelope = ErrorEnvelope::new(code, format!("{err:#}"));
        match serialize_json(&envelope) {
            Ok(text) => {
                let _ = print_stdout(&text);
            }
            Err(_) => eprintln!("Error: {err:#}"),
        }
    } else {
        eprintln!("Error: {err:#}");
    }
    ExitCode::FAILURE
}

pub fn help_entry() -> ExitCode {
    let cli = HelpCli::parse();
    logging::init_logging(cli.verbose, cli.quiet || cli.json);
    match run_help(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_failure(&err, "help_failed", cli.json),
    }
}

fn load_table(path: Option<&Path>) -> Result<CategoryTable> {
    match path {
        Some(path) => {
            log::debug!("Loading category table from {}", path.display());
            CategoryTable::from_file(path)
                .with_context(|| format!("Failed to load category table {}", path.display()))
        }
        None => Ok(CategoryTable::builtin()),
    }
}

pub fn run_help(cli: &HelpCli) -> Result<()> {
    if cli.schema {
        return print_stdout(&help_response_schema()?);
    }

    let catalog = Catalog::discover(&cli.agent_dir)
        .with_context(|| format!("Failed to scan {}", cli.agent_dir.display()))?;
    log::debug!(
        "Found {} workflows and {} skills in {}",
        catalog.workflows.len(),
        catalog.skills.len(),
        cli.agent_dir.display()
    );

    if cli.version {
        return print_stdout(&format!(
            "HTKit Help v{}\nWorkflows: {}, Skills: {}",
            env!("CARGO_PKG_VERSION"),
            catalog.workflows.len(),
            catalog.skills.len()
        ));
    }

    if catalog.workflows.is_empty() {
        bail!(
            "No workflows found in {}",
            htkit_catalog::workflows_dir(&cli.agent_dir).display()
        );
    }

    let table = load_table(cli.table.as_deref())?;
    let input = cli.input.join(" ");
    let response = build_help_response(&input, &catalog, &table);

    if cli.json {
        print_stdout(&serialize_json(&response)?)
    } else {
        print_stdout(&render::render_help(&response))
    }
}

pub fn search_entry() -> ExitCode {
    let cli = SearchCli::parse();
    logging::init_logging(cli.verbose, cli.quiet || cli.json);
    match run_search(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_failure(&err, "search_failed", cli.json),
    }
}

pub fn run_search(cli: &SearchCli) -> Result<()> {
    let config = TableSearchConfig::load(&cli.config)?;
    if cli.all {
        let response = run_table_search_all(&config, &cli.query, cli.max_results)?;
        return if cli.json {
            print_stdout(&serialize_json(&response)?)
        } else {
            print_stdout(&render::render_table_search_all(&response))
        };
    }

    let response = run_table_search(&config, &cli.query, cli.domain.as_deref(), cli.max_results)?;
    if cli.json {
        print_stdout(&serialize_json(&response)?)
    } else {
        print_stdout(&render::render_table_search(&response))
    }
}
