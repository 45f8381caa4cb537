//! CLI command definitions, routing, and tracing setup.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use docsmith_pipeline::{BatchOptions, BatchResult, KvEntry, PipelineConfig, run as run_batch};
use tracing::{error, info};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docsmith: documentation repositories in, storage entries out.
#[derive(Parser)]
#[command(
    name = "docsmith",
    version,
    about = "Turn a documentation checkout into slugged, key/value ready pages.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Process every document and write the storage entries as JSON.
    Build {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file (defaults to stdout).
        #[arg(short, long, env = "DOCSMITH_OUTPUT")]
        output: Option<PathBuf>,

        /// Maximum number of worker threads.
        #[arg(long, env = "DOCSMITH_THREADS")]
        threads: Option<usize>,
    },

    /// Print the resolved configuration.
    Config {
        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Where the documentation lives and how to read it.
#[derive(Args, Debug, Clone)]
pub(crate) struct SourceArgs {
    /// Repository checkout to read.
    #[arg(long, default_value = ".", env = "DOCSMITH_ROOT")]
    pub root: PathBuf,

    /// JSON configuration file.
    #[arg(short, long, env = "DOCSMITH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Documentation root relative to the checkout.
    #[arg(long, env = "DOCSMITH_DOCS_PATH")]
    pub docs_path: Option<String>,

    /// Packages directory relative to the checkout.
    #[arg(long, env = "DOCSMITH_PKG_PATH")]
    pub pkg_path: Option<String>,

    /// Project name (defaults to the checkout directory name).
    #[arg(long, env = "DOCSMITH_PROJECT_NAME")]
    pub project_name: Option<String>,

    /// Keep non-Latin letters in slugs.
    #[arg(long)]
    pub preserve_unicode: bool,

    /// Package to leave out in README mode (repeatable).
    #[arg(long = "ignore-package")]
    pub ignore_packages: Vec<String>,
}

impl SourceArgs {
    /// Loads the configuration file, if any, and applies flag overrides.
    pub fn resolve(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(docs_path) = &self.docs_path {
            config.docs_path = docs_path.clone();
        }
        if let Some(pkg_path) = &self.pkg_path {
            config.pkg_path = pkg_path.clone();
        }
        if let Some(project_name) = &self.project_name {
            config.project_name = Some(project_name.clone());
        }
        if self.preserve_unicode {
            config.slug.preserve_unicode = true;
        }
        config
            .ignore_packages
            .extend(self.ignore_packages.iter().cloned());

        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// `RUST_LOG` wins over `-v`. Records from the `log` facade used by the
/// library crates are forwarded to the same subscriber.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docsmith=info",
        1 => "docsmith=debug",
        _ => "docsmith=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build {
            source,
            output,
            threads,
        } => cmd_build(&source, output.as_deref(), threads),
        Command::Config { source } => cmd_config(&source),
    }
}

fn cmd_build(source: &SourceArgs, output: Option<&Path>, threads: Option<usize>) -> Result<()> {
    let config = source.resolve()?;
    info!(
        root = %source.root.display(),
        docs_path = %config.docs_path,
        pkg_path = %config.pkg_path,
        "building documentation"
    );

    let result = run_batch(
        &source.root,
        &config,
        &BatchOptions {
            max_threads: threads,
        },
    )?;

    let entries: Vec<&KvEntry> = result.entries().collect();
    match output {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("cannot create {}", path.display()))?;
            write_entries(BufWriter::new(file), &entries)?;
        }
        None => write_entries(io::stdout().lock(), &entries)?,
    }

    report(&result)
}

fn cmd_config(source: &SourceArgs) -> Result<()> {
    let config = source.resolve()?;
    let json = serde_json::to_string_pretty(&config)?;
    println!("{json}");
    Ok(())
}

fn write_entries<W: Write>(mut writer: W, entries: &[&KvEntry]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, entries)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn report(result: &BatchResult) -> Result<()> {
    for (project, failure) in result.failures() {
        error!(project, category = %failure.category, "{}", failure.error);
    }

    let stats = &result.stats;
    info!(
        projects = stats.projects,
        succeeded = stats.succeeded,
        failed = stats.failed,
        skipped = stats.skipped,
        elapsed_ms = stats.processing_time_ms,
        "done"
    );

    if result.has_failures() {
        return Err(eyre!("{} documents failed", stats.failed));
    }
    Ok(())
}
