use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use seqdb_normalize::acquire::SystemAcquirer;
use seqdb_normalize::adapters::AdapterRegistry;
use seqdb_normalize::config::{ConfigLoader, RunConfig};
use seqdb_normalize::domain::SourceName;
use seqdb_normalize::error::SeqDbError;
use seqdb_normalize::exec::SystemRunner;
use seqdb_normalize::index::BlastIndexer;
use seqdb_normalize::output::{OutputMode, SummaryOutput};
use seqdb_normalize::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "seqdb-normalize")]
#[command(about = "Download an AMR/virulence/plasmid database and build a normalized BLAST database from it")]
#[command(version, author)]
struct Cli {
    #[arg(required_unless_present = "list", help = "Database to set up (see --list)")]
    source: Option<String>,

    #[arg(long, default_value = ".", help = "Parent directory for database folders; must already exist")]
    outdir: Utf8PathBuf,

    #[arg(long, help = "Re-download even if a previous download is present")]
    force: bool,

    #[arg(long, short, help = "Debug-level logging")]
    verbose: bool,

    #[arg(long, help = "JSON config with source URL and indexer overrides")]
    config: Option<String>,

    #[arg(long, help = "Skip building the BLAST index")]
    no_index: bool,

    #[arg(long, help = "Print the run summary as JSON")]
    json: bool,

    #[arg(long, help = "List known databases and exit")]
    list: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<SeqDbError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &SeqDbError) -> u8 {
    match error {
        SeqDbError::UnknownSource { .. }
        | SeqDbError::MissingOutputDir(_)
        | SeqDbError::ConfigRead(_)
        | SeqDbError::ConfigParse(_) => 2,
        SeqDbError::Http(_)
        | SeqDbError::HttpStatus { .. }
        | SeqDbError::MissingTool(_)
        | SeqDbError::CommandFailed(_)
        | SeqDbError::IndexFailed { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let registry = AdapterRegistry::default();
    if cli.list {
        SummaryOutput::print_sources(&registry.names()).into_diagnostic()?;
        return Ok(());
    }

    let Some(source) = cli.source.as_deref() else {
        return Err(miette::Report::msg("a database name is required (try --list)"));
    };
    let source: SourceName = source.parse()?;
    let sources = ConfigLoader::resolve(cli.config.as_deref())?;

    let config = RunConfig {
        source,
        outdir: cli.outdir,
        force: cli.force,
        index: !cli.no_index,
        sources,
    };

    let acquirer = SystemAcquirer::new(SystemRunner)?;
    let indexer = BlastIndexer::new(SystemRunner, config.sources.indexer_program.as_str());
    let pipeline = Pipeline::new(registry, acquirer, indexer);
    let summary = pipeline.run(&config)?;

    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    SummaryOutput::print(&summary, mode).into_diagnostic()?;
    Ok(())
}
