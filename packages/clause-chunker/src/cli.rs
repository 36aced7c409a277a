//! Command-line interface for the clause chunker.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::PipelineConfig;
use crate::error::{ChunkerError, Result};
use crate::pipeline::{
    build_schemas, collect_stage, emit_all_chunks, run as run_pipeline, StageReport,
};

/// Clause Chunker - Turn converter block trees into linked clause chunks.
#[derive(Parser)]
#[command(name = "clause-chunker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub paths: PathArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Directory overrides, applied on top of the environment configuration.
#[derive(Args, Debug, Default)]
pub struct PathArgs {
    /// Base data directory (default: $CLAUSE_CHUNKER_DATA_DIR or data/)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Converter output directory (<doc>/<doc>.json)
    #[arg(long, global = true)]
    pub marker_dir: Option<PathBuf>,

    /// Block tree directory
    #[arg(long, global = true)]
    pub input_dir: Option<PathBuf>,

    /// Schema output directory
    #[arg(long, global = true)]
    pub schema_dir: Option<PathBuf>,

    /// Chunk output directory
    #[arg(long, global = true)]
    pub chunk_dir: Option<PathBuf>,

    /// Image output directory
    #[arg(long, global = true)]
    pub asset_dir: Option<PathBuf>,

    /// Also extract tables, figures and images
    #[arg(long, global = true)]
    pub assets: bool,
}

impl PathArgs {
    /// Resolve the pipeline configuration.
    #[must_use]
    pub fn to_config(&self) -> PipelineConfig {
        let mut config = match &self.data_dir {
            Some(dir) => {
                PipelineConfig::new(dir).with_assets(PipelineConfig::from_env().extract_assets)
            }
            None => PipelineConfig::from_env(),
        };
        if let Some(dir) = &self.marker_dir {
            config = config.with_marker_dir(dir);
        }
        if let Some(dir) = &self.input_dir {
            config = config.with_input_dir(dir);
        }
        if let Some(dir) = &self.schema_dir {
            config = config.with_schema_dir(dir);
        }
        if let Some(dir) = &self.chunk_dir {
            config = config.with_chunk_dir(dir);
        }
        if let Some(dir) = &self.asset_dir {
            config = config.with_asset_dir(dir);
        }
        if self.assets {
            config = config.with_assets(true);
        }
        config
    }
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Copy converter output into the block tree directory.
    Collect,

    /// Build clause schemas from block trees.
    Build,

    /// Emit clause chunks from schemas.
    Chunk,

    /// Run collect, build and chunk.
    Run,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.paths.to_config();

    match cli.command {
        Commands::Collect => stage_command("Collecting", &config, collect_stage),
        Commands::Build => stage_command("Building schemas", &config, build_schemas),
        Commands::Chunk => stage_command("Emitting chunks", &config, emit_all_chunks),
        Commands::Run => run_command(&config),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn stage_command(
    label: &str,
    config: &PipelineConfig,
    stage: fn(&PipelineConfig) -> Result<StageReport>,
) -> Result<()> {
    let pb = spinner(&format!("{label}..."));
    let result = stage(config);
    pb.finish_and_clear();

    let report = result?;
    print_report(label, &report);
    check(&[&report])
}

fn run_command(config: &PipelineConfig) -> Result<()> {
    println!(
        "{} {}",
        style("Processing").bold(),
        style(config.input_dir.display()).cyan()
    );
    println!();

    let pb = spinner("Running pipeline...");
    let result = run_pipeline(config);
    pb.finish_and_clear();

    let report = result?;
    print_report("Collect", &report.collect);
    print_report("Build", &report.build);
    print_report("Chunk", &report.chunk);

    println!();
    println!(
        "{} {}",
        style("Chunks in:").green().bold(),
        config.chunk_dir.display()
    );

    check(&[&report.collect, &report.build, &report.chunk])
}

fn print_report(label: &str, report: &StageReport) {
    println!(
        "  {}: {} processed, {} written",
        style(label).bold(),
        style(report.processed).green(),
        report.written
    );
    for issue in &report.skipped {
        println!(
            "    {} {}: {}",
            style("skipped").yellow(),
            issue.path.display(),
            issue.message
        );
    }
    for issue in &report.failed {
        println!(
            "    {} {}: {}",
            style("failed").red().bold(),
            issue.path.display(),
            issue.message
        );
    }
}

fn check(reports: &[&StageReport]) -> Result<()> {
    let failed: usize = reports.iter().map(|r| r.failed.len()).sum();
    if failed > 0 {
        return Err(ChunkerError::DocumentsFailed(failed));
    }
    Ok(())
}
