//! adgm-checker CLI
//!
//! - `analyze` annotates `.docx` files and writes JSON issue reports
//! - `ingest` rebuilds the reference index from `.pdf` / `.docx` sources
//! - `check` verifies that `.docx` files can be opened

use std::path::PathBuf;
use std::sync::Arc;

use adgm_checker::inputs::{check_dir, collect_docx};
use adgm_checker::{Analyzer, AnalyzerSettings, CheckerConfig, Secrets};
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use corpus_core::{build_embedder, ingest_dir, ReferenceIndex, Retriever};
use futures::stream::{self, StreamExt};
use llm_adjudicator::build_adjudicator;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for the ADGM compliance checker
#[derive(Parser, Debug)]
#[command(name = "adgm-checker")]
#[command(about = "Check corporate .docx documents against ADGM compliance rules")]
struct Cli {
    /// TOML configuration file (defaults to ./adgm-checker.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse .docx files or directories of them
    Analyze {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory for annotated copies and reports
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Skip model adjudication
        #[arg(long)]
        no_llm: bool,
    },
    /// Rebuild the reference index from a directory of sources
    Ingest {
        /// Source directory (defaults to `paths.reference_dir`)
        dir: Option<PathBuf>,

        /// Index file to write
        #[arg(long)]
        index: Option<PathBuf>,
    },
    /// Verify that each .docx in a directory opens
    Check { dir: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = CheckerConfig::load(cli.config.as_deref())?;
    let secrets = Secrets::from_env();

    match cli.command {
        Command::Analyze {
            inputs,
            output_dir,
            no_llm,
        } => {
            if let Some(dir) = output_dir {
                config.paths.output_dir = dir;
            }
            run_analyze(&config, &secrets, &inputs, no_llm).await
        }
        Command::Ingest { dir, index } => {
            if let Some(path) = index {
                config.paths.index_path = Some(path);
            }
            let dir = config.reference_dir(dir.as_deref());
            run_ingest(&config, &secrets, &dir).await
        }
        Command::Check { dir } => run_check(&dir),
    }
}

fn build_analyzer(
    config: &CheckerConfig,
    secrets: &Secrets,
    no_llm: bool,
) -> anyhow::Result<Analyzer> {
    let settings = AnalyzerSettings {
        output_dir: config.paths.output_dir.clone(),
        top_k: config.retrieval.top_k,
        adjudication_timeout: config.llm.timeout(),
        document_timeout: Some(config.runtime.document_timeout()),
    };
    let mut analyzer = Analyzer::new(settings);

    match config.index_read_path() {
        Some(path) => {
            let index = ReferenceIndex::load(&path)
                .with_context(|| format!("Failed to load reference index: {}", path.display()))?;
            let embedder = build_embedder(&config.embeddings, secrets.openai_api_key.as_deref())?;
            info!(
                path = %path.display(),
                sources = index.sources.len(),
                chunks = index.len(),
                "Loaded reference index"
            );
            analyzer = analyzer.with_retriever(Retriever::new(Arc::new(index), embedder)?);
        }
        None => info!("No reference index configured; running without retrieval"),
    }

    if no_llm {
        info!("Model adjudication disabled");
        return Ok(analyzer);
    }

    let provider = config.llm.provider;
    match build_adjudicator(&config.llm, secrets.for_provider(provider)) {
        Ok(Some(adjudicator)) => {
            info!(adjudicator = adjudicator.name(), "Model adjudication enabled");
            analyzer = analyzer.with_adjudicator(adjudicator);
        }
        Ok(None) => info!("Model adjudication disabled"),
        Err(e) => warn!(error = %e, "Model adjudication disabled"),
    }
    Ok(analyzer)
}

async fn run_analyze(
    config: &CheckerConfig,
    secrets: &Secrets,
    inputs: &[PathBuf],
    no_llm: bool,
) -> anyhow::Result<()> {
    let files = collect_docx(inputs).context("Failed to list input documents")?;
    if files.is_empty() {
        warn!("No .docx documents found");
        return Ok(());
    }

    let analyzer = build_analyzer(config, secrets, no_llm)?;
    let parallel = config.runtime.max_parallel_documents.max(1);
    info!(documents = files.len(), parallel, "Starting analysis");

    let analyzer = &analyzer;
    let mut results: Vec<_> = stream::iter(files)
        .map(|path| async move {
            let result = analyzer.analyze(&path).await;
            (path, result)
        })
        .buffer_unordered(parallel)
        .collect()
        .await;
    results.sort_by(|a, b| a.0.cmp(&b.0));

    let mut failed = 0;
    for (path, result) in &results {
        match result {
            Ok(outcome) => println!("{}", outcome.summary_line()),
            Err(e) => {
                failed += 1;
                error!(file = %path.display(), error = %e, "Analysis failed");
                println!("[ERROR] {}: {}", path.display(), e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} documents failed", failed, results.len());
    }
    Ok(())
}

async fn run_ingest(
    config: &CheckerConfig,
    secrets: &Secrets,
    dir: &std::path::Path,
) -> anyhow::Result<()> {
    let embedder = build_embedder(&config.embeddings, secrets.openai_api_key.as_deref())?;
    let (index, summary) = ingest_dir(dir, embedder.as_ref(), &config.retrieval.chunker())
        .await
        .with_context(|| format!("Failed to ingest {}", dir.display()))?;

    let path = config.index_write_path();
    index.save(&path)?;

    println!(
        "Ingested {} sources ({} chunks, {} skipped) into {}",
        summary.ingested.len(),
        summary.chunks,
        summary.skipped.len(),
        path.display()
    );
    Ok(())
}

fn run_check(dir: &std::path::Path) -> anyhow::Result<()> {
    let results = check_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?;
    if results.is_empty() {
        println!("No .docx files found in {}", dir.display());
    }
    for result in &results {
        println!("{}", result.line());
    }
    Ok(())
}
