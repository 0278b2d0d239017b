use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use manifesto::config::{self, Config};
use manifesto::output::chart::{ChartRenderer, ChartStyle, PartyPalette};
use manifesto::output::terminal;
use manifesto::topics::{build_table, DirectoryLoader, FrequencyTable, TopicCatalog};

/// Manifesto: how much each party's manifesto talks about each topic.
///
/// Counts topic keywords per 1000 words in each `{party}.txt` and draws a
/// grouped bar chart comparing the parties.
#[derive(Parser)]
#[command(name = "manifesto", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute topic rates and render the comparison chart
    Chart {
        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Output image (default: Manifestos.png, or MANIFESTO_OUTPUT)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// TrueType font for chart labels (default: MANIFESTO_FONT or a system font)
        #[arg(long)]
        font: Option<PathBuf>,
    },

    /// Compute topic rates and print them without drawing a chart
    Table {
        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Print the table as JSON instead of bars
        #[arg(long)]
        json: bool,
    },

    /// List the topics and their keywords
    Topics {
        /// JSON file of topics to use instead of the built-in ones
        #[arg(long)]
        topics: Option<PathBuf>,
    },
}

#[derive(Args)]
struct AnalysisArgs {
    /// Documents to analyze, read from `{docs-dir}/{name}.txt`
    /// (default: Tory Labour Reform Libdems Greens SNP)
    documents: Vec<String>,

    /// Directory holding the document files (default: MANIFESTO_DOCS_DIR or .)
    #[arg(long)]
    docs_dir: Option<PathBuf>,

    /// Ignore words shorter than this many letters (default: 1)
    #[arg(long)]
    min_length: Option<usize>,

    /// JSON file of topics to use instead of the built-in ones
    #[arg(long)]
    topics: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("manifesto=info")),
        )
        .init();

    run(Cli::parse())
}

/// Dispatch one subcommand. Only the analysis commands read the environment
/// config, so `topics` works even when it is malformed.
fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Chart {
            analysis,
            output,
            font,
        } => {
            let mut config = Config::load()?;
            if let Some(output) = output {
                config.output_path = output;
            }
            if font.is_some() {
                config.font_path = font;
            }

            // Fail on a bad palette before doing any reading
            let palette = PartyPalette::standard()?;
            let table = run_analysis(&analysis, &mut config)?;
            terminal::display_table(&table);

            let mut renderer = ChartRenderer::new(ChartStyle::default());
            match config.resolve_font() {
                Some(path) => {
                    renderer = renderer
                        .with_font(&path)
                        .with_context(|| format!("Failed to load chart font {}", path.display()))?;
                }
                None => {
                    warn!("No TrueType font found; chart will have no text labels");
                    println!(
                        "{} no font found, drawing the chart without labels.\n\
                         Set MANIFESTO_FONT or pass --font to add them.",
                        "Warning:".yellow()
                    );
                }
            }

            renderer.render(&table, &palette, &config.output_path)?;
            println!(
                "{}",
                format!("Chart saved to: {}", config.output_path.display()).bold()
            );
        }

        Commands::Table { analysis, json } => {
            let mut config = Config::load()?;
            let table = run_analysis(&analysis, &mut config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                terminal::display_table(&table);
            }
        }

        Commands::Topics { topics } => {
            let catalog = load_catalog(topics.as_ref())?;
            terminal::display_topics(&catalog);
        }
    }

    Ok(())
}

/// Apply CLI overrides, then load, normalize and count every document.
fn run_analysis(args: &AnalysisArgs, config: &mut Config) -> Result<FrequencyTable> {
    if let Some(dir) = &args.docs_dir {
        config.documents_dir = dir.clone();
    }
    if let Some(min_length) = args.min_length {
        config.min_length = min_length;
    }

    let catalog = load_catalog(args.topics.as_ref())?;
    catalog.warn_unmatchable();

    let documents: Vec<String> = if args.documents.is_empty() {
        config::DEFAULT_DOCUMENTS.iter().map(|d| d.to_string()).collect()
    } else {
        args.documents.clone()
    };

    info!(
        documents = documents.len(),
        topics = catalog.len(),
        min_length = config.min_length,
        dir = %config.documents_dir.display(),
        "Analyzing documents"
    );

    let loader = DirectoryLoader::new(config.documents_dir.clone());
    let table = build_table(&documents, &loader, &catalog, config.min_length)?;
    Ok(table)
}

fn load_catalog(path: Option<&PathBuf>) -> Result<TopicCatalog> {
    match path {
        Some(path) => TopicCatalog::from_file(path)
            .with_context(|| format!("Failed to load topics from {}", path.display())),
        None => Ok(TopicCatalog::default()),
    }
}
