use clap::{Parser, Subcommand};
use siteatlas::export::{export, ExportFormat, PassthroughRenderer};
use siteatlas::{Config, Result, SiteGraph, SiteInsights};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "siteatlas")]
#[command(about = "Export site architecture graphs as diagrams and reports")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export a crawl snapshot as a diagram or report
    Export {
        /// Path to the crawler's graph snapshot (JSON)
        snapshot: PathBuf,

        /// Output format: svg, mermaid, figma, report
        #[arg(short, long)]
        format: Option<String>,

        /// Output file (defaults to the suggested filename)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file with export defaults
        #[arg(long, default_value = "siteatlas.toml")]
        config: PathBuf,

        /// Include pages outside the 2xx range
        #[arg(long)]
        include_errors: bool,

        /// Include links that point off-site
        #[arg(long)]
        include_external: bool,

        /// Mermaid mode: flowchart, mindmap, graph
        #[arg(long)]
        diagram_type: Option<String>,

        /// Layout direction: TB, LR, BT, RL
        #[arg(long)]
        direction: Option<String>,

        /// Maximum label length before truncation
        #[arg(long)]
        max_label_length: Option<usize>,

        /// Report paper size: a4, letter
        #[arg(long)]
        page_size: Option<String>,

        /// Report orientation: portrait, landscape
        #[arg(long)]
        orientation: Option<String>,

        /// Color scheme: default, dark
        #[arg(long)]
        color_scheme: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print statistics and recommendations for a snapshot
    Stats {
        /// Path to the crawler's graph snapshot (JSON)
        snapshot: PathBuf,

        /// Include pages outside the 2xx range
        #[arg(long)]
        include_errors: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let result = match args.command {
        Command::Export {
            snapshot,
            format,
            output,
            config,
            include_errors,
            include_external,
            diagram_type,
            direction,
            max_label_length,
            page_size,
            orientation,
            color_scheme,
            verbose,
        } => run_export(
            &snapshot,
            format,
            output,
            &config,
            include_errors,
            include_external,
            diagram_type,
            direction,
            max_label_length,
            page_size,
            orientation,
            color_scheme,
            verbose,
        ),
        Command::Stats {
            snapshot,
            include_errors,
        } => run_stats(&snapshot, include_errors),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_export(
    snapshot: &Path,
    format: Option<String>,
    output: Option<PathBuf>,
    config_path: &Path,
    include_errors: bool,
    include_external: bool,
    diagram_type: Option<String>,
    direction: Option<String>,
    max_label_length: Option<usize>,
    page_size: Option<String>,
    orientation: Option<String>,
    color_scheme: Option<String>,
    verbose: bool,
) -> Result<()> {
    let mut config = Config::load_or_default(config_path);
    config.merge_cli(
        format,
        include_errors,
        include_external,
        diagram_type,
        direction,
        max_label_length,
        page_size,
        orientation,
        color_scheme,
    );
    config.validate()?;

    let json = std::fs::read_to_string(snapshot)?;
    let graph = SiteGraph::from_json(&json)?;

    if verbose {
        println!("Snapshot: {}", snapshot.display());
        println!("Project: {}", graph.metadata.project_name);
        println!("Pages: {}, links: {}", graph.pages.len(), graph.links.len());
        println!("Format: {}", config.export.format);
    }

    let format = ExportFormat::parse(&config.export.format)?;
    let options = config.to_options();
    let renderer = PassthroughRenderer;
    let artifact = export(&graph, format, &options, &renderer)?;

    let path = output.unwrap_or_else(|| PathBuf::from(&artifact.filename));
    std::fs::write(&path, &artifact.bytes)?;
    println!(
        "Wrote {} ({}, {} bytes)",
        path.display(),
        artifact.mime_type,
        artifact.bytes.len()
    );

    Ok(())
}

fn run_stats(snapshot: &Path, include_errors: bool) -> Result<()> {
    let json = std::fs::read_to_string(snapshot)?;
    let graph = SiteGraph::from_json(&json)?;

    let filter = siteatlas::graph::FilterOptions {
        include_errors,
        ..Default::default()
    };
    let insights = SiteInsights::compute(&graph, &filter);
    let stats = &insights.statistics;

    println!("{}", graph.metadata.project_name);
    println!(
        "  {} pages ({} ok, {} redirect, {} error)",
        stats.total_pages, stats.ok_pages, stats.redirect_pages, stats.error_pages
    );
    println!("  {} links, max depth {}", stats.total_links, stats.max_depth);
    println!(
        "  {} orphan, {} deep, avg inbound {:.1}",
        stats.orphan_pages, stats.deep_pages, stats.avg_inbound_links
    );
    println!("  health score: {}/100", stats.health_score);

    if insights.recommendations.is_empty() {
        println!("\nNo recommendations.");
    } else {
        println!("\nRecommendations:");
        for finding in &insights.recommendations {
            println!(
                "  [{}] {}: {}",
                finding.priority.name(),
                finding.category,
                finding.title
            );
        }
    }

    Ok(())
}
