use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "glyphreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print how many times each character occurs across the worksheet.
    Counts(CountsArgs),
    /// Write the per-character cropped PDFs only.
    Extract(SourceArgs),
    /// Full run: cropped PDFs, annotated PNG frames and MP4s
    /// (requires `pdftoppm` and `ffmpeg` on PATH).
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct CountsArgs {
    /// Print the totals as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct SourceArgs {
    /// Input worksheet PDF.
    #[arg(long = "in", default_value = glyphreel::DEFAULT_INPUT)]
    in_path: PathBuf,

    /// Directory receiving every generated file.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct RunArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Process the four characters concurrently.
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Counts(args) => cmd_counts(args),
        Command::Extract(args) => cmd_pipeline(args, false, glyphreel::Stage::Extract),
        Command::Run(args) => cmd_pipeline(args.source, args.parallel, glyphreel::Stage::Video),
    }
}

fn cmd_counts(args: CountsArgs) -> anyhow::Result<()> {
    let totals = glyphreel::OccurrenceTable::worksheet().totals();
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&totals).context("serialize totals")?
        );
    } else {
        print_totals(&totals);
    }
    Ok(())
}

fn cmd_pipeline(args: SourceArgs, parallel: bool, stage: glyphreel::Stage) -> anyhow::Result<()> {
    let cfg = glyphreel::PipelineConfig {
        input: args.in_path,
        out_dir: args.out_dir,
        parallel,
        ..glyphreel::PipelineConfig::default()
    };
    cfg.validate()?;

    let table = glyphreel::OccurrenceTable::worksheet();
    print_totals(&table.totals());

    let source = glyphreel::SourceDocument::load(&cfg.input)?;
    println!("document has {} pages.", source.page_count());
    let grid = source.grid(cfg.vertical_cells, cfg.padding_fraction)?;
    println!("{} {}", grid.vertical_cells, grid.horizontal_cells());

    let summary = glyphreel::run_loaded(&cfg, &table, &source, &grid, stage)?;
    for t in &summary.targets {
        if t.skipped {
            eprintln!("skipped {} (no occurrences)", t.target);
            continue;
        }
        if let Some(pdf) = &t.pdf_path {
            eprintln!("wrote {}", pdf.display());
        }
        if let Some(video) = &t.video_path {
            eprintln!("wrote {} ({} frames)", video.display(), t.images_rendered);
        }
    }
    Ok(())
}

fn print_totals(totals: &glyphreel::OccurrenceTotals) {
    for target in glyphreel::Target::ALL {
        println!("{}: {}", target, totals.get(target));
    }
}
