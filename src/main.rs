//! PhotoResize CLI - resize every image in a directory to 800px

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use console::style;

use photoresize::ui::{
    absolute_path, dialog_available, App, ConsolePrompt, DialogPrompt, DirectorySelector, ProgressView,
};
use photoresize::{init_with_config, BatchReport, Config, TARGET_SIZE};

/// PhotoResize - batch image resizer
#[derive(Parser)]
#[command(
    name = "photoresize",
    version,
    about = "Resize every image in a directory to at most 800px",
    long_about = "Resizes every image directly inside a directory so that its longest side is at \
                  most 800 pixels, writing the results into a 'Resized' subdirectory with the \
                  original file names. Files that cannot be processed are skipped."
)]
struct Cli {
    /// Directory with the images (a folder picker opens when omitted)
    #[arg(value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Ask for the directory on the terminal instead of opening a dialog
    #[arg(long)]
    no_dialog: bool,

    /// Configuration file path (.toml or .yaml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging and list skipped files
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short = 'Q', long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        eprintln!("{}: {:#}", style("Error").red().bold(), e);
        process::exit(1);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    init_with_config(&config).context("Failed to initialize logging")?;

    let view = if cli.json || cli.quiet {
        ProgressView::hidden()
    } else {
        ProgressView::new()
    };
    let mut app = App::new(view);

    match &cli.directory {
        Some(directory) => app.set_directory(absolute_path(directory)?),
        None => {
            // both prompts block until the user answers
            let chosen = tokio::task::block_in_place(|| {
                if cli.no_dialog || !dialog_available() {
                    app.choose_directory(&mut DirectorySelector::new(ConsolePrompt::new()))
                } else {
                    app.choose_directory(&mut DirectorySelector::new(DialogPrompt))
                }
            })?;
            if !chosen {
                if !cli.quiet {
                    eprintln!("{}: No directory selected", style("Info").blue().bold());
                }
                return Ok(());
            }
        }
    }

    if !cli.json && !cli.quiet {
        println!("{}: {}", style("Directory").bold(), app.directory_text());
    }

    app.start_resize().map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let report = app
        .wait_for_completion()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !cli.quiet {
        print_summary(&report, cli.verbose);
    }

    Ok(())
}

/// Configuration file (if any) with the verbosity flags applied on top
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    let config = if cli.quiet {
        config.with_log_level("error")
    } else if cli.verbose {
        config.with_log_level("debug")
    } else {
        config
    };

    Ok(config)
}

/// Print processing summary
fn print_summary(report: &BatchReport, list_skipped: bool) {
    println!();
    println!("{}", style("Processing Summary:").bold());
    let scaled = report.processed().filter(|p| p.was_resized()).count();
    println!(
        "  {}: {} ({} scaled down)",
        style("Resized").green(),
        report.processed_count(),
        scaled
    );
    println!("  {}: {}", style("Skipped").yellow(), report.skipped_count());
    println!("  {}: {}px", style("Max size").cyan(), TARGET_SIZE);
    println!("  {}: {}", style("Output").cyan(), report.output_dir.display());
    println!("  {}: {} bytes", style("Written").cyan(), report.total_output_size());
    println!("  {}: {:.2}s", style("Duration").blue(), report.processing_time.as_secs_f64());

    if list_skipped && report.skipped_count() > 0 {
        println!();
        println!("{}", style("Skipped files:").bold());
        for skipped in report.skipped() {
            println!("  {} ({})", skipped.path.display(), skipped.reason.message());
        }
    }
}
