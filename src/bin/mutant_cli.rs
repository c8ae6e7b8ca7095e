use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use mutant_rs::{inspect_files, MutantDetector};

/// Classify DNA grids from sample files as mutant or human and print the stats.
#[derive(Parser)]
#[command(name = "mutant-rs", version)]
struct Args {
    /// Sample files (one grid per line, rows separated by commas; `.gz` accepted)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Worker threads for classification (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,
    /// Print the final stats as JSON
    #[arg(long)]
    json: bool,
    /// Only print lines for mutant samples
    #[arg(long)]
    only_mutants: bool,
}

fn spinner(color: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let template = format!("{{spinner:.{color}}} {{msg}}");
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template(&template)
    {
        spinner.set_style(style);
    }
    spinner
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let progress = spinner("green");
    progress.set_message(format!("Classifying samples from {} file(s)...", args.inputs.len()));

    let detector = MutantDetector::new();
    let results = match inspect_files(&detector, args.inputs) {
        Ok(results) => results,
        Err(e) => {
            progress.abandon_with_message("Classification failed.");
            return Err(e.into());
        }
    };

    let rejected = results.rejected().len();
    progress.finish_with_message(format!(
        "Classified {} sample(s), {} rejected.",
        results.outcomes.len() - rejected,
        rejected
    ));

    print!("{}", results.get_output(args.only_mutants));
    if args.json {
        println!("{}", serde_json::to_string(&results.stats)?);
    } else {
        println!("{}", results.get_summary());
    }
    Ok(())
}
