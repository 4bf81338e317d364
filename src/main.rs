/*!
 * Command-line interface for cbp
 */

use std::fs;
use std::io;
use std::process;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use indicatif::{ProgressBar, ProgressStyle};

use cbp::config::{Args, Config};
use cbp::report::{ReportFormat, Reporter, ScanReport};
use cbp::scanner::Scanner;
use cbp::writer::XmlWriter;
use cbp::Result;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Shell completion generation short-circuits the normal run
    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        generate(shell, &mut cmd, "cbp", &mut io::stdout());
        return;
    }

    if let Err(err) = run(args) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    // Create configuration
    let config = Config::from_args(args);

    // Validate configuration
    config.validate()?;

    // Resolve the effective filter from defaults, config file and flags
    let filter = config.resolve_filter()?;

    // Create progress bar with advanced Unicode styling
    let progress = ProgressBar::new(0);
    progress.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%) ⏱️  Elapsed: {elapsed_precise}  Remaining: {eta_precise}  Speed: {per_sec}/s")
        .unwrap());
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📊 Setup");
    progress.set_message(format!(
        "📂 Scanning project: {}",
        config.target_dir.display()
    ));

    // Start timing both walk and write operations
    let start_time = Instant::now();

    // Walk the project tree in deterministic order
    let scanner = Scanner::new(config.clone(), filter);
    let mut walk = scanner.walk()?;
    let entries: Vec<_> = walk.by_ref().collect();
    let dirs_skipped = walk.dirs_skipped();

    progress.set_length(entries.len() as u64);
    progress.set_prefix("📊 Processing");
    progress.set_message(format!("🔎 Found {} files to process", entries.len()));

    // Build and write the XML document
    let writer = XmlWriter::new(config.clone(), progress.clone());
    let stats = writer.write(&entries)?;

    // Calculate total duration (walk + write)
    let total_duration = start_time.elapsed();

    // Clear the progress bar
    progress.finish_and_clear();

    let output_size = fs::metadata(&config.output_file)
        .map(|meta| meta.len())
        .unwrap_or(0);

    // Prepare the report
    let scan_report = ScanReport {
        output_file: config.output_file.display().to_string(),
        output_size,
        duration: total_duration,
        files_processed: stats.files_written,
        files_skipped: stats.files_skipped,
        dirs_skipped,
        total_lines: stats.total_lines,
        total_chars: stats.total_chars,
        file_details: stats.file_details,
    };

    // Create a reporter and print the report
    let reporter = Reporter::new(ReportFormat::ConsoleTable);
    reporter.print_report(&scan_report);

    Ok(())
}
