//! chargesplit command-line tool
//!
//! Processes repair charge exports one file at a time and prints a batch summary.

use chargesplit::{
    clear_output_root, write_zip, BatchSummary, ChargeSplitError, OutputFormat, SplitterBuilder,
    SplitterConfig,
};
use clap::{Parser, ValueEnum};
use console::style;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "chargesplit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Split container repair charge exports into one spreadsheet per container")]
#[command(after_help = "EXAMPLES:\n  \
    chargesplit estimate.xlsx\n  \
    chargesplit exports/*.xlsx --output out --zip\n  \
    chargesplit estimate.xlsx --format csv --keep-total-rows\n  \
    chargesplit estimate.xlsx --config layout.toml")]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Source spreadsheets to process
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output root directory (overrides the config file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file format (overrides the config file)
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Keep rows whose description is "Total"
    #[arg(long)]
    keep_total_rows: bool,

    /// Treat rows with an amount but no description as line items
    #[arg(long)]
    allow_blank_descriptions: bool,

    /// Remove everything under the output root before processing
    #[arg(long)]
    clear: bool,

    /// Write a <reference>.zip next to each output folder
    #[arg(long)]
    zip: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Xlsx,
    Csv,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Xlsx => OutputFormat::Xlsx,
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Timestamped, colored console logger
struct ConsoleLogger {
    level: LevelFilter,
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] {}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
            record.args()
        );
        match record.level() {
            Level::Error => eprintln!("{}", style(line).red()),
            Level::Warn => eprintln!("{}", style(line).yellow()),
            Level::Info => eprintln!("{}", style(line).green()),
            Level::Debug | Level::Trace => eprintln!("{}", style(line).dim()),
        }
    }

    fn flush(&self) {}
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if log::set_boxed_logger(Box::new(ConsoleLogger { level })).is_ok() {
        log::set_max_level(level);
    }
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(&cli) {
        Ok(summary) => {
            print_summary(&summary);
            if !summary.failures.is_empty() {
                process::exit(2);
            }
        }
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<BatchSummary, ChargeSplitError> {
    let config = match &cli.config {
        Some(path) => SplitterConfig::load_from_file(path)?,
        None => SplitterConfig::default(),
    };

    let mut builder = SplitterBuilder::from_config(config);
    if let Some(output) = &cli.output {
        builder = builder.with_output_root(output.clone());
    }
    if let Some(format) = cli.format {
        builder = builder.with_output_format(format.into());
    }
    if cli.keep_total_rows {
        builder = builder.exclude_total_rows(false);
    }
    if cli.allow_blank_descriptions {
        builder = builder.require_description(false);
    }
    let splitter = builder.build()?;

    if cli.clear {
        clear_output_root(&splitter.config().output_root)?;
    }

    let summary = splitter.process_batch(&cli.inputs);

    if cli.zip {
        for dir in &summary.output_dirs {
            // reference names may contain dots
            let mut dest = dir.clone().into_os_string();
            dest.push(".zip");
            if let Err(e) = write_zip(dir, PathBuf::from(dest)) {
                log::error!("Failed to archive {}: {}", dir.display(), e);
            }
        }
    }

    Ok(summary)
}

fn print_summary(summary: &BatchSummary) {
    println!();
    println!("{}", style("Summary").bold());
    println!("  Files processed:      {}", summary.files_processed);
    println!("  Files failed:         {}", summary.failures.len());
    println!("  Output files created: {}", summary.written.len());
    println!("  Groups skipped:       {}", summary.skipped);
    println!("  Elapsed:              {:.2?}", summary.elapsed);

    for (path, message) in &summary.failures {
        println!("  {} {}: {}", style("✗").red(), path.display(), message);
    }
}
