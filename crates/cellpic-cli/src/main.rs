//! cellpic CLI - writes image file names into spreadsheet rows

mod paths;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use cellpic_xlsx::{ConvertOptions, Converter};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use rayon::prelude::*;

use crate::paths::OutputPlanner;

#[derive(Parser)]
#[command(name = "cellpic")]
#[command(
    author,
    version,
    about = "Write the file name of each row's image into a spreadsheet column"
)]
#[command(
    after_help = "Example:\n  cellpic --file-path \"screenshots.xlsx\" --prefix \"https://example.sharepoint.com/sites/Screenshots/{{FILE_NAME}}/\""
)]
struct Cli {
    /// Input spreadsheet file (repeat for several)
    #[arg(short = 'f', long = "file-path", value_name = "FILE", required = true)]
    file_paths: Vec<PathBuf>,

    /// Prefix written before each file name; `{{FILE_NAME}}` is the input's base name
    #[arg(short, long, default_value = "")]
    prefix: String,

    /// Column that receives the file names
    #[arg(short, long, default_value = "O")]
    column: String,

    /// Output path; supports {{DATE}}, {{DATE_TIME}} and {{FILE_NAME}}
    /// (default: input path with "_with_image_file_names_<timestamp>" appended)
    #[arg(short, long)]
    out_path: Option<String>,

    /// Maximum number of files converted at once
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// A converted file, ready to report
struct Converted {
    path: PathBuf,
    warnings: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Reject a bad column before touching any file
    Converter::new(&ConvertOptions::new().with_output_column(cli.column.as_str()))
        .context("Invalid --column")?;

    let planner = OutputPlanner::now();

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = cli.jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder.build().context("Failed to start worker pool")?;

    let results: Vec<Result<Converted>> = pool.install(|| {
        cli.file_paths
            .par_iter()
            .map(|input| convert_one(&cli, &planner, input))
            .collect()
    });

    let mut failed = 0;
    for result in results {
        match result {
            Ok(converted) => {
                println!("Wrote to {}", converted.path.display());
                for warning in &converted.warnings {
                    eprintln!("Warning: {}", warning);
                }
            }
            Err(e) => {
                eprintln!("Error: {:#}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} files failed", failed, cli.file_paths.len());
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn convert_one(cli: &Cli, planner: &OutputPlanner, input: &Path) -> Result<Converted> {
    let options = ConvertOptions::new()
        .with_output_column(cli.column.as_str())
        .with_path_prefix(cli.prefix.as_str())
        .with_source_path(input);

    let conversion = Converter::new(&options)?
        .convert_file(input)
        .with_context(|| format!("Failed to convert '{}'", input.display()))?;

    let output = planner.plan(input, cli.out_path.as_deref());
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create '{}'", parent.display()))?;
    }
    fs::write(&output, &conversion.bytes)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;

    Ok(Converted {
        path: output,
        warnings: conversion.warnings,
    })
}
