//! Cellgrid - recompute a grid spreadsheet snapshot from the command line

mod logger;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use cellgrid_core::storage::{write_csv, write_markdown};
use cellgrid_core::{Document, SheetConfig};

fn print_usage() {
    eprintln!("Usage: cellgrid [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Sheet snapshot to open (.json)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --set <ADDR=VALUE>    Commit an edit before recomputing (can be repeated)");
    eprintln!("  -c, --command <FORMULA>   Evaluate a formula against the sheet and print it");
    eprintln!("  -o, --output <FILE>       Export to markdown file");
    eprintln!("      --csv <FILE>          Export to CSV file");
    eprintln!("  -w, --write               Save edits back to FILE");
    eprintln!("      --config <FILE>       Load configuration from FILE");
    eprintln!("  -v, --verbose             Log to stderr (repeat for more detail)");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, Default)]
struct Options {
    file_path: Option<PathBuf>,
    edits: Vec<String>,
    command: Option<String>,
    output_file: Option<PathBuf>,
    csv_file: Option<PathBuf>,
    write: bool,
    config_file: Option<PathBuf>,
    verbosity: u8,
}

fn take_value(args: &[String], i: &mut usize, flag: &str) -> Result<String> {
    *i += 1;
    match args.get(*i) {
        Some(v) => Ok(v.clone()),
        None => bail!("{} requires a value", flag),
    }
}

/// Returns `Ok(None)` when help was requested.
fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut opts = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(None),
            "-s" | "--set" => {
                let edit = take_value(args, &mut i, "--set")?;
                opts.edits.push(edit);
            }
            "-c" | "--command" => {
                let formula = take_value(args, &mut i, "--command")?;
                opts.command = Some(formula);
            }
            "-o" | "--output" => {
                let path = take_value(args, &mut i, "--output")?;
                opts.output_file = Some(PathBuf::from(path));
            }
            "--csv" => {
                let path = take_value(args, &mut i, "--csv")?;
                opts.csv_file = Some(PathBuf::from(path));
            }
            "--config" => {
                let path = take_value(args, &mut i, "--config")?;
                opts.config_file = Some(PathBuf::from(path));
            }
            "-w" | "--write" => opts.write = true,
            "-v" | "--verbose" => opts.verbosity = opts.verbosity.saturating_add(1),
            arg if arg.starts_with('-') => bail!("Unknown option: {}", arg),
            arg => {
                if opts.file_path.is_some() {
                    bail!("Unexpected argument: {}", arg);
                }
                opts.file_path = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    if opts.write && opts.file_path.is_none() {
        bail!("--write requires a FILE");
    }
    Ok(Some(opts))
}

fn run(opts: Options) -> Result<ExitCode> {
    let config = SheetConfig::load_or_default(opts.config_file.as_deref())
        .context("Failed to load configuration")?;

    let mut doc = Document::with_file(opts.file_path.clone(), config)?;
    for edit in &opts.edits {
        doc.apply_edit(edit)?;
    }

    if opts.write {
        let path = doc.save_file()?;
        log::info!("saved {}", path.display());
    }

    if let Some(formula) = &opts.command {
        let formula = if formula.starts_with('=') {
            formula.clone()
        } else {
            format!("={}", formula)
        };
        let value = doc.evaluate_formula(&formula);
        println!("{}", value);
        return Ok(if value.sentinel().is_some() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    let mut exported = false;
    if let Some(path) = &opts.output_file {
        write_markdown(path, &doc)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Exported to {}", path.display());
        exported = true;
    }
    if let Some(path) = &opts.csv_file {
        write_csv(path, &doc).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Exported to {}", path.display());
        exported = true;
    }

    if !exported {
        for (cell_ref, value) in doc.display().populated() {
            println!("{}\t{}", cell_ref, value);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let opts = match parse_args(&args) {
        Ok(Some(opts)) => opts,
        Ok(None) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    logger::init(opts.verbosity);

    match run(opts) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
