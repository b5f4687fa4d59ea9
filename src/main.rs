//! sheetcalc - a minimal spreadsheet on the command line

mod config;
mod render;

use anyhow::{Context, Result, bail};
use sheetcalc_core::{CellKind, Sheet};
use sheetcalc_engine::engine::CellRef;
use std::env;
use std::path::PathBuf;

fn print_usage() {
    eprintln!("Usage: sheetcalc [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Sheet file to open (created by --save if missing)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --size <W>x<H>            Dimensions of a new sheet (default from config)");
    eprintln!("  -s, --set <CELL>=<TEXT>   Set a cell, e.g. A0=5 or B1==A0*2 (can be repeated)");
    eprintln!("  -c, --cell <CELL>         Print one cell's value (exit 1 on an error value)");
    eprintln!("  -d, --depth               Print dependency depths instead of values");
    eprintln!("  -w, --save                Save back to FILE after applying --set");
    eprintln!("  -o, --output <FILE>       Save raw cells to another file");
    eprintln!("  --config <FILE>           Read settings from this config file");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, Default)]
struct Options {
    file_path: Option<PathBuf>,
    size: Option<(usize, usize)>,
    sets: Vec<(CellRef, String)>,
    cell: Option<CellRef>,
    depth: bool,
    save: bool,
    output_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
}

enum Parsed {
    Run(Options),
    Help,
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str, what: &str) -> Result<&'a str> {
    *i += 1;
    match args.get(*i) {
        Some(value) => Ok(value.as_str()),
        None => bail!("{} requires {}", flag, what),
    }
}

fn parse_cell(name: &str) -> Result<CellRef> {
    CellRef::from_str(name.trim()).with_context(|| format!("Invalid cell reference: {}", name))
}

fn parse_size(value: &str) -> Result<(usize, usize)> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .with_context(|| format!("Invalid size '{}', expected <W>x<H>", value))?;
    let width = w.trim().parse().with_context(|| format!("Invalid width '{}'", w))?;
    let height = h.trim().parse().with_context(|| format!("Invalid height '{}'", h))?;
    Ok((width, height))
}

fn parse_args(args: &[String]) -> Result<Parsed> {
    let mut opts = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(Parsed::Help),
            "--size" => {
                let value = next_value(args, &mut i, "--size", "a value")?;
                opts.size = Some(parse_size(value)?);
            }
            "-s" | "--set" => {
                let value = next_value(args, &mut i, "--set", "<CELL>=<TEXT>")?;
                let (name, text) = value
                    .split_once('=')
                    .with_context(|| format!("Invalid --set '{}', expected <CELL>=<TEXT>", value))?;
                opts.sets.push((parse_cell(name)?, text.to_string()));
            }
            "-c" | "--cell" => {
                let value = next_value(args, &mut i, "--cell", "a cell reference")?;
                opts.cell = Some(parse_cell(value)?);
            }
            "-d" | "--depth" => opts.depth = true,
            "-w" | "--save" => opts.save = true,
            "-o" | "--output" => {
                let value = next_value(args, &mut i, "--output", "a file path")?;
                opts.output_file = Some(PathBuf::from(value));
            }
            "--config" => {
                let value = next_value(args, &mut i, "--config", "a file path")?;
                opts.config_file = Some(PathBuf::from(value));
            }
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

    Ok(Parsed::Run(opts))
}

/// Run with parsed options. Returns the process exit code.
fn run(opts: Options) -> Result<i32> {
    let (config, warnings) = config::load_config(opts.config_file.as_ref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let size = opts.size.unwrap_or((config.width, config.height));
    let mut sheet = Sheet::with_file(opts.file_path.clone(), size).with_context(|| {
        match &opts.file_path {
            Some(path) => format!("Failed to open {}", path.display()),
            None => "Failed to create sheet".to_string(),
        }
    })?;

    for (cell_ref, text) in &opts.sets {
        sheet
            .set_ref(cell_ref, text)
            .with_context(|| format!("Failed to set {}", cell_ref))?;
    }

    if opts.save {
        let path = sheet.save_file().context("Failed to save (no FILE given?)")?;
        log::debug!("saved {}", path.display());
    }
    if let Some(output_path) = &opts.output_file {
        sheet
            .save_file_as(output_path)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        eprintln!("Saved to {}", output_path.display());
    }

    if let Some(cell_ref) = &opts.cell {
        if !sheet.is_in(cell_ref.col, cell_ref.row) {
            bail!("Cell {} is outside the {}x{} sheet", cell_ref, sheet.width(), sheet.height());
        }
        println!("{}", sheet.value_ref(cell_ref));
        let failed = matches!(
            sheet.kind(cell_ref.col, cell_ref.row),
            Some(CellKind::ErrorFormula | CellKind::ErrorCycle)
        );
        return Ok(if failed { 1 } else { 0 });
    }

    if opts.depth {
        let depths = sheet.depth_map();
        println!("{}", render::render_depths(&depths, sheet.width(), sheet.height()));
    } else {
        println!("{}", render::render_values(&sheet));
    }
    Ok(0)
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let opts = match parse_args(&args) {
        Ok(Parsed::Run(opts)) => opts,
        Ok(Parsed::Help) => {
            print_usage();
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    match run(opts) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("sheetcalc")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_set_keeps_formula_equals() {
        let Parsed::Run(opts) = parse_args(&args(&["-s", "B1==A0*2"])).unwrap() else {
            panic!("expected options");
        };
        assert_eq!(opts.sets, vec![(CellRef::new(1, 1), "=A0*2".to_string())]);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("4x6").unwrap(), (4, 6));
        assert_eq!(parse_size("10X3").unwrap(), (10, 3));
        assert!(parse_size("4by6").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_and_missing_values() {
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["--cell"])).is_err());
        assert!(parse_args(&args(&["-c", "AB1"])).is_err());
        assert!(parse_args(&args(&["a.csv", "b.csv"])).is_err());
    }

    #[test]
    fn test_parse_help() {
        assert!(matches!(parse_args(&args(&["-h"])).unwrap(), Parsed::Help));
    }
}
