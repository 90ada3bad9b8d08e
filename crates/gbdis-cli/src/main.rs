mod config;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, debug, info};

use gbdis_core::{DisasmOptions, Disassembler, Region, Rom, SymbolTable, parse_location};

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "gbdis", version, about = "Disassemble SM83 routines from a Game Boy ROM")]
struct Args {
    /// Start location: hex offset, bank:address or symbol name
    offset: String,

    /// Optional end location, same syntax as the start
    end: Option<String>,

    /// Path to ROM file
    #[arg(short, long)]
    rom: Option<PathBuf>,

    /// Path to the output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to the symbol file (defaults to the ROM path with a .sym extension)
    #[arg(short, long)]
    symfile: Option<PathBuf>,

    /// Base directory for the ROM, symbol, constants and output files
    #[arg(long)]
    path: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not print the listing
    #[arg(short, long)]
    quiet: bool,

    /// Do not write the output file
    #[arg(long)]
    no_write: bool,

    /// Stop exactly at the end location instead of following control flow
    #[arg(short, long)]
    dry_run: bool,

    /// Emit bytes referenced as data after jumps as db directives
    #[arg(short, long)]
    parse_data: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn load_symbols(
    base: &Path,
    rom_path: &Path,
    args: &Args,
    cfg: &Config,
) -> Result<SymbolTable, Box<dyn Error>> {
    let mut symbols = match &args.symfile {
        Some(path) => SymbolTable::load(base.join(path))?,
        None => {
            let path = rom_path.with_extension("sym");
            if path.exists() {
                SymbolTable::load(&path)?
            } else {
                debug!("No symbol file at {}", path.display());
                SymbolTable::new()
            }
        }
    };

    for path in &cfg.constants.hardware {
        if symbols.load_constants_file(base.join(path), Region::HardwareIo)? {
            break;
        }
    }
    symbols.load_constants_file(base.join(&cfg.constants.vram), Region::Vram)?;
    symbols.load_constants_file(base.join(&cfg.constants.hram), Region::Hram)?;

    Ok(symbols)
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let cfg = config::load_from_file(
        &args
            .config
            .clone()
            .unwrap_or_else(config::default_config_path),
    );
    let base = args
        .path
        .clone()
        .or_else(|| cfg.path.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let rom_path = base.join(args.rom.as_ref().unwrap_or(&cfg.rom));
    let rom = Rom::from_file(&rom_path)?;
    let symbols = load_symbols(&base, &rom_path, args, &cfg)?;

    let start = parse_location(&args.offset, &symbols)?;
    let stop = args
        .end
        .as_deref()
        .map(|end| parse_location(end, &symbols))
        .transpose()?;

    let options = DisasmOptions {
        stop,
        hard_stop: args.dry_run,
        parse_data: args.parse_data,
        include_last_address: true,
        indent: cfg.indent.clone(),
    };
    let listing = Disassembler::new(rom.bytes(), &symbols).disassemble(start, &options)?;

    if !args.quiet {
        println!("{}", listing.text);
    }

    if !args.no_write {
        let output = base.join(args.output.as_ref().unwrap_or(&cfg.output));
        fs::write(&output, &listing.text)
            .map_err(|e| format!("failed to write {}: {e}", output.display()))?;
        info!(
            "Wrote {:#x}..{:#x} to {}",
            listing.start_offset,
            listing.end_offset,
            output.display()
        );
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("gbdis: {e}");
            ExitCode::FAILURE
        }
    }
}
