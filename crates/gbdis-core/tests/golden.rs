//! Golden listings for known byte layouts.
//!
//! Each `tests/golden/*.case` file holds a header describing the ROM and run
//! options, a `---` separator, and the exact expected listing:
//!
//! ```text
//! # comment
//! rom_size: 8000
//! bytes 4000: 06 08 c9
//! sym: 01:4100 DoThing
//! start: 4000
//! stop: 4010
//! hard_stop: true
//! parse_data: false
//! ---
//! Func_4000: ; 4000 (1:4000)
//! ...
//! ```
//!
//! Numbers in the header are hex.

use std::fs;
use std::path::{Path, PathBuf};

use gbdis_core::{DisasmOptions, Disassembler, SymbolTable};
use libtest_mimic::{Arguments, Failed, Trial};

struct GoldenCase {
    rom: Vec<u8>,
    symbols: String,
    start: u32,
    options: DisasmOptions,
    expected: String,
}

fn main() {
    let args = Arguments::from_args();

    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/golden");
    let cases = match collect_cases(&root) {
        Ok(cases) => cases,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let trials = cases
        .into_iter()
        .map(|path| {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Trial::test(name, move || run_case(&path).map_err(Failed::from))
        })
        .collect();

    libtest_mimic::run(&args, trials).exit();
}

fn collect_cases(root: &Path) -> Result<Vec<PathBuf>, String> {
    let entries =
        fs::read_dir(root).map_err(|e| format!("failed to read {}: {e}", root.display()))?;
    let mut cases: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "case"))
        .collect();
    cases.sort();
    Ok(cases)
}

fn parse_hex(text: &str) -> Result<u32, String> {
    u32::from_str_radix(text.trim(), 16).map_err(|e| format!("bad hex '{text}': {e}"))
}

fn parse_bool(text: &str) -> Result<bool, String> {
    text.trim()
        .parse()
        .map_err(|e| format!("bad flag '{text}': {e}"))
}

fn parse_case(text: &str) -> Result<GoldenCase, String> {
    let (header, expected) = text
        .split_once("\n---\n")
        .ok_or("missing '---' separator")?;

    let mut rom_size = 0x8000usize;
    let mut patches: Vec<(usize, Vec<u8>)> = Vec::new();
    let mut symbols = String::new();
    let mut start = None;
    let mut options = DisasmOptions::default();

    for line in header.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| format!("malformed header line '{line}'"))?;
        let value = value.trim();

        if let Some(at) = key.strip_prefix("bytes ") {
            let bytes = value
                .split_whitespace()
                .map(|b| u8::from_str_radix(b, 16).map_err(|e| format!("bad byte '{b}': {e}")))
                .collect::<Result<Vec<_>, _>>()?;
            patches.push((parse_hex(at)? as usize, bytes));
            continue;
        }

        match key {
            "rom_size" => rom_size = parse_hex(value)? as usize,
            "sym" => {
                symbols.push_str(value);
                symbols.push('\n');
            }
            "start" => start = Some(parse_hex(value)?),
            "stop" => options.stop = Some(parse_hex(value)?),
            "hard_stop" => options.hard_stop = parse_bool(value)?,
            "parse_data" => options.parse_data = parse_bool(value)?,
            other => return Err(format!("unknown header key '{other}'")),
        }
    }

    let mut rom = vec![0u8; rom_size];
    for (at, bytes) in patches {
        let end = at + bytes.len();
        if end > rom.len() {
            return Err(format!("bytes at {at:#x} overflow a {rom_size:#x} byte ROM"));
        }
        rom[at..end].copy_from_slice(&bytes);
    }

    Ok(GoldenCase {
        rom,
        symbols,
        start: start.ok_or("missing 'start'")?,
        options,
        expected: expected.trim_end_matches('\n').to_string(),
    })
}

fn run_case(path: &Path) -> Result<(), String> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let case = parse_case(&text)?;
    let symbols = SymbolTable::parse_sym(&case.symbols).map_err(|e| e.to_string())?;

    let out = Disassembler::new(&case.rom, &symbols)
        .disassemble(case.start, &case.options)
        .map_err(|e| e.to_string())?;

    if out.text != case.expected {
        return Err(format!(
            "listing mismatch\n--- expected\n{}\n--- actual\n{}",
            case.expected, out.text
        ));
    }
    Ok(())
}
