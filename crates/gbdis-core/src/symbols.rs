//! Read-only name lookup for ROM code and the RAM/IO regions.
//!
//! Symbols come from an RGBDS `.sym` file (`bank:address Name`) and from
//! `NAME EQU value` constants files for hardware registers, VRAM and HRAM.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use crate::address::{ROMX_START, global_address};
use crate::error::SymbolError;

/// Placeholder some symbol dumps emit for an uninitialized `0:0000` entry.
const NULL_SYMBOL: &str = "NULL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// `$0000-$7FFF`
    Rom,
    /// `$8000-$9FFF`
    Vram,
    /// `$A000-$BFFF`
    Sram,
    /// `$C000-$DFFF`
    Wram,
    /// `$FF00-$FF7F` and `$FFFF`
    HardwareIo,
    /// `$FF80-$FFFE`
    Hram,
}

impl Region {
    /// Echo RAM, OAM and the unusable area have no region.
    pub fn of(address: u16) -> Option<Self> {
        Some(match address {
            0x0000..=0x7FFF => Self::Rom,
            0x8000..=0x9FFF => Self::Vram,
            0xA000..=0xBFFF => Self::Sram,
            0xC000..=0xDFFF => Self::Wram,
            0xFF00..=0xFF7F | 0xFFFF => Self::HardwareIo,
            0xFF80..=0xFFFE => Self::Hram,
            _ => return None,
        })
    }
}

/// RAM names keyed by address; the requesting bank is ignored and the
/// lowest bank defining an address wins.
#[derive(Debug, Default, Clone)]
struct BankedNames {
    by_addr: HashMap<u16, BTreeMap<u32, String>>,
}

impl BankedNames {
    fn insert(&mut self, bank: u32, address: u16, name: &str) {
        self.by_addr
            .entry(address)
            .or_default()
            .entry(bank)
            .or_insert_with(|| name.to_string());
    }

    fn first(&self, address: u16) -> Option<&str> {
        self.by_addr
            .get(&address)
            .and_then(|banks| banks.values().next())
            .map(|s| s.as_str())
    }

    fn len(&self) -> usize {
        self.by_addr.values().map(BTreeMap::len).sum()
    }
}

#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    rom: HashMap<(u32, u16), String>,
    by_name: HashMap<String, u32>,
    vram: HashMap<u16, String>,
    sram: BankedNames,
    wram: BankedNames,
    hardware: HashMap<u16, String>,
    hram: HashMap<u16, String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the contents of an RGBDS `.sym` file.
    pub fn parse_sym(text: &str) -> Result<Self, SymbolError> {
        let mut out = Self::default();

        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.split(';').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let malformed = || SymbolError::Malformed {
                line: line_no + 1,
                text: raw.to_string(),
            };

            let mut fields = line.split_whitespace();
            let (Some(lhs), Some(name)) = (fields.next(), fields.next()) else {
                return Err(malformed());
            };
            let Some((bank_s, addr_s)) = lhs.split_once(':') else {
                return Err(malformed());
            };
            let bank = u32::from_str_radix(bank_s, 16).map_err(|_| malformed())?;
            let address = u16::from_str_radix(addr_s, 16).map_err(|_| malformed())?;

            let Some(region) = Region::of(address) else {
                return Err(SymbolError::UnsupportedAddress {
                    line: line_no + 1,
                    bank,
                    address,
                });
            };
            out.insert(region, bank, address, name, false);
        }

        Ok(out)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SymbolError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SymbolError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse_sym(&text)?;
        info!(
            "Loaded {} ROM symbols and {} RAM symbols from {}",
            table.rom.len(),
            table.ram_symbol_count(),
            path.display()
        );
        Ok(table)
    }

    /// Add `NAME EQU value` constants whose value falls inside `region`.
    ///
    /// Later definitions of the same value replace earlier ones. Returns the
    /// number of constants added.
    pub fn merge_constants(&mut self, text: &str, region: Region) -> usize {
        let mut added = 0;
        for (line_no, raw) in text.lines().enumerate() {
            let Some((name, value)) = split_constant(raw) else {
                continue;
            };
            let Some(value) = parse_rgbds_number(&value) else {
                warn!(
                    "line {}: cannot evaluate constant '{}', skipping",
                    line_no + 1,
                    raw.trim()
                );
                continue;
            };
            let Ok(address) = u16::try_from(value) else {
                continue;
            };
            if Region::of(address) != Some(region) {
                continue;
            }
            self.insert(region, 0, address, name, true);
            added += 1;
        }
        added
    }

    /// Merge a constants file; a missing file is skipped.
    pub fn load_constants_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        region: Region,
    ) -> Result<bool, SymbolError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No constants file at {}", path.display());
            return Ok(false);
        }
        let text = fs::read_to_string(path).map_err(|source| SymbolError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let added = self.merge_constants(&text, region);
        info!("Loaded {added} {region:?} constants from {}", path.display());
        Ok(true)
    }

    fn insert(&mut self, region: Region, bank: u32, address: u16, name: &str, replace: bool) {
        let put = |map: &mut HashMap<u16, String>| {
            if replace {
                map.insert(address, name.to_string());
            } else {
                map.entry(address).or_insert_with(|| name.to_string());
            }
        };

        match region {
            Region::Rom => {
                self.rom
                    .entry((bank, address))
                    .or_insert_with(|| name.to_string());
                self.by_name
                    .insert(name.to_string(), global_address(address, bank));
            }
            Region::Vram => put(&mut self.vram),
            Region::Sram => self.sram.insert(bank, address, name),
            Region::Wram => self.wram.insert(bank, address, name),
            Region::HardwareIo => put(&mut self.hardware),
            Region::Hram => put(&mut self.hram),
        }
    }

    /// Name bound to `address` as seen with `bank` mapped, if any.
    pub fn find_label(&self, address: u16, bank: u32) -> Option<&str> {
        let name = match Region::of(address)? {
            Region::Rom => {
                let bank = if address < ROMX_START { 0 } else { bank };
                self.rom.get(&(bank, address)).map(|s| s.as_str())
            }
            Region::Vram => self.vram.get(&address).map(|s| s.as_str()),
            Region::Sram => self.sram.first(address),
            Region::Wram => self.wram.first(address),
            Region::HardwareIo => self.hardware.get(&address).map(|s| s.as_str()),
            Region::Hram => self.hram.get(&address).map(|s| s.as_str()),
        };
        name.filter(|n| !(address == 0 && *n == NULL_SYMBOL))
    }

    /// Flat ROM offset of a ROM symbol.
    pub fn address_of(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    pub fn rom_symbol_count(&self) -> usize {
        self.rom.len()
    }

    pub fn ram_symbol_count(&self) -> usize {
        self.vram.len() + self.sram.len() + self.wram.len() + self.hardware.len() + self.hram.len()
    }
}

/// Split `NAME EQU value ; comment` (optionally prefixed with `DEF`).
fn split_constant(line: &str) -> Option<(&str, String)> {
    let code = line.split(';').next().unwrap_or("");
    let mut tokens = code.split_whitespace();
    let mut name = tokens.next()?;
    if name.eq_ignore_ascii_case("def") {
        name = tokens.next()?;
    }
    if !tokens.next()?.eq_ignore_ascii_case("equ") {
        return None;
    }
    let value = tokens.collect::<Vec<_>>().join(" ");
    if value.is_empty() {
        return None;
    }
    Some((name, value))
}

/// RGBDS numeric literal: `$ff40`, `%1010`, `0xff40`, `&17` or decimal.
fn parse_rgbds_number(text: &str) -> Option<u32> {
    let text = text.trim().replace('_', "");
    if let Some(hex) = text.strip_prefix('$') {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = text.strip_prefix('%') {
        u32::from_str_radix(bin, 2).ok()
    } else if let Some(oct) = text.strip_prefix('&') {
        u32::from_str_radix(oct, 8).ok()
    } else {
        text.parse().ok()
    }
}
