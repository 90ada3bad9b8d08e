use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisasmError {
    #[error("offset {offset:#x} is outside the ROM (limit {limit:#x})")]
    AddressOutOfRange { offset: u32, limit: u32 },

    #[error("reached end of buffer without a defined stop at offset {offset:#x} (bank {bank:#x})")]
    Unterminated { offset: u32, bank: u32 },
}

#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: malformed symbol entry '{text}'")]
    Malformed { line: usize, text: String },

    #[error("line {line}: unsupported symbol address {bank:02x}:{address:04x}")]
    UnsupportedAddress { line: usize, bank: u32, address: u16 },
}

#[derive(Debug, Error)]
pub enum RomError {
    #[error("failed to read ROM {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ROM image is {len:#x} bytes; at most {limit:#x} are supported")]
    TooLarge { len: usize, limit: u32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("empty location")]
    Empty,

    #[error("'{0}' is neither a bank:address pair, a known symbol, nor a hex offset")]
    Unparsable(String),

    #[error("location {offset:#x} is outside the ROM address space")]
    OutOfRange { offset: u32 },
}
