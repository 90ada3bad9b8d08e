//! Game Boy / Game Boy Color SM83 disassembler core.
//!
//! Turns a routine in a cartridge image into RGBDS-style assembly with local
//! labels for branch targets and referenced data. Frontends load the ROM and
//! symbols and drive runs through [`Disassembler`].

/// Flat ROM offsets and banked local addresses.
pub mod address;

/// Decoder state machine producing one listing per run.
pub mod disasm;

/// Error types for every fallible operation in the crate.
pub mod error;

/// Per-run code and data label bookkeeping.
pub mod labels;

/// Start/end location arguments (`bank:addr`, symbol names, hex offsets).
pub mod location;

/// Primary and CB-prefixed opcode tables.
pub mod opcodes;

/// Listing line model and final cleanup.
pub mod output;

/// Cartridge image loading.
pub mod rom;

/// `.sym` files and RGBDS constants.
pub mod symbols;

pub use disasm::{DisasmOptions, Disassembler, Disassembly};
pub use error::{DisasmError, LocationError, RomError, SymbolError};
pub use labels::{Label, LabelKind, LabelTracker};
pub use location::parse_location;
pub use rom::Rom;
pub use symbols::{Region, SymbolTable};
