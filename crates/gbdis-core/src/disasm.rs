//! Linear SM83 decoder.
//!
//! One call to [`Disassembler::disassemble`] walks a single routine starting
//! at a flat ROM offset, emitting instructions and label definitions until
//! every forward-referenced label has been reached and control flow ends.
//! Label state lives in a [`LabelTracker`] owned by that call, so the ROM and
//! symbol table can be shared between concurrent runs.

use log::{debug, trace};

use crate::address::{ROM_END, ROM_SIZE, bank_end, bank_of, global_address, local_address};
use crate::error::DisasmError;
use crate::labels::{LabelKind, LabelTracker, code_label_name, data_label_name, func_label_name};
use crate::opcodes::{self, Operand};
use crate::output::{self, Argument, Line};
use crate::symbols::SymbolTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisasmOptions {
    /// Offset at which the run may end. Defaults to the last byte of the
    /// starting bank.
    pub stop: Option<u32>,
    /// Stop as soon as `stop` is reached, regardless of control flow.
    pub hard_stop: bool,
    /// Allow byte runs following a jump/return to be emitted as `db` data.
    pub parse_data: bool,
    /// Append `; 0x<end>` to the listing.
    pub include_last_address: bool,
    /// Prefix of every instruction line.
    pub indent: String,
}

impl Default for DisasmOptions {
    fn default() -> Self {
        Self {
            stop: None,
            hard_stop: false,
            parse_data: false,
            include_last_address: true,
            indent: "\t".to_string(),
        }
    }
}

/// Result of one run.
#[derive(Debug, Clone)]
pub struct Disassembly {
    pub text: String,
    pub start_offset: u32,
    /// Offset just past the last decoded byte.
    pub end_offset: u32,
    /// Effective stop offset, after defaulting to the bank end.
    pub stop_offset: u32,
    pub labels: LabelTracker,
}

impl Disassembly {
    pub fn byte_count(&self) -> u32 {
        self.end_offset - self.start_offset
    }
}

pub struct Disassembler<'a> {
    rom: &'a [u8],
    symbols: &'a SymbolTable,
}

impl<'a> Disassembler<'a> {
    pub fn new(rom: &'a [u8], symbols: &'a SymbolTable) -> Self {
        Self { rom, symbols }
    }

    /// Disassemble the routine starting at `start`.
    pub fn disassemble(
        &self,
        start: u32,
        options: &DisasmOptions,
    ) -> Result<Disassembly, DisasmError> {
        let ceiling = u32::try_from(self.rom.len())
            .unwrap_or(u32::MAX)
            .min(ROM_SIZE);
        if start >= ceiling {
            return Err(DisasmError::AddressOutOfRange {
                offset: start,
                limit: ceiling,
            });
        }
        if let Some(stop) = options.stop
            && stop > ROM_SIZE
        {
            return Err(DisasmError::AddressOutOfRange {
                offset: stop,
                limit: ROM_SIZE,
            });
        }

        let stop = options.stop.unwrap_or_else(|| bank_end(start));
        debug!(
            "Disassembling from {start:#x} (bank {:#x}) to {stop:#x}{}",
            bank_of(start),
            if options.hard_stop { " (hard stop)" } else { "" }
        );

        let mut run = Run {
            rom: &self.rom[..ceiling as usize],
            symbols: self.symbols,
            options,
            start,
            stop,
            bank: bank_of(start),
            offset: start,
            is_data: false,
            labels: LabelTracker::new(),
            lines: vec![Line::Header { offset: start }],
        };
        run.walk()?;

        let text = output::render(&run.lines, &run.labels, options, run.offset);
        debug!(
            "Finished at {:#x}: {} bytes, {} labels tracked",
            run.offset,
            run.offset - start,
            run.labels.len()
        );

        Ok(Disassembly {
            text,
            start_offset: start,
            end_offset: run.offset,
            stop_offset: stop,
            labels: run.labels,
        })
    }
}

/// State of a single decoding pass.
struct Run<'a> {
    rom: &'a [u8],
    symbols: &'a SymbolTable,
    options: &'a DisasmOptions,
    start: u32,
    stop: u32,
    bank: u32,
    offset: u32,
    is_data: bool,
    labels: LabelTracker,
    lines: Vec<Line>,
}

impl Run<'_> {
    fn walk(&mut self) -> Result<(), DisasmError> {
        loop {
            self.define_labels(local_address(self.offset));

            let opcode = self.byte(0)?;
            let was_data = self.is_data;
            if was_data {
                self.emit_data_byte(opcode);
            } else {
                self.decode(opcode)?;
            }

            if self.options.hard_stop && self.offset >= self.stop {
                debug!("Hard stop at {:#x}", self.offset);
                return Ok(());
            }

            if opcodes::ends_flow(opcode) || self.is_data {
                let local = local_address(self.offset);
                if self.options.parse_data
                    && !self.labels.contains(LabelKind::Code, local)
                    && self.labels.contains(LabelKind::Data, local)
                    && !self.labels.all_defined(LabelKind::Data)
                {
                    trace!("Entering data at {:#x}", self.offset);
                    self.is_data = true;
                } else if self.labels.all_defined(LabelKind::Code)
                    && (self.offset >= self.stop || self.options.stop.is_none())
                {
                    return Ok(());
                }
                if !was_data {
                    self.lines.push(Line::Blank);
                }
            }
        }
    }

    /// Emit the definitions for the current address, reusing labels created
    /// by earlier references.
    fn define_labels(&mut self, local: u16) {
        let offset = self.offset;
        if self.labels.contains(LabelKind::Code, local) {
            if self.labels.contains(LabelKind::Data, local) {
                self.labels.neutralize_data(local);
            } else {
                self.labels
                    .create(LabelKind::Data, local, data_label_name(offset), 0, true);
            }
            self.labels.reference(LabelKind::Code, local);
            self.lines.push(Line::Blank);
        } else if self.options.parse_data && self.labels.contains(LabelKind::Data, local) {
            self.labels.reference(LabelKind::Data, local);
            self.labels
                .create(LabelKind::Code, local, code_label_name(offset), 0, true);
            self.lines.push(Line::Blank);
        } else {
            self.labels
                .create(LabelKind::Data, local, data_label_name(offset), 0, true);
            self.labels
                .create(LabelKind::Code, local, code_label_name(offset), 0, true);
        }

        for kind in [LabelKind::Code, LabelKind::Data] {
            self.labels.mark_defined(kind, local);
            self.lines.push(Line::Label {
                kind,
                address: local,
            });
        }
    }

    /// Byte at `self.offset + delta`; running off the buffer ends the run
    /// with an error naming the instruction being decoded.
    fn byte(&self, delta: u32) -> Result<u8, DisasmError> {
        self.rom
            .get((self.offset + delta) as usize)
            .copied()
            .ok_or(DisasmError::Unterminated {
                offset: self.offset,
                bank: bank_of(self.offset),
            })
    }

    fn emit_data_byte(&mut self, value: u8) {
        trace!("{:#07x}: db ${value:02x}", self.offset);
        self.lines
            .push(Line::instruction("db {}", Argument::Literal(format!("${value:02x}"))));
        self.offset += 1;
        if self
            .labels
            .contains(LabelKind::Code, local_address(self.offset))
        {
            self.is_data = false;
        }
    }

    fn decode(&mut self, opcode: u8) -> Result<(), DisasmError> {
        let entry = opcodes::lookup(opcode);
        let line = match entry.operand {
            Operand::None => Line::bare(entry.template),
            Operand::Imm8 => {
                let value = self.byte(1)?;
                Line::instruction(entry.template, Argument::Literal(format!("${value:02x}")))
            }
            Operand::Rel8 => {
                let displacement = opcodes::signed_byte(self.byte(1)?);
                Line::instruction(entry.template, self.relative_target(displacement))
            }
            Operand::HighRam => {
                let address = 0xFF00 | u16::from(self.byte(1)?);
                let name = self
                    .symbols
                    .find_label(address, self.bank)
                    .map_or_else(|| format!("${address:x}"), str::to_string);
                Line::instruction(entry.template, Argument::Literal(name))
            }
            Operand::Prefix => Line::bare(opcodes::lookup_cb(self.byte(1)?)),
            Operand::Imm16 => {
                let pointer = u16::from_le_bytes([self.byte(1)?, self.byte(2)?]);
                Line::instruction(entry.template, self.pointer_target(opcode, pointer))
            }
        };

        trace!("{:#07x}: {opcode:02x} {line:?}", self.offset);
        self.lines.push(line);
        self.offset += u32::from(entry.size());
        Ok(())
    }

    fn relative_target(&mut self, displacement: i32) -> Argument {
        let target = i64::from(self.offset) + 2 + i64::from(displacement);
        let Ok(target) = u32::try_from(target) else {
            // Only reachable from the first bytes of bank 0.
            return Argument::Literal(format!("@{:+}", 2 + displacement));
        };

        let local = local_address(target);
        let argument = if self.labels.reference(LabelKind::Code, local).is_some() {
            Argument::Label {
                kind: LabelKind::Code,
                address: local,
            }
        } else if target < self.start {
            Argument::Literal(func_label_name(target))
        } else {
            self.labels
                .create(LabelKind::Code, local, code_label_name(target), 1, false);
            Argument::Label {
                kind: LabelKind::Code,
                address: local,
            }
        };

        self.labels.neutralize_data(local);
        argument
    }

    fn pointer_target(&mut self, opcode: u8, pointer: u16) -> Argument {
        let target = global_address(pointer, self.bank);
        // Bank 0 has no switchable window of its own; its high window is bank 1.
        let symbol = self.symbols.find_label(pointer, self.bank.max(1));

        if opcodes::is_call(opcode) || opcodes::is_absolute_jump(opcode) {
            return Argument::Literal(
                symbol.map_or_else(|| func_label_name(target), str::to_string),
            );
        }
        if let Some(name) = symbol {
            return Argument::Literal(name.to_string());
        }

        if self.labels.is_used(LabelKind::Code, pointer) {
            match self.labels.get_mut(LabelKind::Data, pointer) {
                Some(data) => data.usage = 0,
                None => {
                    self.labels
                        .create(LabelKind::Data, pointer, data_label_name(target), 0, true);
                }
            }
            Argument::Label {
                kind: LabelKind::Code,
                address: pointer,
            }
        } else if pointer >= ROM_END || !self.options.parse_data {
            Argument::Literal(format!("${pointer:x}"))
        } else {
            if self.labels.reference(LabelKind::Data, pointer).is_none() {
                self.labels
                    .create(LabelKind::Data, pointer, data_label_name(target), 0, false);
            }
            Argument::Label {
                kind: LabelKind::Data,
                address: pointer,
            }
        }
    }
}
