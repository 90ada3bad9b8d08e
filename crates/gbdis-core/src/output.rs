//! Listing lines and the cleanup applied once a run has finished.
//!
//! The decoder records lines structurally so label references can be
//! resolved after every usage count is final: unused label definitions are
//! dropped and operands pointing at unused labels fall back to their local
//! address.

use crate::address::address_comment;
use crate::disasm::DisasmOptions;
use crate::labels::{LabelKind, LabelTracker, func_label_name};

/// Operand text of an emitted instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// Already formatted; printed as is.
    Literal(String),
    /// Reference to a tracker label, resolved at render time.
    Label { kind: LabelKind, address: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// `Func_<start>: ; <start> (<bank>:<local>)`
    Header { offset: u32 },
    /// Section separator.
    Blank,
    /// Label definition.
    Label { kind: LabelKind, address: u16 },
    Instruction {
        template: &'static str,
        argument: Option<Argument>,
    },
}

impl Line {
    pub fn instruction(template: &'static str, argument: Argument) -> Self {
        Self::Instruction {
            template,
            argument: Some(argument),
        }
    }

    pub fn bare(template: &'static str) -> Self {
        Self::Instruction {
            template,
            argument: None,
        }
    }
}

fn resolve(argument: &Argument, labels: &LabelTracker) -> String {
    match argument {
        Argument::Literal(text) => text.clone(),
        Argument::Label { kind, address } => match labels.get(*kind, *address) {
            Some(label) if label.is_used() => label.name.clone(),
            _ => format!("${address:x}"),
        },
    }
}

/// Render `lines` into the final listing text.
///
/// Label definitions with zero usage are removed, runs of separators collapse
/// to a single blank line, and `; 0x<end>` is appended when
/// `include_last_address` is set.
pub fn render(
    lines: &[Line],
    labels: &LabelTracker,
    options: &DisasmOptions,
    end_offset: u32,
) -> String {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut pending_blank = false;

    for line in lines {
        let text = match line {
            Line::Header { offset } => {
                format!("{}:{}", func_label_name(*offset), address_comment(*offset))
            }
            Line::Blank => {
                pending_blank = true;
                continue;
            }
            Line::Label { kind, address } => match labels.get(*kind, *address) {
                Some(label) if label.is_used() => label.name.clone(),
                _ => continue,
            },
            Line::Instruction { template, argument } => {
                let body = match argument {
                    Some(argument) => template.replacen("{}", &resolve(argument, labels), 1),
                    None => (*template).to_string(),
                };
                format!("{}{body}", options.indent)
            }
        };

        if pending_blank && !out.is_empty() {
            out.push(String::new());
        }
        pending_blank = false;
        out.push(text);
    }

    let mut text = out.join("\n");
    text.push('\n');
    if options.include_last_address {
        text.push_str(&format!("; {end_offset:#x}"));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::{code_label_name, data_label_name};

    fn options() -> DisasmOptions {
        DisasmOptions::default()
    }

    #[test]
    fn unused_labels_are_dropped() {
        let mut labels = LabelTracker::new();
        labels.create(LabelKind::Code, 0x100, code_label_name(0x100), 0, true);
        labels.create(LabelKind::Data, 0x100, data_label_name(0x100), 0, true);
        let lines = [
            Line::Header { offset: 0x100 },
            Line::Label {
                kind: LabelKind::Code,
                address: 0x100,
            },
            Line::Label {
                kind: LabelKind::Data,
                address: 0x100,
            },
            Line::bare("nop"),
        ];

        let text = render(&lines, &labels, &options(), 0x101);
        assert_eq!(text, "Func_100: ; 100 (0:100)\n\tnop\n; 0x101");
    }

    #[test]
    fn unused_data_reference_becomes_local_address() {
        let mut labels = LabelTracker::new();
        labels.create(LabelKind::Data, 0x4abc, data_label_name(0x8abc), 0, false);
        labels.create(LabelKind::Data, 0x4ab0, data_label_name(0x8ab0), 2, true);
        let lines = [
            Line::instruction(
                "ld hl, {}",
                Argument::Label {
                    kind: LabelKind::Data,
                    address: 0x4abc,
                },
            ),
            Line::instruction(
                "ld de, {}",
                Argument::Label {
                    kind: LabelKind::Data,
                    address: 0x4ab0,
                },
            ),
        ];

        let text = render(&lines, &labels, &options(), 0x8000);
        assert_eq!(text, "\tld hl, $4abc\n\tld de, .data_8ab0\n; 0x8000");
    }

    #[test]
    fn a_pruned_name_never_touches_longer_names() {
        let mut labels = LabelTracker::new();
        labels.create(LabelKind::Data, 0x100, data_label_name(0x100), 0, false);
        labels.create(LabelKind::Data, 0x1000, data_label_name(0x1000), 1, true);
        let lines = [
            Line::Label {
                kind: LabelKind::Data,
                address: 0x1000,
            },
            Line::instruction(
                "ld hl, {}",
                Argument::Label {
                    kind: LabelKind::Data,
                    address: 0x1000,
                },
            ),
        ];

        let text = render(&lines, &labels, &options(), 0x1003);
        assert_eq!(text, ".data_1000\n\tld hl, .data_1000\n; 0x1003");
    }

    #[test]
    fn separators_collapse_and_never_trail() {
        let labels = LabelTracker::new();
        let lines = [
            Line::Header { offset: 0 },
            Line::bare("ret"),
            Line::Blank,
            Line::Blank,
            Line::Blank,
            Line::bare("nop"),
            Line::Blank,
        ];
        let text = render(&lines, &labels, &options(), 2);
        assert_eq!(text, "Func_0: ; 0 (0:0)\n\tret\n\n\tnop\n; 0x2");
    }

    #[test]
    fn indent_and_trailer_are_configurable() {
        let labels = LabelTracker::new();
        let options = DisasmOptions {
            indent: "    ".to_string(),
            include_last_address: false,
            ..DisasmOptions::default()
        };
        let lines = [Line::instruction("db {}", Argument::Literal("$ff".into()))];
        assert_eq!(render(&lines, &labels, &options, 1), "    db $ff\n");
    }
}
