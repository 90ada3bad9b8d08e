//! Per-run label bookkeeping.
//!
//! A [`LabelTracker`] is created fresh for every disassembly run. Code labels
//! mark jump targets and instruction boundaries; data labels mark addresses
//! only ever referenced as load operands and are pruned when unused.

use std::collections::{BTreeMap, btree_map::Entry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LabelKind {
    Code,
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub kind: LabelKind,
    pub name: String,
    /// Local address within the run's bank context.
    pub address: u16,
    /// Number of emitted references.
    pub usage: u32,
    /// Whether the definition line has been emitted.
    pub defined: bool,
}

impl Label {
    pub fn is_used(&self) -> bool {
        self.usage > 0
    }
}

/// `.asm_<offset>`
pub fn code_label_name(offset: u32) -> String {
    format!(".asm_{offset:x}")
}

/// `.data_<offset>`
pub fn data_label_name(offset: u32) -> String {
    format!(".data_{offset:x}")
}

/// `Func_<offset>`, used for call targets and jumps outside the run.
pub fn func_label_name(offset: u32) -> String {
    format!("Func_{offset:x}")
}

/// One label per kind and local address.
#[derive(Debug, Default, Clone)]
pub struct LabelTracker {
    code: BTreeMap<u16, Label>,
    data: BTreeMap<u16, Label>,
}

impl LabelTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, kind: LabelKind) -> &BTreeMap<u16, Label> {
        match kind {
            LabelKind::Code => &self.code,
            LabelKind::Data => &self.data,
        }
    }

    fn map_mut(&mut self, kind: LabelKind) -> &mut BTreeMap<u16, Label> {
        match kind {
            LabelKind::Code => &mut self.code,
            LabelKind::Data => &mut self.data,
        }
    }

    pub fn get(&self, kind: LabelKind, address: u16) -> Option<&Label> {
        self.map(kind).get(&address)
    }

    pub fn get_mut(&mut self, kind: LabelKind, address: u16) -> Option<&mut Label> {
        self.map_mut(kind).get_mut(&address)
    }

    pub fn contains(&self, kind: LabelKind, address: u16) -> bool {
        self.map(kind).contains_key(&address)
    }

    pub fn is_used(&self, kind: LabelKind, address: u16) -> bool {
        self.get(kind, address).is_some_and(Label::is_used)
    }

    /// Insert a label, replacing any existing label of the same kind at
    /// `address`.
    pub fn create(
        &mut self,
        kind: LabelKind,
        address: u16,
        name: String,
        usage: u32,
        defined: bool,
    ) -> &mut Label {
        let label = Label {
            kind,
            name,
            address,
            usage,
            defined,
        };
        match self.map_mut(kind).entry(address) {
            Entry::Occupied(mut entry) => {
                entry.insert(label);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(label),
        }
    }

    /// Bump the usage of an existing label and return its name.
    pub fn reference(&mut self, kind: LabelKind, address: u16) -> Option<&str> {
        let label = self.get_mut(kind, address)?;
        label.usage += 1;
        Some(label.name.as_str())
    }

    /// Strip any data meaning from `address`: usage drops to zero and the
    /// label counts as defined.
    pub fn neutralize_data(&mut self, address: u16) {
        if let Some(label) = self.data.get_mut(&address) {
            label.usage = 0;
            label.defined = true;
        }
    }

    pub fn mark_defined(&mut self, kind: LabelKind, address: u16) {
        if let Some(label) = self.get_mut(kind, address) {
            label.defined = true;
        }
    }

    /// True once every label of `kind` has had its definition emitted.
    pub fn all_defined(&self, kind: LabelKind) -> bool {
        self.labels(kind).all(|l| l.defined)
    }

    pub fn labels(&self, kind: LabelKind) -> impl Iterator<Item = &Label> {
        self.map(kind).values()
    }

    pub fn len(&self) -> usize {
        self.code.len() + self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty() && self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_lowercase_hex_of_the_offset() {
        assert_eq!(code_label_name(0x1_C123), ".asm_1c123");
        assert_eq!(data_label_name(0x0100), ".data_100");
        assert_eq!(func_label_name(0x1234), "Func_1234");
        assert_eq!(func_label_name(0), "Func_0");
    }

    #[test]
    fn same_address_holds_one_label_per_kind() {
        let mut labels = LabelTracker::new();
        labels.create(LabelKind::Code, 0x100, code_label_name(0x100), 0, true);
        labels.create(LabelKind::Data, 0x100, data_label_name(0x100), 0, true);
        labels.create(LabelKind::Code, 0x100, code_label_name(0x100), 1, false);

        assert_eq!(labels.len(), 2);
        let code = labels.get(LabelKind::Code, 0x100).unwrap();
        assert_eq!(code.usage, 1);
        assert!(!code.defined);
    }

    #[test]
    fn reference_counts_usage() {
        let mut labels = LabelTracker::new();
        assert_eq!(labels.reference(LabelKind::Code, 0x200), None);

        labels.create(LabelKind::Code, 0x200, code_label_name(0x200), 0, true);
        assert!(!labels.is_used(LabelKind::Code, 0x200));
        assert_eq!(labels.reference(LabelKind::Code, 0x200), Some(".asm_200"));
        assert!(labels.is_used(LabelKind::Code, 0x200));
    }

    #[test]
    fn neutralized_data_is_defined_and_unused() {
        let mut labels = LabelTracker::new();
        labels.create(LabelKind::Data, 0x4010, data_label_name(0x8010), 3, false);
        labels.neutralize_data(0x4010);

        let data = labels.get(LabelKind::Data, 0x4010).unwrap();
        assert_eq!(data.usage, 0);
        assert!(data.defined);
        assert!(!labels.is_used(LabelKind::Data, 0x4010));
    }

    #[test]
    fn all_defined_tracks_forward_references() {
        let mut labels = LabelTracker::new();
        assert!(labels.all_defined(LabelKind::Code));

        labels.create(LabelKind::Code, 0x150, code_label_name(0x150), 1, false);
        labels.create(LabelKind::Data, 0x160, data_label_name(0x160), 0, false);
        assert!(!labels.all_defined(LabelKind::Code));
        assert!(!labels.all_defined(LabelKind::Data));

        labels.mark_defined(LabelKind::Code, 0x150);
        assert!(labels.all_defined(LabelKind::Code));
        assert!(!labels.all_defined(LabelKind::Data));
    }
}
