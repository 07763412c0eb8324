//! Arena-backed reference catalog.
//!
//! Entries, syntaxes and operands live in three flat arenas and refer
//! to each other by copyable ids. Parent links (`Syntax::entry`,
//! `Operand::syntax`) are assigned exactly once while loading; after
//! that the catalog is immutable and freely shareable across threads.

use crate::entry::{Entry, Syntax};
use crate::operand::Operand;

/// Identifier of an [`Entry`] in a [`Reference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntryId(u32);

/// Identifier of a [`Syntax`] in a [`Reference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyntaxId(u32);

/// Identifier of an [`Operand`] in a [`Reference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperandId(u32);

impl EntryId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Arena index of this id.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl SyntaxId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Arena index of this id.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl OperandId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Arena index of this id.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The loaded opcode reference: a process-lifetime, read-only catalog
/// shared by every decoder.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reference {
    entries: Vec<Entry>,
    syntaxes: Vec<Syntax>,
    operands: Vec<Operand>,
}

impl Reference {
    /// Looks up an entry.
    pub fn entry(&self, id: EntryId) -> &Entry {
        &self.entries[id.index()]
    }

    /// Looks up a syntax.
    pub fn syntax(&self, id: SyntaxId) -> &Syntax {
        &self.syntaxes[id.index()]
    }

    /// Looks up an operand.
    pub fn operand(&self, id: OperandId) -> &Operand {
        &self.operands[id.index()]
    }

    /// Iterates all entries in document order.
    pub fn entries(&self) -> impl Iterator<Item = (EntryId, &Entry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (EntryId::new(i), e))
    }

    /// Iterates all syntaxes in document order.
    pub fn syntaxes(&self) -> impl Iterator<Item = (SyntaxId, &Syntax)> {
        self.syntaxes
            .iter()
            .enumerate()
            .map(|(i, s)| (SyntaxId::new(i), s))
    }

    /// Iterates all operands in document order.
    pub fn operands(&self) -> impl Iterator<Item = (OperandId, &Operand)> {
        self.operands
            .iter()
            .enumerate()
            .map(|(i, o)| (OperandId::new(i), o))
    }

    /// Number of entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of syntaxes.
    pub fn syntax_count(&self) -> usize {
        self.syntaxes.len()
    }

    /// Number of operands.
    pub fn operand_count(&self) -> usize {
        self.operands.len()
    }

    /// The syntax that carries an entry's length and operand
    /// semantics: the last of its forms.
    pub fn canonical_syntax(&self, id: EntryId) -> Option<&Syntax> {
        self.entry(id)
            .syntaxes
            .last()
            .map(|&syntax| self.syntax(syntax))
    }

    /// Iterates a syntax's operands, sources before destinations.
    pub fn syntax_operands<'a>(
        &'a self,
        syntax: &'a Syntax,
    ) -> impl Iterator<Item = &'a Operand> {
        syntax
            .src_operands
            .iter()
            .chain(&syntax.dst_operands)
            .map(|&id| self.operand(id))
    }

    pub(crate) fn push_entry(&mut self, entry: Entry) -> EntryId {
        let id = EntryId::new(self.entries.len());
        self.entries.push(entry);
        id
    }

    pub(crate) fn push_syntax(&mut self, syntax: Syntax) -> SyntaxId {
        let id = SyntaxId::new(self.syntaxes.len());
        self.syntaxes.push(syntax);
        id
    }

    pub(crate) fn push_operand(&mut self, operand: Operand) -> OperandId {
        let id = OperandId::new(self.operands.len());
        self.operands.push(operand);
        id
    }
}
